//! Output formatting for sui-explorer CLI

use chrono::{DateTime, Utc};
use serde::Serialize;
use sui_explorer_types::{short_id, PackageCatalogEntry, PublishLocation};
use sui_package_extractor::AbiView;
use sui_package_explorer::SavedPackage;

pub fn format_timestamp_ms(timestamp_ms: u64) -> String {
    if timestamp_ms == 0 {
        return "unknown".to_string();
    }
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Progress line for long scans; stderr so `--json` output stays clean.
pub fn loading(message: &str, json_output: bool) {
    if !json_output {
        eprintln!("\x1b[2m{}\x1b[0m", message);
    }
}

pub fn format_package_table(entries: &[PackageCatalogEntry]) -> String {
    let mut out = format!(
        "\x1b[1m{:<13} {:<32} {:>7}  {:<23} {}\x1b[0m\n",
        "PACKAGE", "NAME", "MODULES", "LAST PUBLISHED", "SAVED"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:<13} {:<32} {:>7}  {:<23} {}\n",
            short_id(&entry.package_id),
            truncate(&entry.display_name(), 32),
            entry.module_names.len(),
            format_timestamp_ms(entry.last_updated_ms),
            if entry.is_favorite { "★" } else { "" }
        ));
    }
    out
}

pub fn format_publish_location(
    package_id: &str,
    location: Option<&PublishLocation>,
    window: usize,
) -> String {
    match location {
        Some(loc) => format!(
            "Package {}\n  published in tx {}\n  at {}\n",
            package_id,
            loc.tx_digest,
            format_timestamp_ms(loc.timestamp_ms)
        ),
        None => format!(
            "Package {}\n  publish transaction unknown (older than the last {} transactions)\n",
            package_id, window
        ),
    }
}

pub fn format_abi_view(view: &AbiView) -> String {
    let mut out = format!("\x1b[1m{}\x1b[0m  {}\n", view.display_name(), view.package_id);
    out.push_str(&format!(
        "{} modules, {} functions ({} entry), {} structs\n",
        view.summary.module_count,
        view.summary.function_count,
        view.summary.entry_function_count,
        view.summary.struct_count
    ));

    if !view.functions.is_empty() {
        out.push_str("\n\x1b[1mFunctions:\x1b[0m\n");
        for function in &view.functions {
            out.push_str(&format!("  {}\n", function.signature()));
        }
    }

    if !view.structs.is_empty() {
        out.push_str("\n\x1b[1mStructs:\x1b[0m\n");
        for s in &view.structs {
            let mut header = format!("  struct {}::{}", s.module, s.name);
            if !s.type_params.is_empty() {
                header.push_str(&format!("<{}>", s.type_params.join(", ")));
            }
            if !s.abilities.is_empty() {
                header.push_str(&format!(" has {}", s.abilities.join(", ")));
            }
            out.push_str(&header);
            out.push_str(" {\n");
            for field in &s.fields {
                out.push_str(&format!("      {}\n", field));
            }
            out.push_str("  }\n");
        }
    }
    out
}

pub fn format_saved_packages(saved: &[SavedPackage]) -> String {
    let mut out = String::new();
    for p in saved {
        out.push_str(&format!(
            "{}  [{}]  {} modules, {} functions, {} structs  saved {}\n",
            short_id(&p.package_id),
            p.network,
            p.module_count,
            p.function_count,
            p.struct_count,
            p.saved_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(note) = &p.note {
            out.push_str(&format!("    {}\n", note));
        }
    }
    out
}

pub fn format_error(error: &anyhow::Error, json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct ErrorJson {
            error: String,
            hint: &'static str,
        }

        let err = ErrorJson {
            error: format!("{:#}", error),
            hint: ERROR_HINT,
        };
        serde_json::to_string_pretty(&err).unwrap_or_else(|_| "{}".to_string())
    } else {
        let mut out = format!("\x1b[31mError:\x1b[0m {}\n", error);
        let mut causes = error.chain().skip(1).peekable();
        if causes.peek().is_some() {
            out.push_str("Caused by:\n");
            for (idx, cause) in causes.enumerate() {
                out.push_str(&format!("  {}: {}\n", idx + 1, cause));
            }
        }
        out.push_str(ERROR_HINT);
        out
    }
}

const ERROR_HINT: &str = "Check the network connection, --rpc-url and the package id.";

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
