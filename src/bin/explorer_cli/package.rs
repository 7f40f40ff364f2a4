//! Per-package commands - publish info and ABI

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use sui_package_discovery::ScanBounds;
use sui_package_explorer::{canonical_package_id, Explorer};

use super::output::{format_abi_view, format_publish_location, loading, print_json};

#[derive(Parser, Debug)]
pub struct PublishInfoCmd {
    /// Package ID (0x...)
    #[arg(value_name = "PACKAGE_ID")]
    pub package_id: String,

    /// Transaction pages to scan (default from config)
    #[arg(long)]
    pub max_pages: Option<usize>,
}

impl PublishInfoCmd {
    pub async fn execute(&self, explorer: Explorer, json_output: bool) -> Result<()> {
        let package_id = canonical_package_id(&self.package_id)?;
        let defaults = explorer.locate_bounds();
        let bounds = ScanBounds::new(
            defaults.page_size,
            self.max_pages.unwrap_or(defaults.max_pages),
        );
        let catalog = explorer.catalog_bounds();
        let explorer = explorer.with_bounds(catalog, bounds);

        loading(
            &format!("Looking for the publish transaction in the last {} transactions...", bounds.window()),
            json_output,
        );
        let location = explorer.get_publish_info(&package_id).await?;

        if json_output {
            return print_json(&json!({
                "packageId": package_id,
                "location": location,
                "scanWindow": bounds.window(),
            }));
        }
        print!(
            "{}",
            format_publish_location(&package_id, location.as_ref(), bounds.window())
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct AbiCmd {
    /// Package ID (0x...)
    #[arg(value_name = "PACKAGE_ID")]
    pub package_id: String,
}

impl AbiCmd {
    pub async fn execute(&self, explorer: &Explorer, json_output: bool) -> Result<()> {
        loading("Loading normalized modules...", json_output);
        let view = explorer.get_abi_view(&self.package_id).await?;
        if json_output {
            return print_json(view.as_ref());
        }
        print!("{}", format_abi_view(&view));
        Ok(())
    }
}
