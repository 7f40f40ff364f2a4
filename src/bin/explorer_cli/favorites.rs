//! Favorites commands - save, unsave, list

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use sui_package_explorer::{canonical_package_id, Explorer};

use super::output::{format_saved_packages, loading, print_json};

#[derive(Parser, Debug)]
pub struct SaveCmd {
    /// Package ID (0x...)
    #[arg(value_name = "PACKAGE_ID")]
    pub package_id: String,

    /// Free-form note kept with the saved package
    #[arg(long)]
    pub note: Option<String>,
}

impl SaveCmd {
    pub async fn execute(&self, explorer: &Explorer, json_output: bool) -> Result<()> {
        loading("Loading normalized modules...", json_output);
        let saved = explorer
            .save_package(&self.package_id, self.note.clone())
            .await?;
        if json_output {
            return print_json(&saved);
        }
        println!("Saved {} on {}", saved.package_id, saved.network);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct UnsaveCmd {
    /// Package ID (0x...)
    #[arg(value_name = "PACKAGE_ID")]
    pub package_id: String,
}

impl UnsaveCmd {
    pub fn execute(&self, explorer: &Explorer, json_output: bool) -> Result<()> {
        let package_id = canonical_package_id(&self.package_id)?;
        let removed = explorer.unsave_package(&package_id)?;
        if json_output {
            return print_json(&json!({ "packageId": package_id, "removed": removed }));
        }
        if removed {
            println!("Removed {}", package_id);
        } else {
            println!("{} was not saved", package_id);
        }
        Ok(())
    }
}

pub fn list_favorites(explorer: &Explorer, json_output: bool) -> Result<()> {
    let saved = explorer.favorites()?;
    if json_output {
        return print_json(&saved);
    }
    if saved.is_empty() {
        println!("No saved packages.");
    } else {
        print!("{}", format_saved_packages(&saved));
    }
    Ok(())
}
