//! List command - recently published packages

use anyhow::Result;
use clap::Parser;
use sui_package_discovery::ScanBounds;
use sui_package_explorer::{Explorer, ListQuery, SortMode};

use super::output::{format_package_table, loading, print_json};

#[derive(Parser, Debug)]
pub struct ListCmd {
    /// Match package id, name, module or (cached) function names
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Sort mode
    #[arg(long, value_enum, default_value_t = SortMode::Recent)]
    pub sort: SortMode,

    /// Transaction pages to scan (default from config)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Transactions per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Show at most this many packages
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ListCmd {
    pub async fn execute(&self, explorer: Explorer, json_output: bool) -> Result<()> {
        let defaults = explorer.catalog_bounds();
        let bounds = ScanBounds::new(
            self.page_size.unwrap_or(defaults.page_size),
            self.max_pages.unwrap_or(defaults.max_pages),
        );
        let locate = explorer.locate_bounds();
        let explorer = explorer.with_bounds(bounds, locate);

        loading(
            &format!(
                "Scanning up to {} recent transactions on {}...",
                bounds.window(),
                explorer.network()
            ),
            json_output,
        );

        let mut query = ListQuery::new(self.query.clone(), self.sort);
        query.limit = self.limit;
        let entries = explorer.list_packages(&query).await?;

        if json_output {
            return print_json(&entries);
        }
        if entries.is_empty() {
            println!("No packages found.");
        } else {
            print!("{}", format_package_table(&entries));
        }
        Ok(())
    }
}
