//! CLI subcommand implementations for sui-explorer

pub mod favorites;
pub mod list;
pub mod output;
pub mod package;
