//! Command execution implementations

use super::Commands;
use super::tables as tables_cmd;
use super::{bundle, search};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, quiet: bool) -> anyhow::Result<()> {
        match self {
            Commands::Bundle {
                corpus,
                roots,
                name,
                output,
                description,
                author,
                asset_dir,
                associated,
                tables,
            } => bundle::execute(&bundle::BundleArgs {
                corpus,
                roots,
                name,
                output,
                description: description.as_deref(),
                author: author.as_deref(),
                asset_dir,
                associated: *associated,
                tables: tables.as_deref(),
                quiet,
            }),
            Commands::Search {
                corpus,
                query,
                kind,
                associated,
                tables,
            } => search::execute(
                corpus,
                query,
                kind.map(|k| k.0),
                *associated,
                tables.as_deref(),
            ),
            Commands::Candidates { name, tables } => tables_cmd::candidates(name, tables.as_deref()),
            Commands::Tables { tables, output } => {
                tables_cmd::dump(tables.as_deref(), output.as_deref())
            }
        }
    }
}
