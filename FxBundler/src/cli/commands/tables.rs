//! CLI commands for inspecting the resolver tables

use std::path::Path;

use crate::matcher::candidate_names;
use crate::tables::ResolverTables;

/// Load tables from an optional TOML file, falling back to the built-in ones
pub fn load(path: Option<&Path>) -> anyhow::Result<ResolverTables> {
    match path {
        Some(path) => Ok(ResolverTables::from_toml_file(path)?),
        None => Ok(ResolverTables::default()),
    }
}

/// Print the candidate names generated for `name`
pub fn candidates(name: &str, tables: Option<&Path>) -> anyhow::Result<()> {
    let tables = load(tables)?;
    let names = candidate_names(name, &tables);

    if names.is_empty() {
        println!("No candidates for '{name}'");
    } else {
        println!("{} candidates for '{name}':", names.len());
        for candidate in names {
            println!("  {candidate}");
        }
    }

    Ok(())
}

/// Print (or write) the tables as TOML
pub fn dump(tables: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let text = load(tables)?.to_toml_string()?;

    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("Tables written to: {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}
