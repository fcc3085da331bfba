use clap::Subcommand;
use std::path::PathBuf;
use std::str::FromStr;

use crate::archive::AssetKind;

pub mod bundle;
mod execute;
pub mod search;
pub mod tables;

/// Asset kind filter for model search
#[derive(Debug, Clone, Copy)]
pub struct KindArg(pub AssetKind);

impl FromStr for KindArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim_start_matches('.').to_lowercase();
        match lower.as_str() {
            "ydr" | "drawable" => Ok(KindArg(AssetKind::Drawable)),
            "yft" | "fragment" | "vehicle" => Ok(KindArg(AssetKind::Fragment)),
            _ => Err(format!(
                "Invalid kind '{s}'. Valid values: ydr/drawable, yft/fragment/vehicle"
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bundle root assets and their dependencies into a streamable resource
    Bundle {
        /// Directory of loose files exported from the game archives
        #[arg(short, long)]
        corpus: PathBuf,

        /// Root entries, by virtual path or bare file name
        #[arg(required = true)]
        roots: Vec<String>,

        /// Resource name (also the package directory name)
        #[arg(short, long)]
        name: String,

        /// Directory the resource is created in
        #[arg(short, long)]
        output: PathBuf,

        /// Manifest description
        #[arg(long)]
        description: Option<String>,

        /// Manifest author
        #[arg(long)]
        author: Option<String>,

        /// Asset directory name inside the resource
        #[arg(long, default_value = crate::package::DEFAULT_ASSET_DIR)]
        asset_dir: String,

        /// Also bundle the files stored beside each drawable root
        #[arg(short, long)]
        associated: bool,

        /// TOML file overriding the resolver tables
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// Search the corpus for models by file name
    Search {
        /// Directory of loose files exported from the game archives
        #[arg(short, long)]
        corpus: PathBuf,

        /// Case-insensitive file name fragment
        query: String,

        /// Only show one model kind (ydr, yft)
        #[arg(short, long)]
        kind: Option<KindArg>,

        /// List the files stored beside each drawable hit
        #[arg(short, long)]
        associated: bool,

        /// TOML file overriding the resolver tables
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// Show the candidate names generated for a base name
    Candidates {
        /// Base name (e.g. prop_church_lectern)
        name: String,

        /// TOML file overriding the resolver tables
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// Print the resolver tables as TOML
    Tables {
        /// TOML file to load instead of the built-in tables
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
