//! Resource manifest generation

use crate::archive::AssetKind;
use crate::resolver::ResolvedSet;
use crate::tables::{Directive, ResolverTables};

use super::PackageOptions;

/// Manifest file name
pub const MANIFEST_FILE: &str = "fxmanifest.lua";

/// Loader script body, written when a fragment or placement map is packaged
pub const LOADER_SCRIPT: &str = r"-- Generated by FxBundler
local resource = GetCurrentResourceName()

AddEventHandler('onClientResourceStart', function(name)
    if name ~= resource then
        return
    end
    print(('[%s] streamed assets registered'):format(resource))
end)
";

/// The directives a package's manifest carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Resource name
    pub name: String,
    /// Resource description
    pub description: String,
    /// Resource author
    pub author: Option<String>,
    /// `files` block entries, relative to the package root
    pub files: Vec<String>,
    /// `data_file` directives, patterns relative to the package root
    pub data_files: Vec<Directive>,
    /// Loader script file name, when one is emitted
    pub loader_script: Option<String>,
}

impl Manifest {
    /// Build the manifest for the kinds present in a resolved set
    #[must_use]
    pub fn for_resolved(options: &PackageOptions, tables: &ResolverTables, resolved: &ResolvedSet) -> Self {
        Self::build(
            options,
            tables,
            resolved.has_kind(AssetKind::Fragment),
            resolved.has_kind(AssetKind::PlacementMap),
        )
    }

    /// Build a manifest.
    ///
    /// The model directives are always present. Vehicle directives need a
    /// fragment, placement directives need a placement map, and either one
    /// brings in the loader script.
    #[must_use]
    pub fn build(
        options: &PackageOptions,
        tables: &ResolverTables,
        has_fragment: bool,
        has_placement: bool,
    ) -> Self {
        let asset_dir = options.asset_dir.trim_matches('/');
        let in_assets = |pattern: &str| format!("{asset_dir}/{pattern}");

        let mut directives: Vec<&Directive> = tables.model_directives.iter().collect();
        if has_fragment {
            directives.extend(&tables.vehicle_directives);
        }
        if has_placement {
            directives.extend(&tables.placement_directives);
        }

        Self {
            name: options.name.trim().to_string(),
            description: options.description.clone(),
            author: options.author.clone(),
            files: tables.file_globs.iter().map(|g| in_assets(g)).collect(),
            data_files: directives
                .into_iter()
                .map(|d| Directive::new(&d.name, &in_assets(&d.pattern)))
                .collect(),
            loader_script: (has_fragment || has_placement).then(|| tables.loader_script.clone()),
        }
    }

    /// Whether a `data_file` directive with this name is present
    #[must_use]
    pub fn has_directive(&self, name: &str) -> bool {
        self.data_files.iter().any(|d| d.name == name)
    }

    /// Render the manifest as Lua
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("fx_version 'cerulean'\n");
        out.push_str("game 'gta5'\n\n");

        out.push_str(&format!("name '{}'\n", escape_lua(&self.name)));
        out.push_str(&format!("description '{}'\n", escape_lua(&self.description)));
        if let Some(author) = &self.author {
            out.push_str(&format!("author '{}'\n", escape_lua(author)));
        }

        out.push_str("\nfiles {\n");
        let files: Vec<String> = self.files.iter().map(|f| format!("    '{}'", escape_lua(f))).collect();
        out.push_str(&files.join(",\n"));
        out.push_str("\n}\n\n");

        for directive in &self.data_files {
            out.push_str(&format!(
                "data_file '{}' '{}'\n",
                escape_lua(&directive.name),
                escape_lua(&directive.pattern)
            ));
        }

        if let Some(script) = &self.loader_script {
            out.push_str(&format!("\nclient_script '{}'\n", escape_lua(script)));
        }
        out
    }
}

/// Escape text for a single-quoted Lua string
fn escape_lua(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n")
}
