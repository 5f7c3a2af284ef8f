use convenant_eval::{CollectionRegistry, StructuralCollection};

use crate::OutputFormat;

pub(crate) fn cmd_collections(output: OutputFormat, quiet: bool) {
    let registry = CollectionRegistry::standard();
    match output {
        OutputFormat::Json => {
            let structural: Vec<&str> = StructuralCollection::names().collect();
            let registry_entries: Vec<serde_json::Value> = registry
                .names()
                .map(|(name, prefix)| serde_json::json!({ "name": name, "prefix": prefix }))
                .collect();
            let json = serde_json::json!({
                "structural": structural,
                "registry": registry_entries,
            });
            println!("{}", json);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("Structural collections (per-child variables KIND_*):");
            }
            for name in StructuralCollection::names() {
                println!("  {}", name);
            }
            if !quiet {
                println!("Registry collections:");
            }
            for (name, prefix) in registry.names() {
                println!("  {:<26} [[{}_*]]", name, prefix);
            }
        }
    }
}
