use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routegen::registry::loader::{load_placements, load_registry};
use routegen::schema::{FileSchemaLoader, SchemaLoader};
use routegen::RuleDerivationEngine;

#[derive(Parser)]
#[command(name = "routegen-cli")]
#[command(about = "Derive routing rules from a component registry snapshot", long_about = None)]
struct Cli {
    /// Registry snapshot (JSON).
    #[arg(short, long)]
    registry: PathBuf,

    /// Placement records (JSON), pre-sorted by ordering key.
    #[arg(short, long)]
    placements: PathBuf,

    /// Root directory of per-extension schema files (tables.toml).
    #[arg(short, long)]
    schema_root: Option<PathBuf>,

    /// Existing configuration (JSON) to merge the derived rules into.
    #[arg(short, long)]
    base_config: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact instead of pretty-printed JSON.
    #[arg(long)]
    compact: bool,
}

/// Loader used when no schema root is configured: every entity table
/// resolves without a label field.
struct NoSchemaRoot;

impl SchemaLoader for NoSchemaRoot {
    fn load_table_schema(&self, _extension: &str, _table: &str) -> Option<String> {
        None
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routegen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let registry = load_registry(&cli.registry)?;
    let placements = load_placements(&cli.placements)?;
    tracing::info!(
        extensions = registry.extensions.len(),
        placements = placements.len(),
        "Inputs loaded"
    );

    let table = match &cli.schema_root {
        Some(root) => {
            let mut engine =
                RuleDerivationEngine::new(&registry, &placements, FileSchemaLoader::new(root));
            engine.build()
        }
        None => {
            let mut engine = RuleDerivationEngine::new(&registry, &placements, NoSchemaRoot);
            engine.build()
        }
    };
    tracing::info!(entries = table.fixed_post_vars.len(), "Derivation complete");

    let document = match &cli.base_config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let mut base: serde_json::Value = serde_json::from_str(&content)?;
            table.merge_into(&mut base);
            base
        }
        None => serde_json::to_value(&table)?,
    };

    let rendered = if cli.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };

    match &cli.output {
        Some(path) => std::fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }

    Ok(())
}
