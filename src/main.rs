use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use taxform::catalog::{CatalogIndex, ItemId};
use taxform::config::Config;
use taxform::form::{FormError, FormSession};
use taxform::render::{self, RenderOptions};
use taxform::rule::AppliesTo;

/// Get the config directory path (~/.config/taxform/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("taxform"))
}

#[derive(Parser, Debug)]
#[command(name = "taxform", about = "Define a tax rule and apply it to catalog items")]
struct Args {
    /// Config file (defaults to ~/.config/taxform/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON catalog of items; the built-in sample catalog is used otherwise
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Only show items whose name contains this text
    #[arg(long, value_name = "TERM", default_value = "")]
    search: String,

    /// Toggle an item by id (repeatable)
    #[arg(long = "select", value_name = "ID")]
    select: Vec<ItemId>,

    /// Select every visible item in a category (repeatable)
    #[arg(long = "select-category", value_name = "LABEL")]
    select_category: Vec<String>,

    /// Tax name
    #[arg(long, default_value = "")]
    name: String,

    /// Tax rate as a whole-number percentage
    #[arg(long, value_name = "PERCENT", default_value = "")]
    rate: String,

    /// "all" for the whole catalog, anything else for the selected items
    #[arg(long, value_name = "SCOPE")]
    applies_to: Option<AppliesTo>,

    /// Print the submitted rule as JSON
    #[arg(long)]
    json: bool,

    /// Print the grouped item list and exit without submitting
    #[arg(long)]
    list: bool,
}

fn load_catalog(path: Option<&Path>) -> Result<CatalogIndex> {
    match path {
        Some(path) => CatalogIndex::load_file(path)
            .with_context(|| format!("Failed to load catalog '{}'", path.display())),
        None => {
            tracing::debug!("No catalog configured, using the sample catalog");
            Ok(CatalogIndex::sample())
        }
    }
}

/// Apply command-line edits to the session. Unknown item ids are reported
/// and skipped; anything else aborts.
fn apply_edits(session: &mut FormSession, args: &Args) -> Result<()> {
    session.set_search(&args.search)?;

    for label in &args.select_category {
        session
            .toggle_category(label, true)
            .with_context(|| format!("Cannot select category '{}'", label))?;
    }

    for &id in &args.select {
        match session.toggle_item(id) {
            Ok(()) => {}
            Err(FormError::Selection(e)) => eprintln!("Warning: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    session.set_name(&args.name)?;
    session.set_rate(&args.rate)?;
    if let Some(applies_to) = args.applies_to {
        session.set_applies_to(applies_to)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let catalog_path = args.catalog.as_deref().or(config.catalog.as_deref());
    let catalog = load_catalog(catalog_path)?;
    if catalog.is_empty() {
        eprintln!("Warning: the catalog contains no items");
    }

    let mut session = FormSession::new(catalog, &config);
    apply_edits(&mut session, &args)?;

    let opts = RenderOptions::from(&config);
    eprint!("{}", render::render_session(&session, opts));

    if args.list {
        return Ok(());
    }

    match session.submit() {
        Ok(rule) if args.json => {
            let json = serde_json::to_string_pretty(rule).context("Failed to encode tax rule")?;
            println!("{}", json);
        }
        Ok(rule) => println!("{}", rule),
        Err(errors) => {
            eprint!("{}", render::render_errors(&errors));
            std::process::exit(1);
        }
    }

    Ok(())
}
