use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, info, subscriber::set_global_default};
use tracing_subscriber::EnvFilter;

use bookgraph_analysis::{
    ConnectionGraphBuilder, Deduplicator, EnrichmentPipeline, LocalCatalogProvider, SearchField,
    plot_tags, theme_tags,
};
use bookgraph_core::io::{parse_goodreads_csv_with_progress, read_collection, write_export};
use bookgraph_core::{BookgraphConfig, CatalogItem};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "bookgraph",
    about = "Connection inference and deduplication for book collections",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting BOOKGRAPH_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer connections between the items of a collection.
    Connections {
        collection: PathBuf,
        /// Only show edges at least this strong.
        #[arg(long, default_value = "0.0")]
        min_strength: f64,
    },

    /// Merge an import file into a collection.
    Import {
        file: PathBuf,
        /// Collection to merge into (created if missing).
        #[arg(long)]
        into: PathBuf,
        /// Treat the import file as a Goodreads CSV export.
        #[arg(long)]
        goodreads: bool,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Report duplicate records in a collection.
    Dedup {
        collection: PathBuf,
        /// Rewrite the collection without the duplicates.
        #[arg(long)]
        write: bool,
    },

    /// Show the language, keywords, themes and plot elements of one item.
    Inspect { collection: PathBuf, id: String },

    /// Fill missing metadata from reference catalogs.
    Enrich {
        collection: PathBuf,
        /// Primary reference catalog (native collection file).
        #[arg(long)]
        reference: PathBuf,
        /// Secondary reference catalog, consulted when data is still missing.
        #[arg(long)]
        secondary: Option<PathBuf>,
        /// Write the enriched collection back.
        #[arg(long)]
        write: bool,
    },

    /// Search reference catalogs, merging their results.
    Search {
        query: String,
        #[arg(long, value_enum, default_value = "title")]
        field: FieldArg,
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        secondary: Option<PathBuf>,
    },

    /// Print the effective configuration.
    Config {
        /// Print the config file path instead.
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Title,
    Author,
    Isbn,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => SearchField::Title,
            FieldArg::Author => SearchField::Author,
            FieldArg::Isbn => SearchField::Isbn,
        }
    }
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing(1u8.saturating_add(cli.verbose).saturating_sub(cli.quiet));

    let json_output = cli.json || std::env::var("BOOKGRAPH_JSON").as_deref() == Ok("1");

    let config_path = cli.config.clone().unwrap_or_else(BookgraphConfig::config_path);
    let config = BookgraphConfig::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    config.validate()?;
    debug!(path = %config_path.display(), "config loaded");

    match cli.command {
        // ── Connections ────────────────────────────────────────────────────
        Commands::Connections {
            collection,
            min_strength,
        } => {
            let items = load_collection(&collection)?;
            let builder = ConnectionGraphBuilder::from_config(&config.analysis);
            let mut edges = builder.build_connections(&items);
            edges.retain(|edge| edge.strength >= min_strength);
            edges.sort_by(|a, b| b.strength.total_cmp(&a.strength));

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": edges,
                    "meta": {"items": items.len(), "duration_ms": start.elapsed().as_millis()}
                }))?;
            } else if edges.is_empty() {
                println!("No connections found among {} item(s).", items.len());
            } else {
                let titles = title_lookup(&items);
                for edge in &edges {
                    println!(
                        "{:.2}  {} — {}  [{}]",
                        edge.strength,
                        titles(edge.source.as_str()),
                        titles(edge.target.as_str()),
                        edge.kind
                    );
                    println!("      {}", edge.reason);
                }
            }
        }

        // ── Import ─────────────────────────────────────────────────────────
        Commands::Import {
            file,
            into,
            goodreads,
            dry_run,
        } => {
            let dedup = Deduplicator::from_config(&config.dedup);

            let batch = if goodreads {
                let reader = BufReader::new(
                    File::open(&file).with_context(|| format!("opening {}", file.display()))?,
                );
                let rows = parse_goodreads_csv_with_progress(reader, |current, total, message| {
                    debug!(current, total, "{message}");
                })?;
                let listed = dedup.dedup_list(&rows);
                if listed.duplicates_count > 0 {
                    info!("dropped {} duplicate row(s) from the export", listed.duplicates_count);
                }
                listed.unique
            } else {
                load_collection(&file)?
            };

            let existing = if into.exists() {
                load_collection(&into)?
            } else {
                Vec::new()
            };

            let outcome = dedup.process_import_with_progress(
                &batch,
                &existing,
                |current, total, message| debug!(current, total, "{message}"),
            );

            if !dry_run {
                write_export(&into, &outcome.updated)
                    .with_context(|| format!("writing {}", into.display()))?;
            }

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "imported": batch.len(),
                        "new": outcome.new_items.len(),
                        "merged": outcome.merge_groups,
                        "total": outcome.updated.len(),
                        "written": !dry_run,
                    },
                    "meta": {"duration_ms": start.elapsed().as_millis()}
                }))?;
            } else {
                for group in &outcome.merge_groups {
                    println!(
                        "  Merged: {} ← {} ({})",
                        group.original_items[0].title, group.original_items[1].title, group.reason
                    );
                }
                for item in &outcome.new_items {
                    println!("  Added: {}", item.title);
                }
                println!(
                    "Imported {} record(s): {} new, {} merged, {} total{}.",
                    batch.len(),
                    outcome.new_items.len(),
                    outcome.merge_groups.len(),
                    outcome.updated.len(),
                    if dry_run { " (dry run)" } else { "" }
                );
            }
        }

        // ── Dedup ──────────────────────────────────────────────────────────
        Commands::Dedup { collection, write } => {
            let items = load_collection(&collection)?;
            let outcome = Deduplicator::from_config(&config.dedup).dedup_list(&items);

            if write && outcome.duplicates_count > 0 {
                write_export(&collection, &outcome.unique)?;
            }

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "total": items.len(),
                        "unique": outcome.unique.len(),
                        "duplicates": outcome.duplicates_count,
                    },
                    "meta": {"duration_ms": start.elapsed().as_millis()}
                }))?;
            } else if outcome.duplicates_count == 0 {
                println!("No duplicates among {} item(s).", items.len());
            } else {
                println!(
                    "{} duplicate(s) among {} item(s); {} unique{}.",
                    outcome.duplicates_count,
                    items.len(),
                    outcome.unique.len(),
                    if write { ", collection rewritten" } else { "" }
                );
            }
        }

        // ── Inspect ────────────────────────────────────────────────────────
        Commands::Inspect { collection, id } => {
            let items = load_collection(&collection)?;
            let Some(item) = items.iter().find(|item| item.id == id) else {
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "error",
                        "error": "not_found",
                        "message": format!("Item {id} not found")
                    }))?;
                } else {
                    eprintln!("Item not found: {id}");
                }
                std::process::exit(2);
            };

            let builder = ConnectionGraphBuilder::from_config(&config.analysis);
            let analysis = builder.analyzer().analyze(item);
            let text = item.description_text();
            let themes = theme_tags(text, analysis.language);
            let plots = plot_tags(text, analysis.language);

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "item": item,
                        "analysis": analysis,
                        "themeTags": themes,
                        "plotTags": plots,
                    }
                }))?;
            } else {
                println!("{} — {}", item.title, item.author);
                println!("  language:  {} ({})", analysis.language.name(), analysis.language);
                println!("  keywords:  {}", analysis.keywords.join(", "));
                println!("  themes:    {}", join_set(&analysis.themes));
                println!("  plots:     {}", join_set(&analysis.plots));
                println!(
                    "  tags:      {}",
                    themes.iter().chain(plots.iter()).copied().collect::<Vec<_>>().join(", ")
                );
            }
        }

        // ── Enrich ─────────────────────────────────────────────────────────
        Commands::Enrich {
            collection,
            reference,
            secondary,
            write,
        } => {
            let items = load_collection(&collection)?;
            let pipeline = build_pipeline(&config, &reference, secondary.as_deref())?;

            let runtime = tokio::runtime::Runtime::new()?;
            let (enriched, report) = runtime.block_on(pipeline.enrich_collection(
                &items,
                |current, total, message| debug!(current, total, "{message}"),
            ));

            if write && report.enriched > 0 {
                write_export(&collection, &enriched)?;
            }

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "total": items.len(),
                        "enriched": report.enriched,
                        "sources": report.sources_used,
                        "errors": report.errors,
                    },
                    "meta": {"duration_ms": start.elapsed().as_millis()}
                }))?;
            } else {
                println!("Enriched {} of {} item(s).", report.enriched, items.len());
                for error in &report.errors {
                    eprintln!("  error: {error}");
                }
            }
        }

        // ── Search ─────────────────────────────────────────────────────────
        Commands::Search {
            query,
            field,
            reference,
            secondary,
        } => {
            let pipeline = build_pipeline(&config, &reference, secondary.as_deref())?;
            let runtime = tokio::runtime::Runtime::new()?;
            let results = runtime.block_on(pipeline.hybrid_search(&query, field.into()));

            if json_output {
                print_json(&serde_json::json!({"status": "ok", "data": results}))?;
            } else if results.is_empty() {
                println!("No results for: {query}");
            } else {
                println!("Found {} results:", results.len());
                for item in &results {
                    println!("  {} — {} ({})", item.title, item.author, item.id);
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { path } => {
            if path {
                println!("{}", config_path.display());
            } else if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": serde_json::to_value(&config)?,
                }))?;
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    debug!("done in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    let _ = set_global_default(subscriber);
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn load_collection(path: &Path) -> Result<Vec<CatalogItem>> {
    if !path.exists() {
        bail!("collection not found: {}", path.display());
    }
    read_collection(path).with_context(|| format!("reading {}", path.display()))
}

fn build_pipeline(
    config: &BookgraphConfig,
    reference: &Path,
    secondary: Option<&Path>,
) -> Result<EnrichmentPipeline> {
    let primary = LocalCatalogProvider::new(source_name(reference), load_collection(reference)?);
    let mut pipeline = EnrichmentPipeline::from_config(Arc::new(primary), &config.enrichment);
    if let Some(path) = secondary {
        let provider = LocalCatalogProvider::new(source_name(path), load_collection(path)?);
        pipeline = pipeline.with_secondary(Arc::new(provider));
    }
    Ok(pipeline)
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference".to_string())
}

/// Id → title, falling back to the id itself.
fn title_lookup(items: &[CatalogItem]) -> impl Fn(&str) -> String + '_ {
    move |id| {
        items
            .iter()
            .find(|item| item.id == id)
            .map_or_else(|| id.to_string(), |item| item.title.clone())
    }
}

fn join_set(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
