use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athlete_report::calculate::{CategoryAggregator, ChartPreset, PolygonLayoutEngine};
use athlete_report::config::AppConfig;
use athlete_report::detail::{self, AGILITY_SECTION_ID};
use athlete_report::ingest::Converter;
use athlete_report::models::{svg_points, PlayerSelection, ReportDocument, ScoredCategory};
use athlete_report::roster::{self, RosterFilter, SortKey};
use athlete_report::storage::{ReportStore, StorageConfig};

#[derive(Parser)]
#[command(name = "athlete-report")]
#[command(about = "Physical-performance reports and radar charts for a football squad")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportArgs {
    /// Report document (default: latest report_*.json in <data_dir>/converted)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Player id (default: first player in the report)
    #[arg(long)]
    player: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the roster
    Players {
        #[arg(long)]
        report: Option<PathBuf>,

        /// Sort key: name, grade, position, number, growth-rate, fatigue-flag
        #[arg(long, default_value = "number")]
        sort: SortKey,

        /// Only this grade
        #[arg(long)]
        grade: Option<String>,

        /// Only this term
        #[arg(long)]
        term: Option<String>,

        /// Currently selected player id
        #[arg(long)]
        select: Option<String>,
    },

    /// Scored categories with radar and summary views, as JSON
    Scores {
        #[command(flatten)]
        target: ReportArgs,
    },

    /// Radar chart geometry
    Radar {
        #[command(flatten)]
        target: ReportArgs,

        /// Canvas preset: coach or dashboard (default: from config)
        #[arg(long)]
        preset: Option<ChartPreset>,

        /// Canvas size override in pixels
        #[arg(long)]
        size: Option<f64>,

        /// Plot the report's pre-scored categories instead of seed metrics
        #[arg(long)]
        producer_scores: bool,

        /// Print SVG point lists instead of JSON
        #[arg(long)]
        svg: bool,
    },

    /// Pre-scored categories from the report, with ranks
    Categories {
        #[command(flatten)]
        target: ReportArgs,
    },

    /// Detail sections with formatted values
    Detail {
        #[command(flatten)]
        target: ReportArgs,
    },

    /// Explain a metric
    Metric {
        /// Metric id (e.g. sprint_total_time)
        id: String,
    },

    /// Convert vendor CSV exports into a report document
    Convert {
        /// Mapping file (JSON)
        #[arg(long)]
        mapping: PathBuf,

        /// Output path (default: <data_dir>/converted/report_<date>.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting athlete-report v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Players {
            report,
            sort,
            grade,
            term,
            select,
        } => {
            let document = load_report(report.as_deref(), &storage)?;
            let filter = RosterFilter { grade, term };
            let visible = roster::sort_players(&document.players, sort, &filter);

            if visible.is_empty() {
                println!("No players match the filter.");
                return Ok(());
            }

            let selected = select.as_deref().unwrap_or("");
            let active = roster::resolve_active(&visible, selected, document.default_player_id());

            println!(
                "{:<2} {:>3}  {:<24} {:<6} {:<4} {:>7}  {}",
                "", "No", "Name", "Grade", "Pos", "Growth", "Badge"
            );
            for player in visible {
                let marker = if player.id == *active { ">" } else { "" };
                println!(
                    "{:<2} {:>3}  {:<24} {:<6} {:<4} {:>7}  {}",
                    marker,
                    player.number.map(|n| n.to_string()).unwrap_or_default(),
                    player.name,
                    player.grade.as_deref().unwrap_or("-"),
                    player.position.as_deref().unwrap_or("-"),
                    player
                        .growth_rate
                        .map(roster::format_growth_rate)
                        .unwrap_or_default(),
                    player
                        .effective_badge()
                        .map(|b| b.to_string())
                        .unwrap_or_default(),
                );
            }
        }

        Commands::Scores { target } => {
            let document = load_report(target.report.as_deref(), &storage)?;
            let selection = select_player(&document, target.player.as_deref())?;
            let aggregator = aggregator(&config, &document)?;
            print_json(&aggregator.build_scores(selection.player))?;
        }

        Commands::Radar {
            target,
            preset,
            size,
            producer_scores,
            svg,
        } => {
            let document = load_report(target.report.as_deref(), &storage)?;
            let selection = select_player(&document, target.player.as_deref())?;

            let categories: Vec<ScoredCategory> = if producer_scores {
                selection
                    .player
                    .categories
                    .iter()
                    .map(ScoredCategory::from)
                    .collect()
            } else {
                aggregator(&config, &document)?.build_categories(selection.player)
            };

            let mut engine = match preset {
                Some(preset) => PolygonLayoutEngine::preset(preset),
                None => config.layout_engine(),
            };
            if let Some(size) = size {
                if !(size > 2.0 * engine.radius_inset) {
                    bail!(
                        "Canvas size {} must exceed twice the radius inset ({})",
                        size,
                        engine.radius_inset
                    );
                }
                engine.canvas_size = size;
            }

            let geometry = engine.layout(&categories);
            if svg {
                for ring in &geometry.rings {
                    println!("ring {:.2}: {}", ring.ratio, svg_points(&ring.points));
                }
                for axis in &geometry.axes {
                    println!(
                        "axis {}: {}",
                        axis.category_id,
                        svg_points(&[geometry.center, axis.endpoint])
                    );
                }
                println!("outline: {}", geometry.outline_svg_points());
            } else {
                print_json(&geometry)?;
            }
        }

        Commands::Categories { target } => {
            let document = load_report(target.report.as_deref(), &storage)?;
            let selection = select_player(&document, target.player.as_deref())?;
            print_json(&selection.player.categories)?;
        }

        Commands::Detail { target } => {
            let document = load_report(target.report.as_deref(), &storage)?;
            let selection = select_player(&document, target.player.as_deref())?;
            let event = document.event_or_placeholder();

            println!("{} ({})  measured {}", selection.player.name, selection.player.id, event.date);
            for section in detail::detail_sections(&document, Some(selection.player.id.as_str())) {
                println!();
                match &section.vendor {
                    Some(vendor) => println!("== {} [{}] ==", section.title, vendor),
                    None => println!("== {} ==", section.title),
                }

                if section.id == AGILITY_SECTION_ID {
                    for group in detail::agility_groups(&section) {
                        println!("  -- {} --", group.label);
                        for metric in &group.metrics {
                            print_metric_row(metric);
                        }
                    }
                } else {
                    for metric in &section.metrics {
                        print_metric_row(metric);
                    }
                }
            }
        }

        Commands::Metric { id } => match detail::metric_detail(&id) {
            Some(entry) => {
                println!("{} ({})", entry.label, entry.id);
                println!("  {}", entry.description);
                println!("  Source: {}", entry.logic);
                println!("  {}", entry.evaluation.describe());
                if let Some(note) = entry.note {
                    println!("  Note: {}", note);
                }
            }
            None => bail!("Unknown metric: {}", id),
        },

        Commands::Convert { mapping, output } => {
            let output = output.unwrap_or_else(|| {
                let date = chrono::Local::now().format("%Y-%m-%d");
                storage.converted_dir().join(format!("report_{}.json", date))
            });

            let converter = Converter::from_file(&mapping)
                .with_context(|| format!("Failed to load mapping {}", mapping.display()))?;
            let document = converter
                .convert_to_file(&output)
                .context("Conversion failed")?;

            println!("Wrote {} ({} players)", output.display(), document.players.len());
        }
    }

    Ok(())
}

fn load_report(path: Option<&Path>, storage: &StorageConfig) -> Result<ReportDocument> {
    match path {
        Some(path) => ReportStore::load(path)
            .with_context(|| format!("Failed to load report {}", path.display())),
        None => {
            let store = ReportStore::from_config(storage);
            let (path, document) = store
                .latest()
                .with_context(|| format!("No report found in {}", store.dir().display()))?;
            tracing::info!("Using report {}", path.display());
            Ok(document)
        }
    }
}

fn select_player<'a>(document: &'a ReportDocument, requested: Option<&str>) -> Result<PlayerSelection<'a>> {
    let selection = document
        .resolve_player(requested)
        .context("Report contains no players")?;
    if selection.substituted {
        tracing::warn!(
            "Player {} not found, showing {} instead",
            requested.unwrap_or_default(),
            selection.player.id
        );
    }
    Ok(selection)
}

fn aggregator(config: &AppConfig, document: &ReportDocument) -> Result<CategoryAggregator> {
    let taxonomy = config.taxonomy().context("Invalid category taxonomy")?;
    Ok(CategoryAggregator::for_players(
        &document.players,
        &taxonomy,
        config.normalizer(),
    ))
}

fn print_metric_row(metric: &detail::DetailMetric) {
    let balance = metric
        .balance
        .map(|b| format!("  ({})", b))
        .unwrap_or_default();
    println!(
        "  {:<36} {:>12} -> {:<12}{}",
        metric.label, metric.previous, metric.current, balance
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
