use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guild_stats::api::state::AppState;
use guild_stats::config::AppConfig;
use guild_stats::models::{MissionStatus, Snapshot, StatusGrid, SummaryTable, ZoneProgress};
use guild_stats::pipeline::{build_dashboard, build_history, Dashboard, PipelineContext};
use guild_stats::storage::{write_status_csv, write_summary_csv, SnapshotStore};

#[derive(Parser)]
#[command(name = "guild-stats")]
#[command(about = "Territory Battle statistics dashboard for guild snapshot exports")]
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

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// List discovered snapshot files
    Snapshots,

    /// Print the guild summary of the latest snapshot
    Summary {
        /// Append the Guild Average row
        #[arg(long)]
        average: bool,

        /// Also write the table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print the special mission status grid of the latest snapshot
    Status {
        /// Also write the grid to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print a metric history across all snapshots
    History {
        /// Player name, or "Guild Average" (repeatable)
        #[arg(long = "player", required = true)]
        players: Vec<String>,

        /// Metric label (repeatable)
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,
    },

    /// Print conflict zone star progress of the latest snapshot
    Zones,

    /// Print the raw JSON of the latest snapshot
    ShowLatest,

    /// Replace the latest snapshot with the contents of a file
    EditLatest {
        /// File holding the new snapshot JSON
        #[arg(long)]
        from: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting guild-stats v{}", env!("CARGO_PKG_VERSION"));

    let store = SnapshotStore::new(
        config.data_dir.clone(),
        &config.snapshots.file_prefix,
        &config.snapshots.extension,
    )?;

    match cli.command {
        Commands::Serve { host, port } => {
            let context = PipelineContext::from_config(&config)?;
            let state = AppState::new(store, context);
            let app = guild_stats::api::build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Snapshots => {
            let snapshots = store.list_snapshots()?;
            if snapshots.is_empty() {
                println!("No snapshot files found in {:?}", store.dir());
            }
            for snapshot in snapshots.iter() {
                println!(
                    "{}  {}  {}",
                    snapshot.date,
                    snapshot.file_name(),
                    if snapshot.document.has_stats() {
                        format!("{} members", snapshot.document.member.len())
                    } else {
                        "no stat data".to_string()
                    }
                );
            }
        }
        Commands::Summary { average, csv } => {
            let context = PipelineContext::from_config(&config)?;
            let snapshots = store.list_snapshots()?;
            let dashboard = build_dashboard(&snapshots, &context, average.then_some(true));
            let Some(views) = ready_or_report(&dashboard) else {
                return Ok(());
            };

            println!("=== Guild Summary ({}) ===\n", views.date);
            print_summary(&views.summary);

            if let Some(path) = csv {
                write_summary_csv(&views.summary, create(&path)?)?;
                println!("\nWrote {}", path.display());
            }
        }
        Commands::Status { csv } => {
            let context = PipelineContext::from_config(&config)?;
            let snapshots = store.list_snapshots()?;
            let dashboard = build_dashboard(&snapshots, &context, None);
            let Some(views) = ready_or_report(&dashboard) else {
                return Ok(());
            };

            println!("=== Special Mission Status ({}) ===\n", views.date);
            print_status(&views.status);

            if let Some(path) = csv {
                write_status_csv(&views.status, create(&path)?)?;
                println!("\nWrote {}", path.display());
            }
        }
        Commands::History { players, metrics } => {
            let context = PipelineContext::from_config(&config)?;
            let snapshots = store.list_snapshots()?;
            if snapshots.is_empty() {
                println!("No snapshot files found in data folder.");
                return Ok(());
            }

            print_history(&snapshots, &context, &players, &metrics);
        }
        Commands::Zones => {
            let context = PipelineContext::from_config(&config)?;
            let snapshots = store.list_snapshots()?;
            let dashboard = build_dashboard(&snapshots, &context, None);
            let Some(views) = ready_or_report(&dashboard) else {
                return Ok(());
            };

            println!("=== Zone Progress ({}) ===\n", views.date);
            print_zones(&views.zones);
        }
        Commands::ShowLatest => {
            let (path, contents) = store.read_latest_raw()?;
            tracing::info!("Showing {:?}", path);
            println!("{}", contents);
        }
        Commands::EditLatest { from } => {
            let contents = std::fs::read_to_string(&from)
                .with_context(|| format!("reading {}", from.display()))?;
            let path = store.replace_latest(&contents)?;
            println!("Replaced {} ({} bytes)", path.display(), contents.len());
        }
    }

    Ok(())
}

/// Views of a ready dashboard; prints the reason and yields `None` otherwise.
fn ready_or_report(dashboard: &Dashboard) -> Option<&guild_stats::pipeline::DashboardViews> {
    if let Some(message) = dashboard.no_data_message() {
        println!("{}", message);
    }
    dashboard.views()
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn print_summary(summary: &SummaryTable) {
    let name_width = name_width(summary.rows.iter().map(|r| r.player.as_str()));

    print!("{:<width$}", "Player", width = name_width);
    for column in &summary.columns {
        print!("  {:>w$}", column, w = column.len());
    }
    println!();

    for row in &summary.rows {
        print!("{:<width$}", row.player, width = name_width);
        for (column, value) in summary.columns.iter().zip(&row.values) {
            print!("  {:>w$}", value, w = column.len());
        }
        println!();
    }

    if let Some(average) = &summary.average {
        print!("{:<width$}", guild_stats::GUILD_AVERAGE, width = name_width);
        for (column, value) in summary.columns.iter().zip(average) {
            print!("  {:>w$.2}", value, w = column.len());
        }
        println!();
    }
}

fn print_status(grid: &StatusGrid) {
    if grid.missions.is_empty() {
        println!("No special missions found.");
        return;
    }

    let name_width = name_width(grid.rows.iter().map(|r| r.player.as_str()));
    for (i, mission) in grid.missions.iter().enumerate() {
        let (completed, attempted, untouched) = grid.tally(mission);
        println!(
            "  [{}] {}  (completed {}, attempted {}, untouched {})",
            i + 1,
            mission,
            completed,
            attempted,
            untouched
        );
    }
    println!();

    print!("{:<width$}", "Player", width = name_width);
    for i in 0..grid.missions.len() {
        print!("  {:>4}", format!("[{}]", i + 1));
    }
    println!();

    for row in &grid.rows {
        print!("{:<width$}", row.player, width = name_width);
        for status in &row.statuses {
            print!("  {}", status_cell(*status));
        }
        println!();
    }

    println!();
    let legend: Vec<String> = MissionStatus::ALL
        .iter()
        .map(|s| format!("{} {}", status_cell(*s), s))
        .collect();
    println!("Legend: {}", legend.join("  "));
}

fn status_cell(status: MissionStatus) -> ColoredString {
    let (r, g, b) = status.rgb();
    format!("{:>4}", status.code()).black().on_truecolor(r, g, b)
}

fn print_history(
    snapshots: &[Snapshot],
    context: &PipelineContext,
    players: &[String],
    metrics: &[String],
) {
    let records = build_history(snapshots, context, players, metrics);

    for metric in metrics {
        println!("=== {} ===", metric);
        for player in players {
            let series: Vec<String> = records
                .iter()
                .filter(|r| &r.player == player && &r.metric == metric)
                .map(|r| format!("{}={}", r.date_label(), r.value))
                .collect();
            println!("  {}: {}", player, series.join("  "));
        }
        println!();
    }
}

fn print_zones(zones: &[ZoneProgress]) {
    if zones.is_empty() {
        println!("No conflict zone data.");
        return;
    }

    for zone in zones {
        let next = zone
            .next_threshold
            .map(|t| format!("next star at {}", t))
            .unwrap_or_else(|| if zone.stars == 3 { "max stars" } else { "-" }.to_string());
        println!(
            "{:<32} {:<10} {:>12}  {}*  {}",
            zone.label,
            zone.alignment.as_deref().unwrap_or("-"),
            zone.score,
            zone.stars,
            next
        );
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(str::len)
        .chain([guild_stats::GUILD_AVERAGE.len()])
        .max()
        .unwrap_or(0)
}
