//! `omniscope` command line.
//!
//! Offline reports run over a snapshot JSON file (one array per entity, as the
//! backend lists them). Widget layout and calendar import use the local
//! database; `download` talks to the configured API.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use omniscope_lib::aggregate::{build_directory, group_by_week};
use omniscope_lib::calendar_import::import_calendar;
use omniscope_lib::client::{AnalyticsApi, HttpClient, Snapshot, SnapshotClient};
use omniscope_lib::config::{load_config, load_config_from, Config};
use omniscope_lib::dates::today_in;
use omniscope_lib::db::LocalDb;
use omniscope_lib::layout::{WidgetLayout, DEFAULT_WIDGETS};
use omniscope_lib::views::{PeopleAction, PeopleSort, PeopleView};
use omniscope_lib::{AppError, Notice};

#[derive(Debug, Parser)]
#[command(name = "omniscope", version, about = "OmniScope meeting intelligence")]
struct Cli {
    /// Config file (defaults to ~/.omniscope/config.json)
    #[arg(long, global = true, env = "OMNISCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Timezone override, e.g. America/New_York
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// People directory built from meeting participants
    People {
        snapshot: PathBuf,
        /// Match name, organization or email
        #[arg(long)]
        search: Option<String>,
        /// Only people seen with this organization
        #[arg(long)]
        org: Option<String>,
        /// Order by most recent meeting instead of meeting count
        #[arg(long)]
        recent: bool,
    },
    /// Meetings grouped by week, newest first
    Weeks {
        snapshot: PathBuf,
        /// Reference date for This Week / Last Week (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Rollup for one day
    Daily {
        snapshot: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Rollup for the week containing a date
    Weekly {
        snapshot: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Dashboard stats
    Dashboard {
        snapshot: PathBuf,
    },
    /// Dashboard widget order
    Widgets {
        #[command(subcommand)]
        action: WidgetAction,
    },
    /// Import a Google Calendar events payload into the local database
    ImportCalendar {
        file: PathBuf,
    },
    /// Imported calendar events starting in [FROM, TO)
    Events {
        /// Inclusive lower bound, e.g. 2026-02-01
        from: String,
        /// Exclusive upper bound
        to: String,
    },
    /// Fetch a file from a binary API endpoint
    Download {
        /// Endpoint path, e.g. /api/calendar/export.ics
        path: String,
        /// Output file or directory
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum WidgetAction {
    Show,
    /// Move the widget at FROM to index TO
    Move { from: usize, to: usize },
    /// Shift a widget by DELTA positions
    Nudge {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: isize,
    },
    Reset,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let notice = Notice::from(&e);
        eprintln!("Error: {}", notice.message);
        eprintln!("  {}", notice.recovery_suggestion);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .map_err(AppError::Config)?;
    if let Some(tz) = cli.timezone {
        config.timezone = tz;
    }
    let tz = config.tz();

    match cli.command {
        Command::People {
            snapshot,
            search,
            org,
            recent,
        } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let people = build_directory(&snapshot.meetings, &snapshot.known_contacts(), &tz);

            let mut view = PeopleView::default().reduce(PeopleAction::FilterOrganization(org));
            if let Some(search) = search {
                view = view.reduce(PeopleAction::Search(search));
            }
            if recent {
                view = view.reduce(PeopleAction::SortBy(PeopleSort::RecentlySeen));
            }
            print_json(&view.apply(&people, &tz))
        }
        Command::Weeks { snapshot, today } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let today = today.unwrap_or_else(|| today_in(&tz));
            print_json(&group_by_week(&snapshot.meetings, today, &tz))
        }
        Command::Daily { snapshot, date } => {
            let client = snapshot_client(&snapshot, &config)?;
            let date = date.unwrap_or_else(|| today_in(&tz));
            print_json(&client.daily_summary(date).await?)
        }
        Command::Weekly { snapshot, date } => {
            let client = snapshot_client(&snapshot, &config)?;
            let date = date.unwrap_or_else(|| today_in(&tz));
            print_json(&client.weekly_summary(date).await?)
        }
        Command::Dashboard { snapshot } => {
            let client = snapshot_client(&snapshot, &config)?;
            print_json(&client.dashboard().await?)
        }
        Command::Widgets { action } => {
            let db = open_db(&config)?;
            let layout = WidgetLayout::new(&db);
            let order = match action {
                WidgetAction::Show => layout.load()?,
                WidgetAction::Move { from, to } => {
                    let len = DEFAULT_WIDGETS.len();
                    if from >= len || to >= len {
                        return Err(AppError::InvalidInput(format!(
                            "Widget index out of range (0..{})",
                            len
                        )));
                    }
                    layout.reorder(from, to)?
                }
                WidgetAction::Nudge { id, delta } => {
                    if !DEFAULT_WIDGETS.contains(&id.as_str()) {
                        return Err(AppError::InvalidInput(format!("Unknown widget '{}'", id)));
                    }
                    layout.nudge(&id, delta)?
                }
                WidgetAction::Reset => layout.reset()?,
            };
            print_json(&order)
        }
        Command::ImportCalendar { file } => {
            let content = std::fs::read_to_string(&file)?;
            let payload: serde_json::Value = serde_json::from_str(&content)?;
            let db = open_db(&config)?;
            print_json(&import_calendar(&db, &payload)?)
        }
        Command::Events { from, to } => {
            let db = open_db(&config)?;
            print_json(&db.get_calendar_events_between(&from, &to)?)
        }
        Command::Download { path, out } => {
            let client = HttpClient::from_config(&config)?;
            let file = client.download(&path).await?;
            let saved = file.save_to(&out)?;
            println!("{}", saved.display());
            Ok(())
        }
    }
}

fn snapshot_client(path: &Path, config: &Config) -> Result<SnapshotClient, AppError> {
    let snapshot = Snapshot::load(path)?;
    Ok(SnapshotClient::new(snapshot, config.tz(), config.top_n))
}

fn open_db(config: &Config) -> Result<LocalDb, AppError> {
    let db = match config.db_path() {
        Some(path) => LocalDb::open_at(path)?,
        None => LocalDb::open()?,
    };
    Ok(db)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
