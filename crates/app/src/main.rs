use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use puzzle_core::model::PuzzleId;
use services::{
    AppServices, CatalogSource, Clock, LoadedCatalog, ProgressService, PuzzleController,
    PuzzleListService,
};
use storage::repository::Storage;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://puzzles.sqlite3";
const DEFAULT_CATALOG: &str = "puzzles/puzzles.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPuzzleId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidCatalog { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPuzzleId { raw } => write!(f, "invalid --puzzle-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCatalog { raw } => write!(f, "invalid --catalog value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    launch_puzzle: Option<PuzzleId>,
}

impl UiApp for DesktopApp {
    fn start_controller(&self) -> PuzzleController {
        self.services.start_controller()
    }

    fn catalog(&self) -> Option<LoadedCatalog> {
        self.services.catalog().cloned()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn puzzle_list(&self) -> Arc<PuzzleListService> {
        self.services.puzzle_list()
    }

    fn launch_puzzle(&self) -> Option<String> {
        self.launch_puzzle.as_ref().map(|id| id.as_str().to_string())
    }
}

struct Args {
    db_url: String,
    catalog: String,
    puzzle_id: Option<PuzzleId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  picture_puzzle play  [--db <sqlite_url>] [--catalog <url-or-path>] [--puzzle-id <id>]");
    eprintln!("  picture_puzzle reset [--db <sqlite_url>]  # forget progress and achievements");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --catalog {DEFAULT_CATALOG}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PUZZLE_DB_URL, PUZZLE_CATALOG, PUZZLE_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PUZZLE_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut catalog =
            std::env::var("PUZZLE_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG.into());
        let mut puzzle_id = std::env::var("PUZZLE_ID")
            .ok()
            .and_then(|value| value.parse::<PuzzleId>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    let value = require_value(args, "--catalog")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidCatalog { raw: value });
                    }
                    catalog = value;
                }
                "--puzzle-id" => {
                    let value = require_value(args, "--puzzle-id")?;
                    let parsed: PuzzleId = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPuzzleId { raw: value.clone() })?;
                    puzzle_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            catalog,
            puzzle_id,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::from_default_env()
        .add_directive("picture_puzzle=info".parse()?)
        .add_directive("services=info".parse()?)
        .add_directive("storage=info".parse()?);
    tracing_subscriber::registry()
        .with(tracing_fmt::layer())
        .with(filter)
        .init();
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching the game when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing()?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Play => {
            let source = CatalogSource::parse(&parsed.catalog)?;
            let services =
                AppServices::new_sqlite(&parsed.db_url, source, Clock::default_clock()).await?;
            tracing::info!(db = %parsed.db_url, "storage ready");

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                launch_puzzle: parsed.puzzle_id,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            // Explicitly disable it so the app doesn't behave like a modal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Picture Puzzle")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Reset => {
            let storage = Storage::sqlite(&parsed.db_url).await?;
            ProgressService::new(Arc::clone(&storage.progress))
                .reset()
                .await?;
            tracing::info!(db = %parsed.db_url, "progress reset");
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
