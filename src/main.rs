mod error;
mod pages;
mod routes;
mod server;
mod session;

use anyhow::Error;
use clap::{App, Arg};
use config::Config;
use controller::{Controller, MemoryController};
use movie_lens_100k::dataset::{load_into, Dataset};
use movie_lens_100k::MovieLensController;
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG: &str = "config.toml";

fn log_level(config: &Config, verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => config.server.log_level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn seed<C: Controller>(controller: &C, dir: Option<&str>, config: &Config) -> Result<(), Error> {
    let dir = match dir {
        Some(dir) => dir,
        None => return Ok(()),
    };

    log::info!("Seeding from {}", dir);
    let dataset = Dataset::open(dir)?;
    let summary = load_into(
        controller,
        &dataset,
        Some(&config.judgment),
        true,
    )?;

    log::info!(
        "Seeded {} users, {} movies and {} ratings ({} skipped)",
        summary.users,
        summary.movies,
        summary.ratings,
        summary.skipped
    );

    Ok(())
}

fn run<C: Controller + 'static>(controller: C, dir: Option<&str>, config: Config) -> Result<(), Error> {
    seed(&controller, dir, &config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(controller, config))
}

fn main() -> Result<(), Error> {
    let matches = App::new("movie-ratings")
        .version(VERSION)
        .about("Rate movies and hear what the eye thinks of your taste")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file (defaults to ./config.toml when present)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("DIR")
                .help("Load a MovieLens 100k dataset directory before serving")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more, repeat for trace output"),
        )
        .get_matches();

    let config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)?,
        None => Config::default(),
    };
    let config = config.with_database_url(dotenv::var("DATABASE_URL").ok());

    TermLogger::init(
        log_level(&config, matches.occurrences_of("verbose")),
        LogConfig::default(),
        TerminalMode::Mixed,
    )?;

    log::info!("Starting movie-ratings {}", VERSION);
    let dir = matches.value_of("seed");

    match config.database.url.clone() {
        Some(url) => {
            let controller = MovieLensController::with_url(&url, config.database.pool_size)?;
            run(controller, dir, config)
        }

        None => {
            log::warn!("No database configured, ratings will be kept in memory");
            run(MemoryController::new(), dir, config)
        }
    }
}
