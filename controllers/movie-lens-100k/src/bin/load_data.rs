use anyhow::Error;
use config::Config;
use movie_lens_100k::dataset::{load_into, Dataset};
use movie_lens_100k::MovieLensController;
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

// usage: load_data [DATASET_DIR] [CONFIG]
fn main() -> Result<(), Error> {
    TermLogger::init(LevelFilter::Info, LogConfig::default(), TerminalMode::Mixed)?;

    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "data/ml-100k".into());

    let config = match args.next() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_database_url(dotenv::var("DATABASE_URL").ok());

    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;

    let controller = MovieLensController::with_url(url, config.database.pool_size)?;

    log::info!("Reading dataset from {}", dir);
    let dataset = Dataset::open(&dir)?;

    load_into(
        &controller,
        &dataset,
        Some(&config.judgment),
        true,
    )?;

    Ok(())
}
