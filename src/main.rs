use std::fs::File;
use std::path::PathBuf;

use cinema::Platform;
use cinema::core::config::{self, CinemaConfig, ConfigSource};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "cinema", about = "Search OMDb and save movie posters from the terminal")]
struct Args {
    /// How downloads are gated (overrides config and CINEMA_PLATFORM)
    #[arg(short, long, value_enum)]
    platform: Option<Platform>,

    /// Term searched on startup instead of the configured default
    #[arg(short, long)]
    query: Option<String>,

    /// Directory posters are saved into
    #[arg(short, long)]
    download_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to cinema.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("cinema.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok((file_config, ConfigSource::File(path))) => {
            log::info!("Loaded config from {}", path.display());
            file_config
        }
        Ok((file_config, ConfigSource::Seeded(path))) => {
            log::info!("No config file found, wrote a template to {}", path.display());
            file_config
        }
        Ok((file_config, ConfigSource::Defaults)) => file_config,
        Err(e) => {
            log::warn!("{}; falling back to defaults", e);
            CinemaConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.platform, args.download_dir.as_deref());

    log::info!(
        "Cinema starting up on {:?} platform, saving to {}",
        resolved.platform,
        resolved.download_dir.display()
    );

    cinema::tui::run(resolved, args.query)
}
