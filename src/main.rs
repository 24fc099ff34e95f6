use clap::Parser;
use sidekick::core::config::{load_config, resolve, should_mount};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "sidekick", about = "Embeddable AI support chat for the terminal")]
struct Args {
    /// Backend base URL (overrides the config file and SIDEKICK_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Page path this instance is embedded on, checked against mount exclusions
    #[arg(long, default_value = "/")]
    context: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sidekick.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("sidekick.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Sidekick starting up");

    let config = load_config().map_err(std::io::Error::other)?;
    let resolved = resolve(&config, args.base_url.as_deref());

    if !should_mount(&args.context, &resolved.excluded_markers) {
        log::info!("Not mounting: context path {:?} is excluded", args.context);
        println!("The chat widget is disabled on {}", args.context);
        return Ok(());
    }

    sidekick::tui::run(resolved)
}
