use clap::Parser;
use procbar::IconStyle;
use procbar::core::config;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "procbar", about = "Background file-operation tracker")]
struct Args {
    /// Glyph set for icons (overrides config)
    #[arg(short, long, value_enum)]
    icons: Option<IconStyle>,

    /// Log file path
    #[arg(long, default_value = "procbar.log")]
    log_file: PathBuf,

    /// Read config from this file instead of ~/.procbar/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let (file_config, config_error) = match loaded {
        Ok(c) => (c, None),
        Err(e) => (config::ProcbarConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&file_config, args.icons);

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Falling back to default config: {}", e);
    }
    log::info!("procbar starting up with {:?}", resolved);

    procbar::tui::run(resolved).await
}
