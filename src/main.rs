use std::fs::OpenOptions;
use std::sync::Mutex;

use memoria::cli;
use memoria::config::Config;
use tracing_subscriber::EnvFilter;

/// Log to `MEMORIA_LOG_PATH` when it opens, otherwise stderr.
fn init_logging(config: &Config) {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .parse_lossy(&config.log_filter);

    if let Some(path) = &config.log_path {
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let config = Config::from_env();
    init_logging(&config);

    let args: Vec<String> = std::env::args().collect();
    std::process::exit(cli::run_with_args(&args, &config));
}
