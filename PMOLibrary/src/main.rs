mod cli;
mod collaborators;
mod logging;

use clap::Parser;
use cli::Cli;
use collaborators::{TracingEngine, TracingView};
use pmoconfig::Config;
use pmolibrary::LibraryManager;
use std::sync::Arc;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = match &args.config_dir {
        Some(dir) => Arc::new(Config::load_config(&dir.to_string_lossy())?),
        None => pmoconfig::get_config()?,
    };

    logging::init_tracing(&config);

    let view = Arc::new(TracingView);
    let engine = Arc::new(TracingEngine);
    let mut library = match &args.library {
        Some(path) => LibraryManager::open(path.clone(), view, engine),
        None => LibraryManager::open_with_config(&config, view, engine)?,
    };
    info!(path = %library.location().display(), "Library opened");

    let autosave = args.save || config.get_library_autosave()?;
    cli::run_command(&args.command, &mut library, autosave)
}
