mod app;
mod cli;
mod config;
mod core;
mod error;
mod logging;
mod ui;

use crate::{
    app::App,
    cli::Command,
    config::Config,
    core::{LocalFs, ShellExecutor},
    error::AppResult,
};

fn main() -> AppResult<()> {
    let command = match cli::parse_args(std::env::args()) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("{error}");
            eprintln!("{}", cli::usage());
            std::process::exit(2);
        }
    };
    let start = match command {
        Command::Version => {
            println!("{}", cli::version_line(env!("CARGO_PKG_VERSION")));
            return Ok(());
        }
        Command::Help => {
            println!("{}", cli::usage());
            return Ok(());
        }
        Command::Browse { start } => start,
    };

    let config = Config::load();
    if let Some(path) = logging::init() {
        tracing::info!(log = %path.display(), "millpane starting");
    }
    let start_dir = match start {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let fs = LocalFs::new(config.show_hidden);
    let executor = ShellExecutor::new();
    let app = App::load(&start_dir, &fs, config.scroll_multiplier)?;
    ui::run(app, &config, &fs, &executor)
}
