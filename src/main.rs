pub mod action;
pub mod app;
pub mod assets;
pub mod cli;
pub mod components;
pub mod config;
pub mod game;
pub mod tui;
pub mod utils;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{
    app::App,
    cli::Cli,
    config::Config,
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = Cli::parse();
    let mut config = match &args.config_dir {
        Some(dir) => Config::load(dir)?,
        None => Config::new()?,
    };
    config.game.debug |= args.debug;

    let mut app = App::new(config, args.seed)?;
    let score = app.run().await?;
    println!("Game over! Score: {score}");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
