use std::path::PathBuf;

use clap::Parser;

use crate::utils::LONG_VERSION;

#[derive(Parser, Debug)]
#[command(author, version = LONG_VERSION.as_str(), about)]
pub struct Cli {
    /// Directory holding config.yaml / config.toml / config.json5
    #[arg(short, long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Seed for pipe placement, for reproducible runs
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Draw hitbox outlines
    #[arg(short, long)]
    pub debug: bool,
}
