use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lvl",
    about = "levelhub — publish and fetch community-made levels",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides `data_root` from the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the levelhub HTTP server
    Serve(ServeArgs),
    /// List stored levels with their view counts, without writing the ledger
    List(ListArgs),
    /// Check whether level ids are acceptable
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Do not send CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Print exactly what `/list` would return
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
}
