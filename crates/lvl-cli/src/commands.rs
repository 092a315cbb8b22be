use std::sync::Arc;

use chrono::{DateTime, Local};
use colored::Colorize;
use lvl_catalog::Catalog;
use lvl_ledger::MetadataLedger;
use lvl_server::{wire, LevelServer, ServerConfig};
use lvl_store::FileLevelStore;
use lvl_types::LevelId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.root)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::List(args) => cmd_list(config, args),
        Command::Check(args) => cmd_check(args),
    }
}

/// Config file (or defaults), then command-line overrides.
fn resolve_config(
    path: Option<&std::path::Path>,
    root: Option<std::path::PathBuf>,
) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(root) = root {
        config.data_root = root;
    }
    Ok(config)
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.no_cors {
        config.cors = false;
    }
    let server = LevelServer::open(config)?;
    println!(
        "{} levelhub on {} (levels: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().levels_path().display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Catalog over the data root whose ledger is never written back.
///
/// A running server owns `details.json`; backfills made while listing stay
/// in this process.
fn offline_catalog(config: &ServerConfig) -> anyhow::Result<Catalog> {
    let store = FileLevelStore::open(config.levels_path())?;
    let ledger = MetadataLedger::open_detached(config.ledger_path());
    Ok(Catalog::new(Arc::new(store), Arc::new(ledger)))
}

fn cmd_list(config: ServerConfig, args: ListArgs) -> anyhow::Result<()> {
    let entries = offline_catalog(&config)?.list()?;

    if args.raw {
        println!("{}", wire::listing(&entries));
        return Ok(());
    }
    if entries.is_empty() {
        println!("No levels published.");
        return Ok(());
    }
    for entry in &entries {
        let created = DateTime::from_timestamp(entry.created_at, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".into());
        println!(
            "{:<20} {:<25} {:>6} views  {}",
            entry.id.name().bold(),
            entry.id.author().cyan(),
            entry.view_count,
            created.dimmed()
        );
    }
    println!("{} level(s)", entries.len());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let mut rejected = 0usize;
    for raw in &args.ids {
        match LevelId::parse(raw) {
            Ok(id) => println!(
                "{} {:?}  name: {}  author: {}",
                "✓".green().bold(),
                raw,
                id.name().bold(),
                id.author().cyan()
            ),
            Err(e) => {
                rejected += 1;
                println!(
                    "{} {:?}  {} ({})",
                    "✗".red().bold(),
                    raw,
                    e,
                    wire::id_error_body(&e).yellow()
                );
            }
        }
    }
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} id(s) rejected", args.ids.len());
    }
    Ok(())
}
