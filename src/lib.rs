// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod format;
pub mod fs;
pub mod logging;
pub mod notifier;
pub mod runner;
pub mod session;
pub mod suite;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::CommandEngine;
use crate::errors::Result;
use crate::format::SummaryFormatter;
use crate::runner::Runner;
use crate::session::{HostEvent, Session, SessionOptions};
use crate::watch::RuleSet;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the runner and its engine / formatter / notifier
/// - (optional) file watcher
/// - Enter on stdin (run all) and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path, args.runner_overrides())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let rules = RuleSet::from_config(&cfg.watch)?;

    let engine = CommandEngine::new(
        cfg.engine.cmd.clone(),
        root.clone(),
        cfg.runner.rails_environment_file.clone(),
    )?;
    let formatter = Box::new(SummaryFormatter::new(cfg.runner.formatter));
    let notifier = notifier::from_config(&cfg.notifier);

    let runner = Runner::from_options(cfg.runner.clone(), engine, formatter, notifier)
        .with_root(root.clone());

    let (host_tx, host_rx) = mpsc::channel::<HostEvent>(64);

    // Optional file watcher (disabled in --once mode).
    let _watcher_handle = if !args.once {
        Some(watch::spawn_watcher(
            root,
            Duration::from_millis(cfg.watch.debounce_ms),
            host_tx.clone(),
        )?)
    } else {
        None
    };

    // Pressing Enter runs every suite.
    if !args.once {
        let tx = host_tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(_)) = lines.next_line().await {
                if tx.send(HostEvent::RunAll).await.is_err() {
                    break;
                }
            }
        });
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = host_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(HostEvent::ShutdownRequested).await;
        });
    }

    let options = SessionOptions {
        exit_when_idle: args.once,
    };

    Session::new(runner, rules, host_rx, options).run().await?;
    Ok(())
}

/// Figure out a sensible project root for watching.
///
/// - If the config path has a non-empty parent (e.g. "frontend/Konawatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Konawatch.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    let r = &cfg.runner;
    println!("konawatch dry-run");
    println!("  runner.notification = {}", r.notification);
    println!("  runner.rails_environment_file = {}", r.rails_environment_file.display());
    println!("  runner.formatter = {:?}", r.formatter);
    println!("  runner.run_all_on_start = {}", r.run_all_on_start);
    println!("  runner.suite_root = {}", r.suite_root.display());
    println!("  runner.extensions = {:?}", r.extensions);
    println!("  engine.cmd = {}", cfg.engine.cmd);
    match cfg.notifier.cmd {
        Some(ref cmd) => println!("  notifier.cmd = {cmd}"),
        None => println!("  notifier = log"),
    }
    println!();

    let rules = if cfg.watch.rules.is_empty() {
        watch::default_rule_configs()
    } else {
        cfg.watch.rules.clone()
    };
    println!("watch rules ({}):", rules.len());
    for rule in rules {
        match rule.target {
            Some(ref target) => println!("  - {} -> {}", rule.pattern, target),
            None => println!("  - {}", rule.pattern),
        }
    }
    if !cfg.watch.exclude.is_empty() {
        println!("  exclude: {:?}", cfg.watch.exclude);
    }

    debug!("dry-run complete (no execution)");
}
