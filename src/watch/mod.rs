// src/watch/mod.rs

//! File watching and change mapping.
//!
//! This module is responsible for:
//! - Compiling the rules that map changed files to spec files (`rules`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that reports
//!   batches of changed paths to the session (`watcher`).
//!
//! It does **not** know about suites or the engine.

pub mod rules;
pub mod watcher;

pub use rules::{default_rule_configs, RuleSet, WatchRule};
pub use watcher::{relative_path, spawn_watcher, WatcherHandle};
