/*
 * This file is part of fanctl.
 *
 * Copyright (C) 2025 fanctl contributors
 *
 * fanctl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * fanctl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with fanctl. If not, see <https://www.gnu.org/licenses/>.
 */

//! Command Line Interface
//!
//! Inspect strategies and edit single strategy parameters.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fanctl_core::constants::paths;
use fanctl_core::{ConfigurationStore, Resources, StrategySelector};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "fanctl")]
#[command(version)]
#[command(about = "fanctl - fan strategy configuration")]
#[command(long_about = "fanctl - fan strategy configuration

Reads and edits the strategy file used by the fan control daemon. Every
edit is checked against the configuration schema before it is saved.

EXAMPLES:
    fanctl strategies list
    fanctl strategies show defaultStrategy
    fanctl strategies show strategyOnDischarging
    fanctl strategies set lazy fanSpeedUpdateFrequency 3
    fanctl strategies params
    fanctl config validate

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging
    FANCTL_CONFIG          Configuration file path
    FANCTL_RESOURCES       Directory holding config.schema.json and config.json

FILES:
    ~/.config/fanctl/config.json      Strategy configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Configuration file (seeded from the template if missing)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory with config.schema.json and config.json to use instead of the bundled ones
    #[arg(long, global = true)]
    pub resources: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strategy inspection and editing
    #[command(subcommand, about = "List, show, and edit strategies")]
    Strategies(StrategyCommands),

    /// Configuration file management
    #[command(subcommand, about = "Locate, validate, and print the configuration")]
    Config(ConfigCommands),
}

// ============================================================================
// Strategy Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum StrategyCommands {
    /// List strategy names, marking the default and discharging ones
    List,
    /// Show a resolved strategy
    Show {
        /// Strategy name, or defaultStrategy / strategyOnDischarging
        selector: String,
    },
    /// Set one parameter of a strategy
    Set {
        /// Strategy name
        strategy: String,
        /// Parameter name (e.g. fanSpeedUpdateFrequency)
        param: String,
        /// New value, converted to the parameter's schema type
        value: String,
    },
    /// List editable parameters with their type and bounds
    Params,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration file path
    Path,
    /// Load and validate the configuration
    Validate,
    /// Print the whole configuration document
    Show,
}

// ============================================================================
// CLI Execution
// ============================================================================

pub fn run_cli<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    match &cli.command {
        Commands::Strategies(sub) => cmd_strategies(&cli.global, sub, out),
        Commands::Config(sub) => cmd_config(&cli.global, sub, out),
    }
}

/// Configuration path from the flag, FANCTL_CONFIG, or the user config dir
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.config {
        return Ok(path.clone());
    }
    paths::default_config_path().context("Could not determine config directory")
}

fn load_resources(global: &GlobalArgs) -> Result<Resources> {
    let dir = global
        .resources
        .clone()
        .or_else(|| std::env::var_os(paths::RESOURCES_ENV).map(PathBuf::from));

    match dir {
        Some(dir) => {
            debug!("Using resources from {:?}", dir);
            Resources::from_dir(&dir)
                .with_context(|| format!("Failed to load resources from {}", dir.display()))
        }
        None => Resources::bundled().context("Bundled resources are unusable"),
    }
}

fn open_store(global: &GlobalArgs) -> Result<ConfigurationStore> {
    let path = resolve_config_path(global)?;
    let resources = load_resources(global)?;
    Ok(ConfigurationStore::load(path, resources)?)
}

fn cmd_strategies<W: Write>(global: &GlobalArgs, cmd: &StrategyCommands, out: &mut W) -> Result<()> {
    match cmd {
        StrategyCommands::List => {
            let store = open_store(global)?;
            let default = store.default_strategy_name().unwrap_or_default();
            let discharging = store.discharging_strategy_name().unwrap_or_default();

            for name in store.list_strategy_names() {
                let mut tags = Vec::new();
                if name == default {
                    tags.push("default");
                }
                if name == discharging {
                    tags.push("discharging");
                }
                if tags.is_empty() {
                    writeln!(out, "{}", name)?;
                } else {
                    writeln!(out, "{} ({})", name, tags.join(", "))?;
                }
            }
        }
        StrategyCommands::Show { selector } => {
            let store = open_store(global)?;
            let strategy = store.resolve_strategy(&StrategySelector::from(selector.as_str()))?;
            writeln!(out, "{}", strategy.name)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&strategy.to_value())?)?;
        }
        StrategyCommands::Set { strategy, param, value } => {
            let mut store = open_store(global)?;
            let stored = store.update_strategy_param(strategy, param, value.as_str())?;
            writeln!(out, "{}.{} = {}", strategy, param, stored)?;
        }
        StrategyCommands::Params => {
            let resources = load_resources(global)?;
            for (name, rule) in resources.schema().strategy_parameters() {
                writeln!(out, "{:<28} {}", name, rule)?;
            }
        }
    }
    Ok(())
}

fn cmd_config<W: Write>(global: &GlobalArgs, cmd: &ConfigCommands, out: &mut W) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            writeln!(out, "{}", resolve_config_path(global)?.display())?;
        }
        ConfigCommands::Validate => {
            let store = open_store(global)?;
            writeln!(
                out,
                "{} is valid ({} strategies)",
                store.path().display(),
                store.list_strategy_names().len()
            )?;
        }
        ConfigCommands::Show => {
            let store = open_store(global)?;
            writeln!(out, "{}", fanctl_core::to_pretty_json(store.document())?)?;
        }
    }
    Ok(())
}
