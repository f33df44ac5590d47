use crate::config::toml_config::TomlConfig;
use crate::domain::model::{DifficultyFilter, Technology};
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "learning-catalog")]
#[command(about = "Browse the learning catalog and manage your personal study plan")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Catalog location (URL or file), overrides the config file
    #[arg(long)]
    pub catalog: Option<String>,

    /// Directory holding the saved cart and theme
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Prefix for the saved keys
    #[arg(long)]
    pub namespace: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the modules of a technology
    Modules {
        #[arg(short, long, default_value = "javascript")]
        tech: Technology,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value = "all")]
        difficulty: DifficultyFilter,
    },
    /// Show one module in detail
    Show { tech: Technology, id: String },
    /// Add a module to the cart
    Add { tech: Technology, id: String },
    /// Remove a module from the cart
    Remove { tech: Technology, id: String },
    /// Add the module if absent, remove it otherwise
    Toggle { tech: Technology, id: String },
    /// Empty the cart
    Clear,
    /// Print the cart and its totals
    Cart,
    /// List learning paths
    Paths,
    /// List project examples
    Projects,
    /// Add every module of a learning path
    AddPath { id: String },
    /// Add every module a project example requires
    AddProject { id: String },
    /// Write the cart to a CSV file
    Export { path: PathBuf },
    /// Show or change the saved theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

impl Command {
    /// Commands that only touch the saved cart run without fetching the catalog.
    pub fn needs_catalog(&self) -> bool {
        !matches!(
            self,
            Command::Remove { .. }
                | Command::Clear
                | Command::Cart
                | Command::Export { .. }
                | Command::Theme { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

impl CliConfig {
    /// Loads the config file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(catalog) = &self.catalog {
            config.catalog.source = catalog.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.storage.namespace = Some(namespace.clone());
        }
        Ok(config)
    }
}
