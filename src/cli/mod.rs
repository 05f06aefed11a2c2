//! Command-line interface for covera.
//!
//! Provides commands for running the API server, seeding first-run data,
//! creating users, and inspecting the resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::{self, AppState};
use crate::auth;
use crate::domain::Role;
use crate::seed;
use crate::store::{JsonStore, ResourceStore};

/// covera - insurance brokerage back-office API
#[derive(Parser, Debug)]
#[command(name = "covera")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Address to bind to (overrides config/COVERA_ADDR)
        #[arg(short, long)]
        addr: Option<String>,

        /// Database snapshot file (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Seed default services, posts, and the admin account
    Seed {
        /// Database snapshot file (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Create a user account
    CreateUser {
        /// Login name
        username: String,

        /// Password
        password: String,

        /// Display name (defaults to the username)
        #[arg(short, long)]
        name: Option<String>,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,

        /// Database snapshot file (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve { addr, data } => serve(addr, data).await,
            Commands::Seed { data } => run_seed(data).await,
            Commands::CreateUser {
                username,
                password,
                name,
                admin,
                data,
            } => create_user(&username, &password, name, admin, data).await,
            Commands::Config => show_config(),
        }
    }
}

/// Open the store at the configured (or overridden) snapshot path.
async fn open_store(data: Option<PathBuf>) -> Result<Arc<JsonStore>> {
    let path = match data {
        Some(path) => path,
        None => crate::config::data_path()?,
    };
    let store = JsonStore::open(path.clone())
        .await
        .with_context(|| format!("Failed to open store: {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Seed first-run data, then bind and serve the API.
async fn serve(addr: Option<String>, data: Option<PathBuf>) -> Result<()> {
    let store = open_store(data).await?;
    seed::seed_if_empty(store.as_ref()).await?;

    let addr = match addr {
        Some(addr) => addr,
        None => crate::config::bind_addr()?,
    };

    let state = AppState::new(store);
    api::serve(&addr, state).await
}

async fn run_seed(data: Option<PathBuf>) -> Result<()> {
    let store = open_store(data).await?;
    seed::seed_if_empty(store.as_ref()).await?;
    println!("Seed complete.");
    Ok(())
}

async fn create_user(
    username: &str,
    password: &str,
    name: Option<String>,
    admin: bool,
    data: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(data).await?;

    let role = if admin { Role::Admin } else { Role::Employee };
    let name = name.unwrap_or_else(|| username.to_string());

    let user = store
        .create_user(auth::new_user(username, password, &name, role))
        .await
        .context("Failed to create user")?;

    println!(
        "Created user {} (id {}, {:?})",
        user.username, user.id, user.role
    );
    Ok(())
}

fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    println!("home:   {}", config.home.display());
    println!("data:   {}", config.data.display());
    println!("addr:   {}", config.addr);
    match &config.config_file {
        Some(path) => println!("config: {}", path.display()),
        None => println!("config: (none found, using defaults)"),
    }

    Ok(())
}
