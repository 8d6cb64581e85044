use std::fs;
use std::sync::Arc;

use anyhow::bail;
use axum_extra::extract::cookie::Key;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use deskreg::config::ServerConfig;
use deskreg::server::{AppState, create_router};
use deskreg::session::MemorySessionStore;
use deskreg::store::{SqliteStore, Store};
use deskreg::types::{Role, User};

#[derive(Parser)]
#[command(name = "deskreg")]
#[command(about = "Internal asset and user management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8000")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Directory of static files served under /asset
        #[arg(long, default_value = "./asset")]
        asset_dir: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the database and create the first admin account
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

fn create_admin_user(store: &SqliteStore, username: String, password: String) -> anyhow::Result<()> {
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.clone(),
        email: String::new(),
        password: password.clone(),
        usergroup: Role::Admin.as_str().to_string(),
        created_at: Utc::now(),
    };
    store.create_user(&user)?;

    println!();
    println!("========================================");
    println!("Created admin user '{username}' with password:");
    println!();
    println!("  {password}");
    println!();
    println!("========================================");
    println!();

    Ok(())
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let store = SqliteStore::new(data_path.join("deskreg.db"))?;
    store.initialize()?;

    if store.has_admin_user()? {
        bail!("Server already initialized. An admin account exists.");
    }

    if non_interactive {
        let password = Uuid::new_v4().to_string();
        return create_admin_user(&store, "admin".to_string(), password);
    }

    let username = inquire::Text::new("Admin username:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Username cannot be empty".into())
            } else if input.contains(char::is_whitespace) {
                Err("Username cannot contain whitespace".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Admin password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()?;

    create_admin_user(&store, username, password)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("deskreg=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
            } => {
                run_init(data_dir, non_interactive)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            asset_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                asset_dir: asset_dir.into(),
            };

            let store = SqliteStore::new(config.db_path())?;
            if !store.has_admin_user()? {
                bail!(
                    "Server not initialized. Run 'deskreg admin init' first to create the database and an admin account."
                );
            }

            let state = Arc::new(AppState {
                store: Arc::new(store),
                sessions: Arc::new(MemorySessionStore::new()),
                cookie_key: Key::generate(),
                asset_dir: config.asset_dir.clone(),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
