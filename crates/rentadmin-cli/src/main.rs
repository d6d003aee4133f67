//! Rentadmin CLI - back-office console for the car-rental and parking platform.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::config::ConfigAction;
use commands::resources::{
    AdCommands, CarCommands, CouponCommands, ParkingCommands, PaymentCommands, UserCommands,
};
use rentadmin_client::AdapterContext;
use rentadmin_core::config::{Config, LogFormat};

#[derive(Parser)]
#[command(name = "rentadmin")]
#[command(about = "Rentadmin - car rental and parking back office")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an administrator
    Login {
        /// Admin email
        #[arg(long)]
        email: Option<String>,

        /// Password
        #[arg(long, env = "RENTADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show session status
    Status {
        /// Ask a running auth bridge instead of the local store
        #[arg(long)]
        bridge: Option<String>,
    },

    /// Auth bridge server
    Bridge {
        #[command(subcommand)]
        action: BridgeCommands,
    },

    /// Car listings
    Cars {
        #[command(subcommand)]
        action: CarCommands,
    },

    /// User accounts and vendors
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Discount coupons
    Coupons {
        #[command(subcommand)]
        action: CouponCommands,
    },

    /// Advertisements
    Ads {
        #[command(subcommand)]
        action: AdCommands,
    },

    /// Payments
    Payments {
        #[command(subcommand)]
        action: PaymentCommands,
    },

    /// Parking spot approvals
    Parking {
        #[command(subcommand)]
        action: ParkingCommands,
    },

    /// Dashboard numbers
    Dashboard {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload images or documents to the media host
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination folder
        #[arg(long)]
        folder: Option<String>,

        /// Print raw JSON results
        #[arg(long)]
        json: bool,
    },

    /// Configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum BridgeCommands {
    /// Run the auth bridge in the foreground
    Run {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Bind address, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long)]
        bind: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let settings = commands::load_config().ok().map(|c| c.settings);
    let debug = verbose || settings.as_ref().is_some_and(|s| s.debug);
    let json = settings.is_some_and(|s| matches!(s.log_format, LogFormat::Json));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .with(filter)
        .init();
}

fn resource_context() -> anyhow::Result<(Config, AdapterContext)> {
    let config = commands::load_config()?;
    let ctx = commands::adapter_context(&config)?;
    Ok((config, ctx))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::run_login(commands::auth::LoginArgs { email, password }).await?
        }
        Commands::Logout => commands::auth::run_logout()?,
        Commands::Status { bridge } => commands::auth::run_status(bridge).await?,
        Commands::Bridge {
            action: BridgeCommands::Run { port, bind },
        } => {
            commands::bridge::run_bridge(port, bind).await?;
            true
        }
        Commands::Config { action } => commands::config::run_config(action)?,
        Commands::Upload {
            files,
            folder,
            json,
        } => {
            let config = commands::load_config()?;
            commands::upload::run_upload(&config, files, folder, json).await?
        }
        Commands::Cars { action } => {
            let (config, ctx) = resource_context()?;
            commands::resources::run_cars(&ctx, &config, action).await?
        }
        Commands::Users { action } => {
            commands::resources::run_users(&resource_context()?.1, action).await?
        }
        Commands::Coupons { action } => {
            commands::resources::run_coupons(&resource_context()?.1, action).await?
        }
        Commands::Ads { action } => {
            let (config, ctx) = resource_context()?;
            commands::resources::run_ads(&ctx, &config, action).await?
        }
        Commands::Payments { action } => {
            commands::resources::run_payments(&resource_context()?.1, action).await?
        }
        Commands::Parking { action } => {
            commands::resources::run_parking(&resource_context()?.1, action).await?
        }
        Commands::Dashboard { json } => {
            commands::resources::run_dashboard(&resource_context()?.1, json).await?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
