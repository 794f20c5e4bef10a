//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use t4b_core::api::ApiClient;
use t4b_core::config::{self, API_URL_ENV};
use t4b_core::logging;
use t4b_core::session::Session;

mod commands;
mod format;
mod prompt;

#[derive(Parser)]
#[command(name = "t4b")]
#[command(version)]
#[command(about = "Tech4Bike maintenance tracker client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the REST API (overrides config)
    #[arg(long, global = true, env = API_URL_ENV, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with a one-time code sent by email
    Login {
        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show maintenance statistics
    Dashboard,
    /// Manage bikes
    Bikes {
        #[command(subcommand)]
        command: BikeCommands,
    },
    /// Manage maintenance records
    #[command(alias = "m")]
    Maintenances {
        #[command(subcommand)]
        command: MaintenanceCommands,
    },
    /// Look up an address by CEP
    Cep {
        /// Postal code, with or without the dash
        cep: String,
    },
    /// Show the cycling weather forecast
    Weather {
        /// City name (defaults to `default_city` from config)
        city: Option<String>,
        /// Only show days flagged as good for cycling
        #[arg(long)]
        good_days: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct BikeFields {
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(clap::Subcommand)]
enum BikeCommands {
    /// List bikes
    List,
    /// Show one bike and its maintenance history
    Show {
        #[arg(value_name = "BIKE_ID")]
        id: i64,
    },
    /// Register a bike (missing fields are prompted)
    New {
        #[command(flatten)]
        fields: BikeFields,
    },
    /// Update a bike
    Edit {
        #[arg(value_name = "BIKE_ID")]
        id: i64,
        #[command(flatten)]
        fields: BikeFields,
    },
    /// Delete a bike after confirmation
    Delete {
        #[arg(value_name = "BIKE_ID")]
        id: i64,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct MaintenanceFields {
    /// Bike the service was done on (defaults to the first bike)
    #[arg(long = "bike", value_name = "BIKE_ID")]
    pub bike_id: Option<i64>,
    /// Kind of service, e.g. "Revisão geral"
    #[arg(long = "type", value_name = "TEXT")]
    pub service_type: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub cost: Option<f64>,
    /// Service date, YYYY-MM-DD (defaults to today on create)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
    #[arg(long = "workshop")]
    pub workshop_name: Option<String>,
    /// Workshop CEP; fills the address by lookup unless --address is given
    #[arg(long)]
    pub cep: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(clap::Subcommand)]
enum MaintenanceCommands {
    /// List maintenance records, newest first
    List {
        /// Only records for this bike
        #[arg(long = "bike", value_name = "BIKE_ID")]
        bike_id: Option<i64>,
        /// Case-insensitive match on the service type
        #[arg(long = "type", value_name = "TEXT")]
        service_type: Option<String>,
    },
    /// Show one maintenance record
    Show {
        #[arg(value_name = "MAINTENANCE_ID")]
        id: i64,
    },
    /// Record a maintenance
    New {
        #[command(flatten)]
        fields: MaintenanceFields,
    },
    /// Update a maintenance record
    Edit {
        #[arg(value_name = "MAINTENANCE_ID")]
        id: i64,
        #[command(flatten)]
        fields: MaintenanceFields,
    },
    /// Delete a maintenance record after confirmation
    Delete {
        #[arg(value_name = "MAINTENANCE_ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
    /// Save the default city used by `weather`
    SetCity {
        #[arg(value_name = "CITY")]
        city: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, api_url } = cli;

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    let connect = || -> Result<ApiClient> {
        let session = Arc::new(Session::load().context("load session")?);
        let client = ApiClient::new(config.api_config(api_url.as_deref())?, session)?;
        tracing::debug!(base_url = client.base_url(), "client ready");
        Ok(client)
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::SetCity { city } => commands::config::set_city(&city),
        },

        Commands::Login { email } => commands::auth::login(&connect()?, email.as_deref()).await,
        Commands::Logout => commands::auth::logout(&connect()?),
        Commands::Status => {
            commands::auth::status(&connect()?);
            Ok(())
        }
        Commands::Dashboard => commands::dashboard::show(&connect()?).await,

        Commands::Bikes { command } => {
            let client = connect()?;
            match command {
                BikeCommands::List => commands::bikes::list(&client).await,
                BikeCommands::Show { id } => commands::bikes::show(&client, id).await,
                BikeCommands::New { fields } => commands::bikes::create(&client, fields).await,
                BikeCommands::Edit { id, fields } => {
                    commands::bikes::edit(&client, id, fields).await
                }
                BikeCommands::Delete { id } => commands::bikes::delete(&client, id).await,
            }
        }

        Commands::Maintenances { command } => {
            let client = connect()?;
            match command {
                MaintenanceCommands::List {
                    bike_id,
                    service_type,
                } => commands::maintenances::list(&client, bike_id, service_type).await,
                MaintenanceCommands::Show { id } => {
                    commands::maintenances::show(&client, id).await
                }
                MaintenanceCommands::New { fields } => {
                    commands::maintenances::create(&client, fields).await
                }
                MaintenanceCommands::Edit { id, fields } => {
                    commands::maintenances::edit(&client, id, fields).await
                }
                MaintenanceCommands::Delete { id } => {
                    commands::maintenances::delete(&client, id).await
                }
            }
        }

        Commands::Cep { cep } => commands::address::lookup(&connect()?, &cep).await,

        Commands::Weather { city, good_days } => {
            let city = city
                .or_else(|| config.default_city().map(str::to_string))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No city given. Pass one or set a default with `t4b config set-city`."
                    )
                })?;
            commands::weather::show(&connect()?, &city, good_days).await
        }
    }
}
