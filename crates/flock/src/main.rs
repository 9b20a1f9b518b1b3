//! Flock - drone agent for Hydra drone servers

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use flock_sync::{Direction, DroneStatus, Position};

mod commands;

use commands::{
    bootstrap_command, command_command, datastream_push_command, datastream_show_command,
    drone_command, init_command, location_command, report_command, set_state_command,
    state_command, StateChanges,
};

/// Flock - keeps a drone in sync with its drone server and central controller
#[derive(Parser)]
#[command(name = "flock")]
#[command(about = "◆ Drone agent for Hydra drone servers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file [default: ~/.flock/config.json]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config
    Init,
    /// Register the default drone with the drone server
    Bootstrap,
    /// Show the current drone
    Drone,
    /// Show the current drone state
    State,
    /// Update the drone state
    SetState {
        /// Drone the new state is addressed to
        #[arg(long, allow_negative_numbers = true)]
        drone_id: i64,
        #[arg(long)]
        speed: Option<f64>,
        /// Position as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        position: Option<Position>,
        #[arg(long)]
        battery: Option<u32>,
        /// N, E, S or W
        #[arg(long)]
        direction: Option<Direction>,
        /// Active, Charging, "Low Battery", Scanning or Off
        #[arg(long)]
        status: Option<DroneStatus>,
    },
    /// Read or push the datastream
    Datastream {
        #[command(subcommand)]
        command: DatastreamCommands,
    },
    /// Show the central controller location
    Location,
    /// Push the current drone to the central controller
    Report {
        /// Entry in the controller's drone collection
        #[arg(long, allow_negative_numbers = true)]
        drone_id: i64,
    },
    /// Print a command document for a drone
    Command {
        #[arg(long, allow_negative_numbers = true)]
        drone_id: i64,
        /// Status the drone is commanded into
        #[arg(long)]
        status: DroneStatus,
    },
}

#[derive(Subcommand)]
enum DatastreamCommands {
    /// Show the current datastream
    Show,
    /// Push a new datastream reading
    Push {
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Position as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        position: Position,
        /// Defaults to the current drone
        #[arg(long, allow_negative_numbers = true)]
        drone_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let (label, result) = match cli.command {
        Commands::Init => ("Init", init_command(config).await),
        Commands::Bootstrap => ("Bootstrap", bootstrap_command(config).await),
        Commands::Drone => ("Drone", drone_command(config).await),
        Commands::State => ("State", state_command(config).await),
        Commands::SetState {
            drone_id,
            speed,
            position,
            battery,
            direction,
            status,
        } => {
            let changes = StateChanges {
                speed,
                position,
                battery,
                direction,
                status,
            };
            ("Set state", set_state_command(config, drone_id, changes).await)
        }
        Commands::Datastream { command } => match command {
            DatastreamCommands::Show => ("Datastream", datastream_show_command(config).await),
            DatastreamCommands::Push {
                temperature,
                position,
                drone_id,
            } => (
                "Datastream push",
                datastream_push_command(config, temperature, position, drone_id).await,
            ),
        },
        Commands::Location => ("Location", location_command(config).await),
        Commands::Report { drone_id } => ("Report", report_command(config, drone_id).await),
        Commands::Command { drone_id, status } => {
            ("Command", command_command(config, drone_id, status).await)
        }
    };

    if let Err(e) = result {
        error!("{} failed: {:#}", label, e);
        std::process::exit(1);
    }
}
