//! Flock command implementations

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use flock_config::{self, Config};
use flock_hydra::{HttpHypermediaClient, HypermediaClient};
use flock_sync::{
    encode_value, Command, Datastream, Direction, Drone, DroneState, DroneStatus, Entity,
    Position, SyncController,
};

/// Load the config at `path`, or the default location when none is given
async fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_existing(path).await?,
        None => Config::load().await?,
    };
    Ok(config)
}

/// Describe both remotes over HTTP
async fn connect(path: Option<&Path>) -> Result<SyncController> {
    let config = load_config(path).await?;
    let drone_iri = config.drone.iri.clone();
    let client: Arc<dyn HypermediaClient> = Arc::new(HttpHypermediaClient::new());

    SyncController::connect(client, config)
        .await
        .with_context(|| format!("Could not link to <{}>", drone_iri))
}

fn print_document<T: Entity>(entity: &T) -> Result<()> {
    let value = encode_value(entity)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Initialize config
pub async fn init_command(path: Option<&Path>) -> Result<()> {
    println!("◆ Initializing Flock...");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = match path {
        Some(path) => flock_config::init_at(path).await?,
        None => flock_config::init().await?,
    };
    let written = path
        .map(Path::to_path_buf)
        .unwrap_or_else(flock_config::config_path);

    println!("Config:           {}", written.display());
    println!("Drone server:     {}", config.drone.iri);
    println!("Controller:       {}", config.controller.iri);

    println!("\n◆ Flock initialized");
    println!("\nNext steps:");
    println!("  1. Point drone.iri and controller.iri at your servers");
    println!("  2. Register the drone: flock bootstrap");

    Ok(())
}

/// Register the default drone
pub async fn bootstrap_command(path: Option<&Path>) -> Result<()> {
    let sync = connect(path).await?;

    let current = sync.fetch_drone().await?;
    info!("◆ SERVER HOLDS DRONE {}", current.id);

    let resource = sync
        .update_drone(&Drone::bootstrap_default())
        .await
        .context("Bootstrap drone was not accepted")?;

    println!("✓ Drone registered at {}", resource.iri());
    Ok(())
}

/// Show the current drone
pub async fn drone_command(path: Option<&Path>) -> Result<()> {
    let sync = connect(path).await?;
    let drone = sync.fetch_drone().await?;
    print_document(&drone)
}

/// Show the current state
pub async fn state_command(path: Option<&Path>) -> Result<()> {
    let sync = connect(path).await?;
    let report = sync.fetch_state().await?;
    print_document(&report)
}

/// Fields of a state update; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateChanges {
    pub speed: Option<f64>,
    pub position: Option<Position>,
    pub battery: Option<u32>,
    pub direction: Option<Direction>,
    pub status: Option<DroneStatus>,
}

impl StateChanges {
    pub fn apply(self, mut state: DroneState) -> DroneState {
        if let Some(speed) = self.speed {
            state.speed = speed;
        }
        if let Some(position) = self.position {
            state.position = position;
        }
        if let Some(battery) = self.battery {
            state.battery = battery;
        }
        if let Some(direction) = self.direction {
            state.direction = direction;
        }
        if let Some(status) = self.status {
            state.status = status;
        }
        state
    }
}

/// Update the drone state
pub async fn set_state_command(
    path: Option<&Path>,
    drone_id: i64,
    changes: StateChanges,
) -> Result<()> {
    let sync = connect(path).await?;

    let mut report = sync.fetch_state().await?;
    report.state = changes.apply(report.state);
    report.drone_id = drone_id;

    let resource = sync.update_state(report).await?;
    println!("✓ State of drone {} updated at {}", drone_id, resource.iri());
    Ok(())
}

/// Show the current datastream
pub async fn datastream_show_command(path: Option<&Path>) -> Result<()> {
    let sync = connect(path).await?;
    let datastream = sync.fetch_datastream().await?;
    print_document(&datastream)
}

/// Push a datastream reading
pub async fn datastream_push_command(
    path: Option<&Path>,
    temperature: f64,
    position: Position,
    drone_id: Option<i64>,
) -> Result<()> {
    let sync = connect(path).await?;

    let drone_id = match drone_id {
        Some(id) => id,
        None => sync.fetch_drone_id().await?,
    };
    let datastream = Datastream::new(temperature, position, drone_id);

    let resource = sync.update_datastream(&datastream).await?;
    println!("✓ Datastream pushed to {}", resource.iri());
    Ok(())
}

/// Show the central controller location
pub async fn location_command(path: Option<&Path>) -> Result<()> {
    let sync = connect(path).await?;
    let location = sync.fetch_controller_location().await?;
    println!("{}", location);
    Ok(())
}

/// Push the current drone to its controller entry
pub async fn report_command(path: Option<&Path>, drone_id: i64) -> Result<()> {
    let sync = connect(path).await?;
    let drone = sync.fetch_drone().await?;

    let outcome = sync.update_drone_at_controller(&drone, drone_id).await?;
    println!("{} ({})", outcome, outcome.code());
    Ok(())
}

/// Print a command moving the current drone state into `status`
pub async fn command_command(path: Option<&Path>, drone_id: i64, status: DroneStatus) -> Result<()> {
    let sync = connect(path).await?;

    let mut state = sync.fetch_drone().await?.state;
    state.status = status;

    print_document(&Command::new(drone_id, state))
}
