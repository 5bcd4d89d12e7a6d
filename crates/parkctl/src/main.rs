//! parkctl - command-line client for parkd
//!
//! Issues one command per invocation and prints the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parkd_api::{Command, EventPayload, NewCar, Response, ResponsePayload, ResponseResult};
use parkd_ipc::{IpcClient, IpcError};
use parkd_util::{
    CarId, PARKD_SOCKET_ENV, SpotId, UserId, format_currency, socket_path_without_env,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// parkctl - talk to a running parkd
#[derive(Parser, Debug)]
#[command(name = "parkctl")]
#[command(about = "Command-line client for the parkd service", long_about = None)]
struct Args {
    /// Socket path (or set PARKD_SOCKET env var)
    #[arg(short, long, env = PARKD_SOCKET_ENV, default_value_os_t = socket_path_without_env())]
    socket: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Register a new car
    Register {
        #[arg(long)]
        plate: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        owner: u32,
    },

    /// Park a car in a spot
    Begin { car: u32, spot: u32 },

    /// End a car's parking session
    Exit { car: u32 },

    /// Show a car's last closed parking period
    Period { car: u32 },

    /// Show the cost of a car's last closed parking period
    Cost { car: u32 },

    /// Show a user's cars and parking history
    User { user: u32 },

    /// Show a single car
    Car { car: u32 },

    /// List all parking spots
    Spots,

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show service health
    Health,

    /// Check that the service answers
    Ping,

    /// Print events as they arrive until the service shuts down
    Watch,
}

impl Action {
    fn into_command(self) -> Command {
        match self {
            Action::Register {
                plate,
                make,
                model,
                owner,
            } => Command::RegisterCar {
                car: NewCar {
                    license_plate: plate,
                    make,
                    model,
                    owner_id: UserId::new(owner),
                },
            },
            Action::Begin { car, spot } => Command::BeginParking {
                car_id: CarId::new(car),
                parking_spot_id: SpotId::new(spot),
            },
            Action::Exit { car } => Command::ExitParking {
                car_id: CarId::new(car),
            },
            Action::Period { car } => Command::GetParkingPeriod {
                car_id: CarId::new(car),
            },
            Action::Cost { car } => Command::GetParkingCost {
                car_id: CarId::new(car),
            },
            Action::User { user } => Command::GetUserDetails {
                user_id: UserId::new(user),
            },
            Action::Car { car } => Command::GetCar {
                car_id: CarId::new(car),
            },
            Action::Spots => Command::ListSpots,
            Action::Audit { limit } => Command::RecentAudit { limit },
            Action::Health => Command::GetHealth,
            Action::Ping => Command::Ping,
            Action::Watch => Command::SubscribeEvents,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("parkctl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    debug!(socket = %args.socket.display(), "Connecting to parkd");

    let mut client = IpcClient::connect(&args.socket)
        .await
        .with_context(|| format!("Failed to connect to parkd at {:?}", args.socket))?;

    if matches!(args.action, Action::Watch) {
        watch(client).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let response = client.send(args.action.into_command()).await?;
    print_response(response)
}

fn print_response(response: Response) -> Result<ExitCode> {
    let status = response.status();
    match response.result {
        ResponseResult::Ok(payload) => {
            if let Some(summary) = summary(&payload) {
                eprintln!("{summary}");
            }
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(ExitCode::SUCCESS)
        }
        ResponseResult::Err(e) => {
            eprintln!("{status}: {}", e.message);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// One-line human summary for payloads that carry money
fn summary(payload: &ResponsePayload) -> Option<String> {
    match payload {
        ResponsePayload::ParkingEnded(receipt) => Some(format!(
            "{} left spot {}: {}",
            receipt.license_plate,
            receipt.spot_number,
            format_currency(receipt.total_cost)
        )),
        ResponsePayload::ParkingCost(cost) => Some(format!(
            "{}: {}",
            cost.license_plate,
            format_currency(cost.total_cost)
        )),
        _ => None,
    }
}

async fn watch(client: IpcClient) -> Result<()> {
    let mut events = client
        .subscribe()
        .await
        .context("Failed to subscribe to events")?;

    loop {
        let event = match events.next().await {
            Ok(event) => event,
            Err(IpcError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        println!("{}", serde_json::to_string(&event)?);

        if matches!(event.payload, EventPayload::Shutdown) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_begin() {
        let args = Args::try_parse_from(["parkctl", "--socket", "/tmp/p.sock", "begin", "2", "1"])
            .unwrap();
        assert!(matches!(
            args.action.into_command(),
            Command::BeginParking { car_id, parking_spot_id }
                if car_id == CarId::new(2) && parking_spot_id == SpotId::new(1)
        ));
    }

    #[test]
    fn parses_register() {
        let args = Args::try_parse_from([
            "parkctl", "register", "--plate", "XYZ999", "--make", "Honda", "--model", "Civic",
            "--owner", "1",
        ])
        .unwrap();
        match args.action.into_command() {
            Command::RegisterCar { car } => {
                assert_eq!(car.license_plate, "XYZ999");
                assert_eq!(car.owner_id, UserId::new(1));
            }
            other => panic!("Expected registration, got {other:?}"),
        }
    }

    #[test]
    fn audit_limit_defaults() {
        let args = Args::try_parse_from(["parkctl", "audit"]).unwrap();
        assert!(matches!(
            args.action.into_command(),
            Command::RecentAudit { limit: 20 }
        ));
    }
}
