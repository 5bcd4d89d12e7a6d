//! Command types for the parkd protocol

use chrono::{DateTime, Local};
use parkd_util::{CarId, ClientId, ErrorKind, ParkError, SpotId, UserId};
use serde::{Deserialize, Serialize};

use crate::{
    API_VERSION, Car, HealthStatus, NewCar, ParkingCost, ParkingPeriod, ParkingSpot,
    SessionReceipt, SessionStarted, UserDetails,
};

/// Request wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// The command
    pub command: Command,
}

impl Request {
    pub fn new(request_id: u64, command: Command) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            command,
        }
    }
}

/// Response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Corresponding request ID
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// Response payload or error
    pub result: ResponseResult,
}

impl Response {
    pub fn success(request_id: u64, payload: ResponsePayload) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Ok(payload),
        }
    }

    pub fn error(request_id: u64, error: ErrorInfo) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Err(error),
        }
    }

    /// HTTP-equivalent status of this response
    pub fn status(&self) -> u16 {
        match &self.result {
            ResponseResult::Ok(_) => 200,
            ResponseResult::Err(e) => e.code.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Ok(ResponsePayload),
    Err(ErrorInfo),
}

/// Error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&ParkError> for ErrorInfo {
    fn from(err: &ParkError) -> Self {
        Self::new(ErrorCode::from(err.kind()), err.to_string())
    }
}

/// Error codes for the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    Conflict,
    NoActiveData,
    RateLimited,
    InternalError,
}

impl ErrorCode {
    /// HTTP-equivalent status code
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict | ErrorCode::NoActiveData | ErrorCode::InvalidRequest => 400,
            ErrorCode::RateLimited => 429,
            ErrorCode::InternalError => 500,
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::NoActiveData => ErrorCode::NoActiveData,
            ErrorKind::Internal => ErrorCode::InternalError,
        }
    }
}

/// All possible commands from clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Register a new car
    RegisterCar { car: NewCar },

    /// Park a car in a spot
    BeginParking {
        car_id: CarId,
        parking_spot_id: SpotId,
    },

    /// End the car's current parking session
    ExitParking { car_id: CarId },

    /// Last closed parking period of a car
    GetParkingPeriod { car_id: CarId },

    /// Cost of the last closed parking period of a car
    GetParkingCost { car_id: CarId },

    /// A user's cars and parking history
    GetUserDetails { user_id: UserId },

    /// A single car
    GetCar { car_id: CarId },

    /// All parking spots
    ListSpots,

    /// Most recent audit log entries, newest first
    RecentAudit { limit: usize },

    /// Subscribe to events (returns immediately, events stream separately)
    SubscribeEvents,

    /// Unsubscribe from events
    UnsubscribeEvents,

    /// Get health status
    GetHealth,

    /// Ping for keepalive
    Ping,
}

/// Audit log entry as exposed over the protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: u64,
    pub timestamp: DateTime<Local>,
    pub event_type: String,
    pub details: serde_json::Value,
}

/// Response payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    CarRegistered { car_id: CarId },
    ParkingStarted(SessionStarted),
    ParkingEnded(SessionReceipt),
    ParkingPeriod(ParkingPeriod),
    ParkingCost(ParkingCost),
    UserDetails(UserDetails),
    Car(Car),
    Spots { spots: Vec<ParkingSpot> },
    Audit { entries: Vec<AuditRecord> },
    Subscribed { client_id: ClientId },
    Unsubscribed,
    Health(HealthStatus),
    Pong,
}
