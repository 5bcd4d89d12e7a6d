//! Command dispatch

use chrono::{DateTime, Local};
use parkd_api::{
    AuditRecord, Command, ErrorCode, ErrorInfo, Event, EventPayload, HealthStatus, Response,
    ResponsePayload,
};
use parkd_core::{CoreEvent, SessionLedger};
use parkd_store::{Store, StoreResult};
use parkd_util::{ClientId, ParkError};
use tracing::{debug, warn};

/// Run one command against the ledger.
///
/// Returns the response for the caller and, for state changes, the event
/// to broadcast to subscribers.
pub fn handle_command(
    ledger: &SessionLedger,
    store: &dyn Store,
    client_id: &ClientId,
    request_id: u64,
    command: Command,
    now: DateTime<Local>,
) -> (Response, Option<Event>) {
    debug!(client_id = %client_id, request_id, command = ?command, "Handling command");

    let result: Result<(ResponsePayload, Option<CoreEvent>), ParkError> = match command {
        Command::RegisterCar { car } => ledger
            .register_car(car)
            .map(|(car_id, event)| (ResponsePayload::CarRegistered { car_id }, Some(event))),

        Command::BeginParking {
            car_id,
            parking_spot_id,
        } => ledger
            .begin_session(car_id, parking_spot_id, now)
            .map(|(started, event)| (ResponsePayload::ParkingStarted(started), Some(event))),

        Command::ExitParking { car_id } => ledger
            .end_session(car_id, now)
            .map(|(receipt, event)| (ResponsePayload::ParkingEnded(receipt), Some(event))),

        Command::GetParkingPeriod { car_id } => ledger
            .parking_period(car_id)
            .map(|period| (ResponsePayload::ParkingPeriod(period), None)),

        Command::GetParkingCost { car_id } => ledger
            .parking_cost(car_id)
            .map(|cost| (ResponsePayload::ParkingCost(cost), None)),

        Command::GetUserDetails { user_id } => ledger
            .user_details(user_id)
            .map(|details| (ResponsePayload::UserDetails(details), None)),

        Command::GetCar { car_id } => ledger
            .get_car(car_id)
            .map(|car| (ResponsePayload::Car(car), None)),

        Command::ListSpots => ledger
            .list_spots()
            .map(|spots| (ResponsePayload::Spots { spots }, None)),

        Command::RecentAudit { limit } => recent_audit(store, limit)
            .map(|entries| (ResponsePayload::Audit { entries }, None))
            .map_err(ParkError::from),

        Command::SubscribeEvents => Ok((
            ResponsePayload::Subscribed {
                client_id: client_id.clone(),
            },
            None,
        )),

        Command::UnsubscribeEvents => Ok((ResponsePayload::Unsubscribed, None)),

        Command::GetHealth => {
            let store_ok = store.is_healthy();
            let health = HealthStatus {
                live: true,
                ready: store_ok,
                store_ok,
                mock_time: parkd_util::is_mock_time_active(),
            };
            Ok((ResponsePayload::Health(health), None))
        }

        Command::Ping => Ok((ResponsePayload::Pong, None)),
    };

    match result {
        Ok((payload, event)) => (Response::success(request_id, payload), event.map(event_for)),
        Err(e) => {
            let info = ErrorInfo::from(&e);
            if info.code == ErrorCode::InternalError {
                warn!(client_id = %client_id, request_id, error = %e, "Command failed");
            }
            (Response::error(request_id, info), None)
        }
    }
}

/// Protocol event for a ledger state change
pub fn event_for(event: CoreEvent) -> Event {
    let payload = match event {
        CoreEvent::CarRegistered {
            car_id,
            owner_id,
            license_plate,
        } => EventPayload::CarRegistered {
            car_id,
            owner_id,
            license_plate,
        },
        CoreEvent::SessionStarted {
            car_id,
            parking_spot_id,
            started_at,
        } => EventPayload::SessionStarted {
            car_id,
            parking_spot_id,
            started_at,
        },
        CoreEvent::SessionEnded {
            car_id,
            parking_spot_id,
            ended_at,
            total_cost,
            ..
        } => EventPayload::SessionEnded {
            car_id,
            parking_spot_id,
            ended_at,
            total_cost,
        },
    };
    Event::new(payload)
}

fn recent_audit(store: &dyn Store, limit: usize) -> StoreResult<Vec<AuditRecord>> {
    store
        .get_recent_audits(limit)?
        .iter()
        .map(|event| event.to_record())
        .collect()
}
