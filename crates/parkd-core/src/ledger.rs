//! Session ledger

use chrono::{DateTime, Local};
use parkd_api::{
    Car, NewCar, ParkingCost, ParkingHistoryEntry, ParkingPeriod, ParkingSpot, SessionReceipt,
    SessionStarted, UserDetails,
};
use parkd_config::{LedgerConfig, Seed};
use parkd_store::{AuditEvent, AuditEventType, Store, StoreExt, Tables};
use parkd_util::{CarId, ParkError, Result, SpotId, UserId, format_currency};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{CoreEvent, duration_hours, parking_cost};

/// Owns every mutation of cars and parking spots.
///
/// Each operation runs as a single store transaction. Checks come before
/// the first write, so a failed operation leaves the tables untouched.
pub struct SessionLedger {
    store: Arc<dyn Store>,
    config: LedgerConfig,
}

impl SessionLedger {
    pub fn new(store: Arc<dyn Store>, config: LedgerConfig) -> Self {
        info!(
            clear_session_end_on_begin = config.clear_session_end_on_begin,
            keep_session_start_on_exit = config.keep_session_start_on_exit,
            "Session ledger initialized"
        );
        Self { store, config }
    }

    /// Replace the ledger contents with seed data
    pub fn load_seed(&self, seed: Seed) -> Result<()> {
        let (users, cars, spots) = self.transact(move |t| {
            t.load_seed(seed.users, seed.cars, seed.spots);
            Ok((t.user_count(), t.car_count(), t.spot_count()))
        })?;

        self.audit(AuditEventType::SeedLoaded { users, cars, spots });
        info!(users, cars, spots, "Seed data loaded");
        Ok(())
    }

    /// Register a new car under the next free identifier.
    ///
    /// Plate, make, model and owner are stored as given.
    pub fn register_car(&self, details: NewCar) -> Result<(CarId, CoreEvent)> {
        let car = self.transact(move |t| {
            let car_id = t
                .allocate_car_id()
                .ok_or_else(|| ParkError::internal("car identifiers exhausted"))?;
            let car = Car::unparked(car_id, details);
            t.insert_car(car.clone())
                .map_err(|_| ParkError::CarIdTaken(car_id))?;
            Ok(car)
        })?;

        self.audit(AuditEventType::CarRegistered {
            car_id: car.car_id,
            owner_id: car.owner_id,
            license_plate: car.license_plate.clone(),
        });
        info!(
            car_id = %car.car_id,
            owner_id = %car.owner_id,
            license_plate = %car.license_plate,
            "Car registered"
        );

        let event = CoreEvent::CarRegistered {
            car_id: car.car_id,
            owner_id: car.owner_id,
            license_plate: car.license_plate,
        };
        Ok((car.car_id, event))
    }

    /// Park a car in a free spot
    pub fn begin_session(
        &self,
        car_id: CarId,
        spot_id: SpotId,
        now: DateTime<Local>,
    ) -> Result<(SessionStarted, CoreEvent)> {
        let clear_end = self.config.clear_session_end_on_begin;

        let result = self.transact(|t| {
            check_can_begin(t, car_id, spot_id)?;

            let (car, spot) = t
                .car_and_spot_mut(car_id, spot_id)
                .ok_or_else(|| ParkError::internal("car or spot missing after checks"))?;

            spot.is_available = false;
            spot.car_id = Some(car_id);
            spot.occupied_since = Some(now);

            car.is_parked = true;
            car.parking_spot_id = Some(spot_id);
            car.parking_start_time = Some(now);
            if clear_end {
                car.parking_end_time = None;
            }

            Ok(SessionStarted {
                car_id,
                parking_spot_id: spot_id,
                license_plate: car.license_plate.clone(),
                spot_number: spot.spot_number.clone(),
                started_at: now,
            })
        });

        let started = match result {
            Ok(started) => started,
            Err(e) => {
                warn!(car_id = %car_id, spot_id = %spot_id, error = %e, "Parking rejected");
                return Err(e);
            }
        };

        self.audit(AuditEventType::SessionStarted {
            car_id,
            parking_spot_id: spot_id,
            started_at: now,
        });
        info!(
            car_id = %car_id,
            spot_id = %spot_id,
            license_plate = %started.license_plate,
            spot_number = %started.spot_number,
            "Parking started"
        );

        let event = CoreEvent::SessionStarted {
            car_id,
            parking_spot_id: spot_id,
            started_at: now,
        };
        Ok((started, event))
    }

    /// Close a car's session, free its spot and price the stay
    pub fn end_session(
        &self,
        car_id: CarId,
        now: DateTime<Local>,
    ) -> Result<(SessionReceipt, CoreEvent)> {
        let keep_start = self.config.keep_session_start_on_exit;

        let result = self.transact(|t| {
            let car = t.car(car_id).ok_or(ParkError::CarNotFound(car_id))?;
            let spot_id = match (car.is_parked, car.parking_spot_id) {
                (true, Some(spot_id)) => spot_id,
                _ => return Err(ParkError::CarNotParked(car_id)),
            };

            let (car, spot) = t
                .car_and_spot_mut(car_id, spot_id)
                .ok_or(ParkError::SpotNotFound(spot_id))?;

            // A parked car always has a start time; treat a missing one as
            // a zero-length stay.
            let started_at = car.parking_start_time.unwrap_or(now);

            spot.is_available = true;
            spot.car_id = None;
            spot.occupied_since = None;

            car.is_parked = false;
            car.parking_spot_id = None;
            if !keep_start {
                car.parking_start_time = None;
            }
            car.parking_end_time = Some(now);

            Ok((
                spot_id,
                SessionReceipt {
                    car_id,
                    license_plate: car.license_plate.clone(),
                    spot_number: spot.spot_number.clone(),
                    started_at,
                    ended_at: now,
                    duration_hours: duration_hours(&started_at, &now),
                    total_cost: parking_cost(&started_at, &now),
                },
            ))
        });

        let (spot_id, receipt) = match result {
            Ok(ended) => ended,
            Err(e) => {
                warn!(car_id = %car_id, error = %e, "Exit rejected");
                return Err(e);
            }
        };

        self.audit(AuditEventType::SessionEnded {
            car_id,
            parking_spot_id: spot_id,
            started_at: receipt.started_at,
            ended_at: receipt.ended_at,
            total_cost: receipt.total_cost,
        });
        info!(
            car_id = %car_id,
            spot_id = %spot_id,
            license_plate = %receipt.license_plate,
            duration_hours = %parkd_util::format_hours(receipt.duration_hours),
            total_cost = %format_currency(receipt.total_cost),
            "Parking ended"
        );

        let event = CoreEvent::SessionEnded {
            car_id,
            parking_spot_id: spot_id,
            started_at: receipt.started_at,
            ended_at: receipt.ended_at,
            total_cost: receipt.total_cost,
        };
        Ok((receipt, event))
    }

    /// The car's last closed parking period.
    ///
    /// A session still in progress has no end time and reports as missing.
    pub fn parking_period(&self, car_id: CarId) -> Result<ParkingPeriod> {
        self.transact(|t| {
            let car = t.car(car_id).ok_or(ParkError::CarNotFound(car_id))?;
            let (start, end) = car
                .closed_period()
                .ok_or(ParkError::NoParkingPeriod(car_id))?;

            Ok(ParkingPeriod {
                car_id,
                license_plate: car.license_plate.clone(),
                start_time: start,
                end_time: end,
                duration_hours: duration_hours(&start, &end),
            })
        })
    }

    /// The cost of the car's last closed parking period, recomputed from
    /// the stored times
    pub fn parking_cost(&self, car_id: CarId) -> Result<ParkingCost> {
        self.transact(|t| {
            let car = t.car(car_id).ok_or(ParkError::CarNotFound(car_id))?;
            let (start, end) = car
                .closed_period()
                .ok_or(ParkError::NoParkingPeriod(car_id))?;

            Ok(ParkingCost {
                car_id,
                license_plate: car.license_plate.clone(),
                start_time: start,
                end_time: end,
                total_cost: parking_cost(&start, &end),
            })
        })
    }

    /// A user with their cars and one history row per car
    pub fn user_details(&self, user_id: UserId) -> Result<UserDetails> {
        let details = self.transact(|t| {
            let user = t.user(user_id).ok_or(ParkError::UserNotFound(user_id))?;
            let cars: Vec<Car> = t.cars_owned_by(user_id).cloned().collect();
            let parking_history = cars.iter().map(history_entry).collect();

            Ok(UserDetails {
                user_id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                cars,
                parking_history,
            })
        })?;

        debug!(user_id = %user_id, cars = details.cars.len(), "User details read");
        Ok(details)
    }

    pub fn get_car(&self, car_id: CarId) -> Result<Car> {
        self.transact(|t| t.car(car_id).cloned().ok_or(ParkError::CarNotFound(car_id)))
    }

    /// All spots in id order
    pub fn list_spots(&self) -> Result<Vec<ParkingSpot>> {
        self.transact(|t| Ok(t.spots().cloned().collect()))
    }

    fn transact<R>(&self, f: impl FnOnce(&mut Tables) -> Result<R>) -> Result<R> {
        self.store.with_tables(f)?
    }

    fn audit(&self, event: AuditEventType) {
        if let Err(e) = self.store.append_audit(AuditEvent::new(event)) {
            warn!(error = %e, "Failed to append audit event");
        }
    }
}

fn check_can_begin(t: &Tables, car_id: CarId, spot_id: SpotId) -> Result<()> {
    let car = t.car(car_id).ok_or(ParkError::CarNotFound(car_id))?;
    let spot = t.spot(spot_id).ok_or(ParkError::SpotNotFound(spot_id))?;

    if !spot.is_available {
        return Err(ParkError::SpotUnavailable {
            spot_id,
            occupied_by: spot.car_id,
        });
    }

    if car.is_parked || car.parking_spot_id.is_some() {
        return Err(ParkError::CarAlreadyParked {
            car_id,
            spot_id: car.parking_spot_id.unwrap_or(spot_id),
        });
    }

    Ok(())
}

fn history_entry(car: &Car) -> ParkingHistoryEntry {
    let total_cost = car
        .closed_period()
        .map(|(start, end)| parking_cost(&start, &end))
        .unwrap_or(Decimal::ZERO);

    ParkingHistoryEntry {
        car_id: car.car_id,
        license_plate: car.license_plate.clone(),
        parking_start_time: car.parking_start_time,
        parking_end_time: car.parking_end_time,
        total_cost,
    }
}
