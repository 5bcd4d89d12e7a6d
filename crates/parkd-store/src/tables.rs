//! Entity tables

use parkd_api::{Car, ParkingSpot, User};
use parkd_util::{CarId, SpotId, UserId};
use std::collections::BTreeMap;

/// All mutable entity state.
///
/// Only ever reached through [`crate::Store::transaction`], so every
/// read-check-mutate sequence against these maps is serialized.
#[derive(Debug, Clone)]
pub struct Tables {
    users: BTreeMap<UserId, User>,
    cars: BTreeMap<CarId, Car>,
    spots: BTreeMap<SpotId, ParkingSpot>,
    /// Next identifier handed out by [`Tables::allocate_car_id`].
    /// `None` once the id space is exhausted.
    next_car_id: Option<CarId>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            cars: BTreeMap::new(),
            spots: BTreeMap::new(),
            next_car_id: Some(CarId::new(1)),
        }
    }
}

impl Tables {
    /// Replace all contents with the given entities.
    ///
    /// The car id counter restarts at one past the largest seeded car id.
    pub fn load_seed(&mut self, users: Vec<User>, cars: Vec<Car>, spots: Vec<ParkingSpot>) {
        self.users = users.into_iter().map(|u| (u.user_id, u)).collect();
        self.cars = cars.into_iter().map(|c| (c.car_id, c)).collect();
        self.spots = spots.into_iter().map(|s| (s.parking_spot_id, s)).collect();
        self.next_car_id = match self.cars.keys().next_back() {
            Some(max) => max.next(),
            None => Some(CarId::new(1)),
        };
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.get(&id)
    }

    pub fn spot(&self, id: SpotId) -> Option<&ParkingSpot> {
        self.spots.get(&id)
    }

    /// Mutable access to a car and a spot at once
    pub fn car_and_spot_mut(
        &mut self,
        car_id: CarId,
        spot_id: SpotId,
    ) -> Option<(&mut Car, &mut ParkingSpot)> {
        let car = self.cars.get_mut(&car_id)?;
        let spot = self.spots.get_mut(&spot_id)?;
        Some((car, spot))
    }

    /// Cars owned by a user, in id order
    pub fn cars_owned_by(&self, owner: UserId) -> impl Iterator<Item = &Car> {
        self.cars.values().filter(move |c| c.owner_id == owner)
    }

    /// All spots, in id order
    pub fn spots(&self) -> impl Iterator<Item = &ParkingSpot> {
        self.spots.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }

    /// Hand out the next car id. Ids are never reused.
    pub fn allocate_car_id(&mut self) -> Option<CarId> {
        let id = self.next_car_id?;
        self.next_car_id = id.next();
        Some(id)
    }

    /// Insert a car under its own id. Returns the car back if the id is taken.
    pub fn insert_car(&mut self, car: Car) -> Result<(), Car> {
        if self.cars.contains_key(&car.car_id) {
            return Err(car);
        }
        self.cars.insert(car.car_id, car);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkd_api::NewCar;

    fn car(id: u32, owner: u32) -> Car {
        Car::unparked(
            CarId::new(id),
            NewCar {
                license_plate: format!("PLATE{id}"),
                make: "Make".into(),
                model: "Model".into(),
                owner_id: UserId::new(owner),
            },
        )
    }

    #[test]
    fn empty_tables_start_ids_at_one() {
        let mut tables = Tables::default();
        assert_eq!(tables.allocate_car_id(), Some(CarId::new(1)));
        assert_eq!(tables.allocate_car_id(), Some(CarId::new(2)));
    }

    #[test]
    fn seeded_counter_continues_after_max_id() {
        let mut tables = Tables::default();
        tables.load_seed(vec![], vec![car(3, 1), car(7, 1)], vec![]);
        assert_eq!(tables.allocate_car_id(), Some(CarId::new(8)));
    }

    #[test]
    fn counter_exhaustion() {
        let mut tables = Tables::default();
        tables.load_seed(vec![], vec![car(u32::MAX, 1)], vec![]);
        assert_eq!(tables.allocate_car_id(), None);
    }

    #[test]
    fn insert_rejects_taken_id() {
        let mut tables = Tables::default();
        tables.insert_car(car(1, 1)).unwrap();
        let rejected = tables.insert_car(car(1, 2)).unwrap_err();
        assert_eq!(rejected.owner_id, UserId::new(2));
        assert_eq!(tables.car(CarId::new(1)).unwrap().owner_id, UserId::new(1));
    }

    #[test]
    fn cars_owned_by_filters_and_orders() {
        let mut tables = Tables::default();
        tables.load_seed(vec![], vec![car(5, 1), car(2, 1), car(3, 2)], vec![]);
        let ids: Vec<_> = tables
            .cars_owned_by(UserId::new(1))
            .map(|c| c.car_id.get())
            .collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn car_and_spot_mut_requires_both() {
        let mut tables = Tables::default();
        tables.load_seed(
            vec![],
            vec![car(1, 1)],
            vec![ParkingSpot::vacant(SpotId::new(1), "A1")],
        );
        assert!(tables.car_and_spot_mut(CarId::new(1), SpotId::new(1)).is_some());
        assert!(tables.car_and_spot_mut(CarId::new(1), SpotId::new(2)).is_none());
        assert!(tables.car_and_spot_mut(CarId::new(9), SpotId::new(1)).is_none());
    }
}
