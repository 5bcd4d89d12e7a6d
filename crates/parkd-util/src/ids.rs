//! Strongly-typed identifiers for parkd

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a registered user
    UserId
);

numeric_id!(
    /// Identifier of a registered car
    CarId
);

numeric_id!(
    /// Identifier of a parking spot
    SpotId
);

impl CarId {
    /// The identifier following this one
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

/// Unique identifier for a connected IPC client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_id_ordering_and_next() {
        let a = CarId::new(1);
        let b = CarId::new(2);
        assert!(a < b);
        assert_eq!(a.next(), Some(b));
        assert_eq!(CarId::new(u32::MAX).next(), None);
    }

    #[test]
    fn client_id_uniqueness() {
        let c1 = ClientId::new();
        let c2 = ClientId::new();
        assert_ne!(c1, c2);
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&SpotId::new(12)).unwrap();
        assert_eq!(json, "12");

        let parsed: UserId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, UserId::new(3));
    }
}
