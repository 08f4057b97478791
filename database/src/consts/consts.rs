use std::{
    fmt::{self, Display},
    num::ParseIntError,
    str::FromStr,
    sync::atomic::{AtomicI64, Ordering},
};

use serde::{Deserialize, Serialize};

// Values
/// Key of the durable slot that holds the serialized person list
pub const PERSONS_SLOT: &str = "persons";

/// Last id handed out by `PersonId::new`, keeps ids issued within one process increasing
static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl PersonId {
    /// Issues an id from the creation timestamp (milliseconds since the epoch).
    ///
    /// Two ids requested within the same millisecond do not collide, the later one
    /// is bumped past the earlier one.
    pub fn new() -> PersonId {
        let now = chrono::Utc::now().timestamp_millis();
        let mut previous = LAST_ISSUED_ID.load(Ordering::Relaxed);

        loop {
            let next = if now > previous { now } else { previous + 1 };

            match LAST_ISSUED_ID.compare_exchange_weak(
                previous,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return PersonId(next),
                Err(actual) => previous = actual,
            }
        }
    }

    pub fn to_number(self) -> i64 {
        self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PersonId(s.trim().trim_start_matches('#').parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_issued_back_to_back_are_strictly_increasing() {
        let ids: Vec<PersonId> = (0..100).map(|_| PersonId::new()).collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} should be before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn parses_with_or_without_hash_prefix() {
        assert_eq!("42".parse::<PersonId>().unwrap(), PersonId(42));
        assert_eq!("#42".parse::<PersonId>().unwrap(), PersonId(42));
        assert!("forty-two".parse::<PersonId>().is_err());
    }

    #[test]
    fn serializes_as_a_bare_number() {
        assert_eq!(serde_json::to_string(&PersonId(7)).unwrap(), "7");
    }
}
