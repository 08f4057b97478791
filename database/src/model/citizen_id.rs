use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Length of each of the five citizen id parts, in order
pub const PART_LENGTHS: [usize; 5] = [1, 4, 5, 2, 1];

const TOTAL_LENGTH: usize = 13;

#[derive(Error, Debug, PartialEq)]
pub enum CitizenIdError {
    #[error("Citizen id must have 5 parts, got {0}")]
    WrongPartCount(usize),

    #[error("Citizen id part {part} must be {expected} characters, got {actual}")]
    WrongPartLength {
        part: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Citizen id must be 13 characters without separators, got {0}")]
    WrongLength(usize),
}

/// National id split the way the form enters it: `1-2345-67890-12-3`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CitizenId {
    pub part1: String,
    pub part2: String,
    pub part3: String,
    pub part4: String,
    pub part5: String,
}

impl CitizenId {
    pub fn from_parts(parts: [&str; 5]) -> Result<Self, CitizenIdError> {
        for (index, (part, expected)) in parts.iter().zip(PART_LENGTHS).enumerate() {
            let actual = part.chars().count();

            if actual != expected {
                return Err(CitizenIdError::WrongPartLength {
                    part: index + 1,
                    expected,
                    actual,
                });
            }
        }

        let [part1, part2, part3, part4, part5] = parts.map(str::to_string);

        Ok(CitizenId {
            part1,
            part2,
            part3,
            part4,
            part5,
        })
    }

    /// Splits a single-string id (the older stored shape) into its parts. Dashes and
    /// whitespace are ignored, what remains must be exactly 13 characters.
    pub fn from_legacy(text: &str) -> Result<Self, CitizenIdError> {
        let compact: Vec<char> = text
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect();

        if compact.len() != TOTAL_LENGTH {
            return Err(CitizenIdError::WrongLength(compact.len()));
        }

        let mut parts: Vec<String> = Vec::with_capacity(PART_LENGTHS.len());
        let mut start = 0;

        for length in PART_LENGTHS {
            parts.push(compact[start..start + length].iter().collect());
            start += length;
        }

        let [part1, part2, part3, part4, part5]: [String; 5] = parts
            .try_into()
            .map_err(|parts: Vec<String>| CitizenIdError::WrongPartCount(parts.len()))?;

        Ok(CitizenId {
            part1,
            part2,
            part3,
            part4,
            part5,
        })
    }

    pub fn parts(&self) -> [&str; 5] {
        [
            &self.part1,
            &self.part2,
            &self.part3,
            &self.part4,
            &self.part5,
        ]
    }

    /// A stored id whose parts were all left blank
    pub fn is_blank(&self) -> bool {
        self.parts().iter().all(|part| part.trim().is_empty())
    }
}

impl fmt::Display for CitizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts().join("-"))
    }
}

impl FromStr for CitizenId {
    type Err = CitizenIdError;

    /// Accepts the dashed form with exact part lengths, or 13 characters without dashes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if !trimmed.contains('-') {
            return CitizenId::from_legacy(trimmed);
        }

        let parts: Vec<&str> = trimmed.split('-').map(str::trim).collect();

        let parts: [&str; 5] = parts
            .try_into()
            .map_err(|parts: Vec<&str>| CitizenIdError::WrongPartCount(parts.len()))?;

        CitizenId::from_parts(parts)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCitizenId {
    Parts(CitizenId),
    Text(String),
}

/// Reads either stored shape of `citizenId` and migrates the string shape to parts.
/// Values that cannot be migrated are dropped rather than failing the whole record.
pub(crate) fn deserialize_stored<'de, D>(deserializer: D) -> Result<Option<CitizenId>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredCitizenId>::deserialize(deserializer)?;

    let citizen_id = match stored {
        None => None,
        Some(StoredCitizenId::Parts(citizen_id)) if citizen_id.is_blank() => None,
        Some(StoredCitizenId::Parts(citizen_id)) => Some(citizen_id),
        Some(StoredCitizenId::Text(text)) if text.trim().is_empty() => None,
        Some(StoredCitizenId::Text(text)) => match CitizenId::from_legacy(&text) {
            Ok(citizen_id) => {
                log::debug!("Migrated single-string citizen id to parts");
                Some(citizen_id)
            }
            Err(err) => {
                log::warn!("Dropping stored citizen id that cannot be migrated: {}", err);
                None
            }
        },
    };

    Ok(citizen_id)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn dashed_form_is_split_into_parts() {
        let citizen_id: CitizenId = "1-2345-67890-12-3".parse().unwrap();

        assert_eq!(citizen_id.parts(), ["1", "2345", "67890", "12", "3"]);
        assert_eq!(citizen_id.to_string(), "1-2345-67890-12-3");
    }

    #[test]
    fn compact_form_is_split_by_part_lengths() {
        let citizen_id: CitizenId = "1234567890123".parse().unwrap();

        assert_eq!(citizen_id.parts(), ["1", "2345", "67890", "12", "3"]);
    }

    #[rstest]
    #[case("12-345-67890-12-3", CitizenIdError::WrongPartLength { part: 1, expected: 1, actual: 2 })]
    #[case("1-2345-67890-12", CitizenIdError::WrongPartCount(4))]
    #[case("123456", CitizenIdError::WrongLength(6))]
    fn malformed_input_is_rejected(#[case] input: &str, #[case] expected: CitizenIdError) {
        assert_eq!(input.parse::<CitizenId>().unwrap_err(), expected);
    }

    #[test]
    fn legacy_text_ignores_separators_and_whitespace() {
        let citizen_id = CitizenId::from_legacy(" 1 2345 67890 12 3 ").unwrap();

        assert_eq!(citizen_id.to_string(), "1-2345-67890-12-3");
    }

    #[test]
    fn serializes_as_named_parts() {
        let citizen_id: CitizenId = "1-2345-67890-12-3".parse().unwrap();

        assert_eq!(
            serde_json::to_value(&citizen_id).unwrap(),
            serde_json::json!({
                "part1": "1",
                "part2": "2345",
                "part3": "67890",
                "part4": "12",
                "part5": "3"
            })
        );
    }
}
