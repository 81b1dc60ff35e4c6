//! Station name type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// The name of a station.
///
/// Names are the join key across lines: two memberships with the same name
/// on different lines are the same physical station. Matching is exact and
/// case-sensitive, so the name is stored as given once it has been checked
/// to be non-blank.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationName;
///
/// let ameerpet = StationName::parse("Ameerpet").unwrap();
/// assert_eq!(ameerpet.as_str(), "Ameerpet");
///
/// // Blank names are rejected
/// assert!(StationName::parse("").is_err());
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Parse a station name.
    ///
    /// The name must contain at least one non-whitespace character and must
    /// not carry leading or trailing whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        if s.trim().is_empty() {
            return Err(InvalidStationName {
                reason: "must not be blank",
            });
        }

        if s.trim() != s {
            return Err(InvalidStationName {
                reason: "must not have leading or trailing whitespace",
            });
        }

        Ok(StationName(s.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationName {
    type Error = InvalidStationName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl Borrow<str> for StationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
