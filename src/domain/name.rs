use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated display name for an element or part.
///
/// Leading and trailing whitespace is trimmed on construction. The trimmed
/// string must be non-empty and must not contain control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(NonEmptyString);

impl Name {
    /// Creates a new `Name` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNameError` if the string is empty (or whitespace-only)
    /// after trimming, or contains control characters.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidNameError> {
        let s = s.into();
        let trimmed = s.trim();

        if trimmed.chars().any(char::is_control) {
            return Err(InvalidNameError(s));
        }

        let non_empty =
            NonEmptyString::new(trimmed.to_string()).map_err(|_| InvalidNameError(s))?;

        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Name {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string cannot be used as a display name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid name '{0}': must be non-empty after trimming and free of control characters")]
pub struct InvalidNameError(String);
