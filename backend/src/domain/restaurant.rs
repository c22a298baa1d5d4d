//! Restaurant entity and its typed identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the restaurant value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantValidationError {
    /// Identifier was empty or not a UUID.
    InvalidId,
}

impl fmt::Display for RestaurantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "restaurant id must be a valid UUID"),
        }
    }
}

impl std::error::Error for RestaurantValidationError {}

/// Stable restaurant identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    /// Validate and construct a [`RestaurantId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, RestaurantValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| RestaurantValidationError::InvalidId)
    }

    /// Generate a new random [`RestaurantId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RestaurantId> for String {
    fn from(value: RestaurantId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for RestaurantId {
    type Error = RestaurantValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A restaurant that groups can propose and vote on.
///
/// Restaurants live independently of groups; a group references them by value
/// in its own document, keyed by [`RestaurantId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub description: String,
    pub location: String,
}

impl Restaurant {
    /// Create a restaurant with a freshly generated identifier.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: RestaurantId::random(),
            name: name.into(),
            description: description.into(),
            location: location.into(),
        }
    }
}
