//! Domain entities, ports, and services.
//!
//! Everything under this module is transport and storage agnostic: the HTTP
//! layer talks to the driving ports in [`ports`], and persistence is reached
//! only through the driven repository ports. The voting engine in [`voting`]
//! is the sole owner of the group state transitions (ballot, voters, visit
//! history); adapters never mutate a group directly.

pub mod accounts;
pub mod auth;
pub mod catalogue;
pub mod error;
pub mod group;
pub mod ports;
pub mod restaurant;
pub mod user;
pub mod verification;
pub mod voting;

#[cfg(test)]
mod voting_service_tests;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::group::{BallotEntry, Group, GroupId, GroupValidationError, VisitRecord};
pub use self::restaurant::{Restaurant, RestaurantId, RestaurantValidationError};
pub use self::user::{EmailAddress, User, UserId, UserValidationError};
