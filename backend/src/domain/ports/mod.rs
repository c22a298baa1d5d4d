//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (the repositories and the clock) describe what the domain
//! needs from adapters; driving ports (directory, catalogue, voting, login)
//! describe what inbound adapters may ask of the domain. Port errors carry
//! strongly typed variants so adapters map their failures into predictable
//! shapes instead of `anyhow`-style blobs.

mod macros;
pub(crate) use macros::define_store_error;

mod account_directory;
mod clock;
mod group_repository;
mod group_voting;
mod login_service;
mod restaurant_catalogue;
mod restaurant_repository;
mod user_repository;

pub use account_directory::{AccountDirectory, ProfilePatch, RegisterAccount};
#[cfg(test)]
pub use account_directory::MockAccountDirectory;
pub use clock::{Clock, FixtureClock, SystemClock};
#[cfg(test)]
pub use clock::MockClock;
pub use group_repository::{GroupRepository, GroupStoreError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_voting::{GroupVoting, NewGroup};
#[cfg(test)]
pub use group_voting::MockGroupVoting;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use restaurant_catalogue::{RestaurantCatalogue, RestaurantDraft};
#[cfg(test)]
pub use restaurant_catalogue::MockRestaurantCatalogue;
pub use restaurant_repository::{RestaurantRepository, RestaurantStoreError};
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use user_repository::{UserRepository, UserStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
