//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountDirectory, GroupVoting, LoginService, RestaurantCatalogue};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub catalogue: Arc<dyn RestaurantCatalogue>,
    pub groups: Arc<dyn GroupVoting>,
}

impl HttpState {
    /// Bundle the four driving ports.
    pub fn new(
        login: Arc<dyn LoginService>,
        accounts: Arc<dyn AccountDirectory>,
        catalogue: Arc<dyn RestaurantCatalogue>,
        groups: Arc<dyn GroupVoting>,
    ) -> Self {
        Self {
            login,
            accounts,
            catalogue,
            groups,
        }
    }
}
