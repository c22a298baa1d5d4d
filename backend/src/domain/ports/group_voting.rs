//! Driving port for group management and the voting workflow.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, Group, GroupId, Restaurant, RestaurantId};

/// Inbound shape for creating a group from its founding members' emails.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub participant_emails: Vec<String>,
}

/// Domain use-case port for groups and their voting rounds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupVoting: Send + Sync {
    /// Create a group, resolving each founding email to a registered user.
    async fn create_group(&self, request: NewGroup) -> Result<Group, Error>;

    /// List every group.
    async fn list_groups(&self) -> Result<Vec<Group>, Error>;

    /// Fetch one group by identifier.
    async fn find_group(&self, id: &GroupId) -> Result<Group, Error>;

    /// Delete a group.
    async fn remove_group(&self, id: &GroupId) -> Result<(), Error>;

    /// Associate a restaurant with the group and open its ballot entry.
    async fn add_restaurant(
        &self,
        group_id: &GroupId,
        restaurant_id: &RestaurantId,
    ) -> Result<Group, Error>;

    /// Add a registered user to the group's participants.
    async fn join_group(&self, group_id: &GroupId, email: &EmailAddress) -> Result<Group, Error>;

    /// Record one vote from `email` for a restaurant in the group.
    async fn cast_vote(
        &self,
        email: &EmailAddress,
        restaurant_id: &RestaurantId,
        group_id: &GroupId,
    ) -> Result<Group, Error>;

    /// Close the current round and return the winning restaurant.
    async fn determine_winner(&self, group_id: &GroupId) -> Result<Restaurant, Error>;

    /// Restaurants not visited since the start of the current week.
    async fn eligible_restaurants(&self, group_id: &GroupId) -> Result<Vec<Restaurant>, Error>;
}
