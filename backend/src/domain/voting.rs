//! Voting and rotation engine for dining groups.
//!
//! [`VotingService`] owns every transition of the group document: membership,
//! restaurant association, vote casting, round close, and the weekly
//! eligibility filter. Each operation is a read-modify-write cycle: resolve
//! the group, apply the transition in memory, persist the whole document.
//! There is no optimistic concurrency check, so concurrent writes to the same
//! group race and the last writer wins; precondition failures happen before
//! the single write, which is all the rollback this model needs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    Clock, GroupRepository, GroupVoting, NewGroup, RestaurantRepository, UserRepository,
};
use crate::domain::verification::{Verifier, map_group_store_error};
use crate::domain::{
    EmailAddress, Error, Group, GroupId, GroupValidationError, Restaurant, RestaurantId,
};

/// Group management and voting workflow service.
#[derive(Clone)]
pub struct VotingService<G, U, R, C> {
    groups: Arc<G>,
    verifier: Verifier<G, U, R>,
    clock: Arc<C>,
}

impl<G, U, R, C> VotingService<G, U, R, C> {
    /// Create the service over the entity stores and a clock.
    pub fn new(groups: Arc<G>, users: Arc<U>, restaurants: Arc<R>, clock: Arc<C>) -> Self {
        let verifier = Verifier::new(Arc::clone(&groups), users, restaurants);
        Self {
            groups,
            verifier,
            clock,
        }
    }

    fn invariant(error: GroupValidationError) -> Error {
        Error::internal(format!("group invariant violated: {error}"))
    }
}

#[async_trait]
impl<G, U, R, C> GroupVoting for VotingService<G, U, R, C>
where
    G: GroupRepository,
    U: UserRepository,
    R: RestaurantRepository,
    C: Clock,
{
    async fn create_group(&self, request: NewGroup) -> Result<Group, Error> {
        let mut participants = Vec::with_capacity(request.participant_emails.len());
        for raw in &request.participant_emails {
            let email = EmailAddress::new(raw)
                .map_err(|error| Error::invalid_request(error.to_string()))?;
            participants.push(self.verifier.user(&email).await?);
        }
        let group = Group::try_new(participants, self.clock.now()).map_err(|error| match error {
            GroupValidationError::NoParticipants => {
                Error::invalid_state("group must have at least one participant")
            }
            GroupValidationError::ParticipantExists => Error::conflict("user already in group"),
            other => Self::invariant(other),
        })?;
        self.groups
            .create(&group)
            .await
            .map_err(map_group_store_error)?;
        info!(group_id = %group.id(), members = group.participants().len(), "group created");
        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, Error> {
        self.groups.find_all().await.map_err(map_group_store_error)
    }

    async fn find_group(&self, id: &GroupId) -> Result<Group, Error> {
        self.verifier.group(id).await
    }

    async fn remove_group(&self, id: &GroupId) -> Result<(), Error> {
        let deleted = self
            .groups
            .delete(id)
            .await
            .map_err(map_group_store_error)?;
        if deleted {
            info!(group_id = %id, "group removed");
            Ok(())
        } else {
            Err(Error::not_found("group not found"))
        }
    }

    async fn add_restaurant(
        &self,
        group_id: &GroupId,
        restaurant_id: &RestaurantId,
    ) -> Result<Group, Error> {
        let group = self.verifier.group(group_id).await?;
        if self
            .verifier
            .is_restaurant_in_group(restaurant_id, group_id)
            .await?
        {
            return Err(Error::conflict("restaurant already in group"));
        }
        let restaurant = self.verifier.restaurant(restaurant_id).await?;
        let updated = group.with_restaurant(restaurant).map_err(Self::invariant)?;
        self.groups
            .update(group_id, &updated)
            .await
            .map_err(map_group_store_error)?;
        debug!(group_id = %group_id, restaurant_id = %restaurant_id, "restaurant added to group");
        Ok(updated)
    }

    async fn join_group(&self, group_id: &GroupId, email: &EmailAddress) -> Result<Group, Error> {
        let group = self.verifier.group(group_id).await?;
        if self.verifier.is_user_in_group(email, group_id).await? {
            return Err(Error::conflict("user already in group"));
        }
        let user = self.verifier.user(email).await?;
        let updated = group.with_participant(user).map_err(Self::invariant)?;
        self.groups
            .update(group_id, &updated)
            .await
            .map_err(map_group_store_error)?;
        debug!(group_id = %group_id, email = %email, "user joined group");
        Ok(updated)
    }

    async fn cast_vote(
        &self,
        email: &EmailAddress,
        restaurant_id: &RestaurantId,
        group_id: &GroupId,
    ) -> Result<Group, Error> {
        let group = self.verifier.group(group_id).await?;
        self.verifier.user(email).await?;
        // The repeat-vote check runs before any restaurant validation.
        if self.verifier.has_voted(email, group_id).await? {
            return Err(Error::conflict("user already voted"));
        }
        self.verifier.restaurant(restaurant_id).await?;
        if !self
            .verifier
            .is_restaurant_in_group(restaurant_id, group_id)
            .await?
        {
            return Err(Error::conflict("restaurant not in group"));
        }
        let updated = group
            .with_vote(email.clone(), restaurant_id)
            .map_err(Self::invariant)?;
        self.groups
            .update(group_id, &updated)
            .await
            .map_err(map_group_store_error)?;
        debug!(group_id = %group_id, restaurant_id = %restaurant_id, "vote recorded");
        Ok(updated)
    }

    async fn determine_winner(&self, group_id: &GroupId) -> Result<Restaurant, Error> {
        let group = self.verifier.group(group_id).await?;
        let (updated, winner) =
            group
                .close_round(self.clock.now())
                .map_err(|error| match error {
                    GroupValidationError::EmptyBallot => Error::invalid_state("ballot is empty"),
                    other => Self::invariant(other),
                })?;
        self.groups
            .update(group_id, &updated)
            .await
            .map_err(map_group_store_error)?;
        info!(group_id = %group_id, winner_id = %winner.id, "round closed");
        Ok(winner)
    }

    async fn eligible_restaurants(&self, group_id: &GroupId) -> Result<Vec<Restaurant>, Error> {
        let group = self.verifier.group(group_id).await?;
        Ok(group.eligible_restaurants(self.clock.now()))
    }
}
