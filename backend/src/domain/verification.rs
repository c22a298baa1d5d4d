//! Verification layer: existence and membership checks over the stores.
//!
//! Every operation either resolves an entity or fails with a typed domain
//! error. A store miss (`Ok(None)`) becomes `NotFound` here, so the services
//! above never see `Option`s; store failures map onto
//! `ServiceUnavailable`/`InternalError` depending on the variant. All
//! operations are pure reads.

use std::sync::Arc;

use crate::domain::ports::{
    GroupRepository, GroupStoreError, RestaurantRepository, RestaurantStoreError, UserRepository,
    UserStoreError,
};
use crate::domain::{EmailAddress, Error, Group, GroupId, Restaurant, RestaurantId, User};

pub(crate) fn map_group_store_error(error: GroupStoreError) -> Error {
    match error {
        GroupStoreError::Connection { message } => {
            Error::service_unavailable(format!("group store unavailable: {message}"))
        }
        GroupStoreError::Query { message } => {
            Error::internal(format!("group store error: {message}"))
        }
        GroupStoreError::Serialization { message } => {
            Error::internal(format!("group store serialization failed: {message}"))
        }
    }
}

pub(crate) fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => Error::internal(format!("user store error: {message}")),
        UserStoreError::Serialization { message } => {
            Error::internal(format!("user store serialization failed: {message}"))
        }
    }
}

pub(crate) fn map_restaurant_store_error(error: RestaurantStoreError) -> Error {
    match error {
        RestaurantStoreError::Connection { message } => {
            Error::service_unavailable(format!("restaurant store unavailable: {message}"))
        }
        RestaurantStoreError::Query { message } => {
            Error::internal(format!("restaurant store error: {message}"))
        }
        RestaurantStoreError::Serialization { message } => {
            Error::internal(format!("restaurant store serialization failed: {message}"))
        }
    }
}

/// Read-side resolver over the three entity stores.
#[derive(Clone)]
pub struct Verifier<G, U, R> {
    groups: Arc<G>,
    users: Arc<U>,
    restaurants: Arc<R>,
}

impl<G, U, R> Verifier<G, U, R> {
    /// Create a verifier over the given stores.
    pub fn new(groups: Arc<G>, users: Arc<U>, restaurants: Arc<R>) -> Self {
        Self {
            groups,
            users,
            restaurants,
        }
    }
}

impl<G, U, R> Verifier<G, U, R>
where
    G: GroupRepository,
    U: UserRepository,
    R: RestaurantRepository,
{
    /// Resolve a group or fail with `NotFound("group not found")`.
    pub async fn group(&self, id: &GroupId) -> Result<Group, Error> {
        self.groups
            .find_by_id(id)
            .await
            .map_err(map_group_store_error)?
            .ok_or_else(|| Error::not_found("group not found"))
    }

    /// Resolve a user or fail with `NotFound("user not found")`.
    pub async fn user(&self, email: &EmailAddress) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Resolve a restaurant or fail with `NotFound("restaurant not found")`.
    pub async fn restaurant(&self, id: &RestaurantId) -> Result<Restaurant, Error> {
        self.restaurants
            .find_by_id(id)
            .await
            .map_err(map_restaurant_store_error)?
            .ok_or_else(|| Error::not_found("restaurant not found"))
    }

    /// Whether some participant of the group has this email.
    pub async fn is_user_in_group(
        &self,
        email: &EmailAddress,
        group_id: &GroupId,
    ) -> Result<bool, Error> {
        Ok(self.group(group_id).await?.has_participant(email))
    }

    /// Whether the restaurant is associated with the group.
    pub async fn is_restaurant_in_group(
        &self,
        restaurant_id: &RestaurantId,
        group_id: &GroupId,
    ) -> Result<bool, Error> {
        Ok(self.group(group_id).await?.has_restaurant(restaurant_id))
    }

    /// Whether the email already voted in the group's current round.
    pub async fn has_voted(&self, email: &EmailAddress, group_id: &GroupId) -> Result<bool, Error> {
        Ok(self.group(group_id).await?.has_voter(email))
    }

    /// Whether the restaurant appears in the group's visit history.
    pub async fn already_visited(
        &self,
        restaurant_id: &RestaurantId,
        group_id: &GroupId,
    ) -> Result<bool, Error> {
        Ok(self.group(group_id).await?.has_visited(restaurant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockGroupRepository, MockRestaurantRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, Group};
    use chrono::{TimeZone, Utc};

    fn verifier(
        groups: MockGroupRepository,
    ) -> Verifier<MockGroupRepository, MockUserRepository, MockRestaurantRepository> {
        Verifier::new(
            Arc::new(groups),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockRestaurantRepository::new()),
        )
    }

    fn sample_group() -> Group {
        let user = User::new(
            "ana",
            EmailAddress::new("ana@example.com").expect("valid email"),
            "hash",
        );
        Group::try_new(
            vec![user],
            Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).single().expect("valid date"),
        )
        .expect("valid group")
    }

    #[tokio::test]
    async fn missing_group_becomes_not_found() {
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let error = verifier(groups)
            .group(&GroupId::random())
            .await
            .expect_err("miss becomes error");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "group not found");
    }

    #[tokio::test]
    async fn store_connection_failures_surface_as_service_unavailable() {
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Err(GroupStoreError::connection("refused")));

        let error = verifier(groups)
            .group(&GroupId::random())
            .await
            .expect_err("failure surfaces");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn membership_predicates_resolve_the_group_first() {
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let error = verifier(groups)
            .is_user_in_group(
                &EmailAddress::new("ana@example.com").expect("valid email"),
                &GroupId::random(),
            )
            .await
            .expect_err("missing group propagates");
        assert_eq!(error.message(), "group not found");
    }

    #[tokio::test]
    async fn predicates_report_membership_by_email_and_id() {
        let group = sample_group();
        let group_id = group.id();
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));

        let verifier = verifier(groups);
        let ana = EmailAddress::new("ana@example.com").expect("valid email");
        let rui = EmailAddress::new("rui@example.com").expect("valid email");
        assert!(verifier.is_user_in_group(&ana, &group_id).await.expect("resolves"));
        assert!(!verifier.is_user_in_group(&rui, &group_id).await.expect("resolves"));
        assert!(
            !verifier
                .is_restaurant_in_group(&RestaurantId::random(), &group_id)
                .await
                .expect("resolves")
        );
        assert!(!verifier.has_voted(&ana, &group_id).await.expect("resolves"));
        assert!(
            !verifier
                .already_visited(&RestaurantId::random(), &group_id)
                .await
                .expect("resolves")
        );
    }
}
