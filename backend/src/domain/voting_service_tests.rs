//! Service-level coverage for the voting workflow.
//!
//! Flow tests drive the real service against the in-memory stores so every
//! persisted transition is observable; mock-based tests pin down call
//! ordering and the no-write-on-failure guarantees.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    FixtureClock, GroupVoting, MockGroupRepository, MockRestaurantRepository, MockUserRepository,
    NewGroup,
};
use crate::domain::voting::VotingService;
use crate::domain::{EmailAddress, ErrorCode, Group, Restaurant, RestaurantId, User};
use crate::outbound::persistence::memory::{
    InMemoryGroupStore, InMemoryRestaurantStore, InMemoryUserStore,
};

type MemoryVotingService =
    VotingService<InMemoryGroupStore, InMemoryUserStore, InMemoryRestaurantStore, FixtureClock>;

fn wednesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).single().expect("valid date")
}

fn prior_wednesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).single().expect("valid date")
}

fn email(name: &str) -> EmailAddress {
    EmailAddress::new(format!("{name}@example.com")).expect("valid email")
}

struct Harness {
    groups: Arc<InMemoryGroupStore>,
    users: Arc<InMemoryUserStore>,
    restaurants: Arc<InMemoryRestaurantStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            groups: Arc::new(InMemoryGroupStore::default()),
            users: Arc::new(InMemoryUserStore::default()),
            restaurants: Arc::new(InMemoryRestaurantStore::default()),
        }
    }

    /// Service sharing this harness's stores, with the clock pinned to `now`.
    fn service_at(&self, now: DateTime<Utc>) -> MemoryVotingService {
        VotingService::new(
            Arc::clone(&self.groups),
            Arc::clone(&self.users),
            Arc::clone(&self.restaurants),
            Arc::new(FixtureClock(now)),
        )
    }

    fn service(&self) -> MemoryVotingService {
        self.service_at(wednesday())
    }

    async fn seed_users(&self, names: &[&str]) -> Vec<User> {
        use crate::domain::ports::UserRepository;
        let mut users = Vec::new();
        for name in names {
            let user = User::new(*name, email(name), "hash");
            self.users.create(&user).await.expect("seed user");
            users.push(user);
        }
        users
    }

    async fn seed_restaurants(&self, names: &[&str]) -> Vec<Restaurant> {
        use crate::domain::ports::RestaurantRepository;
        let mut restaurants = Vec::new();
        for name in names {
            let restaurant = Restaurant::new(*name, "a description", "Rua F");
            self.restaurants.create(&restaurant).await.expect("seed restaurant");
            restaurants.push(restaurant);
        }
        restaurants
    }

    async fn group_of(&self, names: &[&str]) -> Group {
        self.service()
            .create_group(NewGroup {
                participant_emails: names
                    .iter()
                    .map(|name| format!("{name}@example.com"))
                    .collect(),
            })
            .await
            .expect("group creation succeeds")
    }

    async fn reload(&self, group: &Group) -> Group {
        use crate::domain::ports::GroupRepository;
        self.groups
            .find_by_id(&group.id())
            .await
            .expect("group lookup")
            .expect("group present")
    }
}

fn mock_service(
    groups: MockGroupRepository,
    users: MockUserRepository,
    restaurants: MockRestaurantRepository,
) -> VotingService<MockGroupRepository, MockUserRepository, MockRestaurantRepository, FixtureClock>
{
    VotingService::new(
        Arc::new(groups),
        Arc::new(users),
        Arc::new(restaurants),
        Arc::new(FixtureClock(wednesday())),
    )
}

mod group_creation {
    use super::*;

    #[tokio::test]
    async fn resolves_each_founding_email() {
        let harness = Harness::new();
        let seeded = harness.seed_users(&["ana", "rui"]).await;
        let group = harness.group_of(&["ana", "rui"]).await;
        assert_eq!(group.participants(), seeded.as_slice());

        let stored = harness.reload(&group).await;
        assert_eq!(stored.participants().len(), 2);
    }

    #[tokio::test]
    async fn rejects_an_empty_member_list_without_persisting() {
        use crate::domain::ports::GroupRepository;
        let harness = Harness::new();
        let error = harness
            .service()
            .create_group(NewGroup {
                participant_emails: Vec::new(),
            })
            .await
            .expect_err("empty group rejected");
        assert_eq!(error.code(), ErrorCode::InvalidState);
        assert_eq!(error.message(), "group must have at least one participant");
        assert!(harness.groups.find_all().await.expect("list groups").is_empty());
    }

    #[tokio::test]
    async fn rejects_unregistered_emails_without_persisting() {
        use crate::domain::ports::GroupRepository;
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let error = harness
            .service()
            .create_group(NewGroup {
                participant_emails: vec!["ana@example.com".into(), "ghost@example.com".into()],
            })
            .await
            .expect_err("unknown member rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "user not found");
        assert!(harness.groups.find_all().await.expect("list groups").is_empty());
    }

    #[tokio::test]
    async fn remove_group_reports_not_found_for_unknown_ids() {
        let harness = Harness::new();
        let error = harness
            .service()
            .remove_group(&crate::domain::GroupId::random())
            .await
            .expect_err("unknown group rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}

mod restaurant_association {
    use super::*;

    #[tokio::test]
    async fn appends_the_restaurant_and_a_zero_vote_ballot_entry() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria"]).await;
        let group = harness.group_of(&["ana"]).await;

        let updated = harness
            .service()
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect("association succeeds");
        assert_eq!(updated.restaurants().len(), 1);
        assert_eq!(updated.ballot().len(), 1);
        assert_eq!(updated.ballot()[0].votes, 0);
        assert_eq!(updated.ballot()[0].restaurant.id, restaurants[0].id);

        let stored = harness.reload(&group).await;
        assert_eq!(stored.restaurants().len(), stored.ballot().len());
    }

    #[tokio::test]
    async fn repeat_association_conflicts_and_leaves_the_group_unchanged() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();

        service
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect("first association succeeds");
        let error = service
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect_err("repeat association rejected");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "restaurant already in group");

        let stored = harness.reload(&group).await;
        assert_eq!(stored.restaurants().len(), 1);
        assert_eq!(stored.ballot().len(), 1);
    }

    #[tokio::test]
    async fn unknown_group_and_restaurant_surface_as_not_found() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();

        let error = service
            .add_restaurant(&crate::domain::GroupId::random(), &RestaurantId::random())
            .await
            .expect_err("unknown group rejected");
        assert_eq!(error.message(), "group not found");

        let error = service
            .add_restaurant(&group.id(), &RestaurantId::random())
            .await
            .expect_err("unknown restaurant rejected");
        assert_eq!(error.message(), "restaurant not found");
        assert!(harness.reload(&group).await.restaurants().is_empty());
    }
}

mod membership {
    use super::*;

    #[tokio::test]
    async fn join_appends_the_resolved_user() {
        let harness = Harness::new();
        harness.seed_users(&["ana", "rui"]).await;
        let group = harness.group_of(&["ana"]).await;

        let updated = harness
            .service()
            .join_group(&group.id(), &email("rui"))
            .await
            .expect("join succeeds");
        assert_eq!(updated.participants().len(), 2);
        assert_eq!(updated.participants()[1].email, email("rui"));
    }

    #[tokio::test]
    async fn joining_twice_conflicts() {
        let harness = Harness::new();
        harness.seed_users(&["ana", "rui"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();

        service
            .join_group(&group.id(), &email("rui"))
            .await
            .expect("first join succeeds");
        let error = service
            .join_group(&group.id(), &email("rui"))
            .await
            .expect_err("repeat join rejected");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "user already in group");
    }

    #[tokio::test]
    async fn joining_with_an_unknown_email_fails() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let group = harness.group_of(&["ana"]).await;
        let error = harness
            .service()
            .join_group(&group.id(), &email("ghost"))
            .await
            .expect_err("unknown user rejected");
        assert_eq!(error.message(), "user not found");
    }
}

mod vote_casting {
    use super::*;

    #[tokio::test]
    async fn votes_tally_per_ballot_entry() {
        let harness = Harness::new();
        harness.seed_users(&["ana", "rui", "eva"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina"]).await;
        let group = harness.group_of(&["ana", "rui", "eva"]).await;
        let service = harness.service();
        for restaurant in &restaurants {
            service
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }

        service
            .cast_vote(&email("ana"), &restaurants[1].id, &group.id())
            .await
            .expect("vote lands");
        service
            .cast_vote(&email("rui"), &restaurants[1].id, &group.id())
            .await
            .expect("vote lands");
        service
            .cast_vote(&email("eva"), &restaurants[0].id, &group.id())
            .await
            .expect("vote lands");

        let stored = harness.reload(&group).await;
        assert_eq!(stored.ballot()[0].votes, 1);
        assert_eq!(stored.ballot()[1].votes, 2);
        assert_eq!(stored.voters().len(), 3);
    }

    #[tokio::test]
    async fn a_second_vote_in_the_same_round_conflicts_without_changing_counts() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();
        for restaurant in &restaurants {
            service
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }

        service
            .cast_vote(&email("ana"), &restaurants[0].id, &group.id())
            .await
            .expect("first vote lands");
        let error = service
            .cast_vote(&email("ana"), &restaurants[1].id, &group.id())
            .await
            .expect_err("second vote rejected");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "user already voted");

        let stored = harness.reload(&group).await;
        assert_eq!(stored.ballot()[0].votes, 1);
        assert_eq!(stored.ballot()[1].votes, 0);
        assert_eq!(stored.voters().len(), 1);
    }

    #[tokio::test]
    async fn the_repeat_vote_check_runs_before_restaurant_validation() {
        let member = User::new("ana", email("ana"), "hash");
        let group = Group::try_new(vec![member.clone()], wednesday())
            .expect("valid group")
            .with_restaurant(Restaurant::new("Trattoria", "", ""))
            .expect("restaurant added");
        let voted = group
            .clone()
            .with_vote(email("ana"), &group.restaurants()[0].id)
            .expect("vote recorded");

        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(voted.clone())));
        groups.expect_update().times(0);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().times(0);

        let service = mock_service(groups, users, restaurants);
        let error = service
            .cast_vote(&email("ana"), &RestaurantId::random(), &crate::domain::GroupId::random())
            .await
            .expect_err("spent voter rejected");
        assert_eq!(error.message(), "user already voted");
    }

    #[tokio::test]
    async fn voting_for_a_restaurant_outside_the_group_conflicts() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();
        service
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect("association succeeds");

        // Cantina exists in the catalogue but was never proposed here.
        let error = service
            .cast_vote(&email("ana"), &restaurants[1].id, &group.id())
            .await
            .expect_err("outside restaurant rejected");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "restaurant not in group");
        assert!(harness.reload(&group).await.voters().is_empty());
    }

    #[tokio::test]
    async fn an_unknown_voter_fails_before_any_write() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();
        service
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect("association succeeds");

        let error = service
            .cast_vote(&email("ghost"), &restaurants[0].id, &group.id())
            .await
            .expect_err("unknown voter rejected");
        assert_eq!(error.message(), "user not found");
        assert!(harness.reload(&group).await.voters().is_empty());
    }
}

mod round_close {
    use super::*;

    fn ballot_group(a_votes: u32, b_votes: u32) -> (Group, Restaurant, Restaurant) {
        let a = Restaurant::new("A", "", "");
        let b = Restaurant::new("B", "", "");
        let mut group = Group::try_new(vec![User::new("ana", email("ana"), "hash")], wednesday())
            .expect("valid group")
            .with_restaurant(a.clone())
            .and_then(|group| group.with_restaurant(b.clone()))
            .expect("restaurants added");
        for i in 0..a_votes {
            group = group.with_vote(email(&format!("a{i}")), &a.id).expect("vote");
        }
        for i in 0..b_votes {
            group = group.with_vote(email(&format!("b{i}")), &b.id).expect("vote");
        }
        (group, a, b)
    }

    #[tokio::test]
    async fn the_strict_maximum_wins() {
        let (group, _, b) = ballot_group(4, 8);
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));
        groups.expect_update().times(1).returning(|_, _| Ok(()));

        let service = mock_service(groups, MockUserRepository::new(), MockRestaurantRepository::new());
        let winner = service
            .determine_winner(&crate::domain::GroupId::random())
            .await
            .expect("round closes");
        assert_eq!(winner.id, b.id);
    }

    #[tokio::test]
    async fn ties_resolve_to_the_earliest_inserted_restaurant() {
        let (group, a, _) = ballot_group(5, 5);
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));
        groups.expect_update().times(1).returning(|_, _| Ok(()));

        let service = mock_service(groups, MockUserRepository::new(), MockRestaurantRepository::new());
        let winner = service
            .determine_winner(&crate::domain::GroupId::random())
            .await
            .expect("round closes");
        assert_eq!(winner.id, a.id);
    }

    #[tokio::test]
    async fn closing_a_round_resets_the_ballot_and_voter_list() {
        let harness = Harness::new();
        harness.seed_users(&["ana", "rui"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina"]).await;
        let group = harness.group_of(&["ana", "rui"]).await;
        let service = harness.service();
        for restaurant in &restaurants {
            service
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }
        service
            .cast_vote(&email("ana"), &restaurants[1].id, &group.id())
            .await
            .expect("vote lands");

        let winner = service
            .determine_winner(&group.id())
            .await
            .expect("round closes");
        assert_eq!(winner.id, restaurants[1].id);

        let stored = harness.reload(&group).await;
        assert!(stored.ballot().iter().all(|entry| entry.votes == 0));
        assert!(stored.voters().is_empty());
        assert_eq!(stored.visited().len(), 1);
        assert_eq!(stored.visited()[0].visited_at, wednesday());
    }

    #[tokio::test]
    async fn a_repeat_winner_keeps_a_single_history_record() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria"]).await;
        let group = harness.group_of(&["ana"]).await;
        harness
            .service_at(prior_wednesday())
            .add_restaurant(&group.id(), &restaurants[0].id)
            .await
            .expect("association succeeds");

        harness
            .service_at(prior_wednesday())
            .determine_winner(&group.id())
            .await
            .expect("first round closes");
        harness
            .service_at(wednesday())
            .determine_winner(&group.id())
            .await
            .expect("second round closes");

        let stored = harness.reload(&group).await;
        assert_eq!(stored.visited().len(), 1);
        assert_eq!(stored.visited()[0].visited_at, wednesday());
    }

    #[tokio::test]
    async fn an_empty_ballot_is_invalid_state_and_writes_nothing() {
        let group = Group::try_new(vec![User::new("ana", email("ana"), "hash")], wednesday())
            .expect("valid group");
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));
        groups.expect_update().times(0);

        let service = mock_service(groups, MockUserRepository::new(), MockRestaurantRepository::new());
        let error = service
            .determine_winner(&crate::domain::GroupId::random())
            .await
            .expect_err("empty ballot rejected");
        assert_eq!(error.code(), ErrorCode::InvalidState);
        assert_eq!(error.message(), "ballot is empty");
    }
}

mod weekly_eligibility {
    use super::*;

    #[tokio::test]
    async fn a_group_without_history_lists_every_restaurant() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina", "Bistro"]).await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();
        for restaurant in &restaurants {
            service
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }

        let eligible = service
            .eligible_restaurants(&group.id())
            .await
            .expect("listing succeeds");
        assert_eq!(eligible, restaurants);
    }

    #[tokio::test]
    async fn this_weeks_winner_drops_out_until_next_week() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness
            .seed_restaurants(&["Trattoria", "Cantina", "Bistro"])
            .await;
        let group = harness.group_of(&["ana"]).await;
        let service = harness.service();
        for restaurant in &restaurants {
            service
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }
        service
            .cast_vote(&email("ana"), &restaurants[0].id, &group.id())
            .await
            .expect("vote lands");
        service
            .determine_winner(&group.id())
            .await
            .expect("round closes");

        let eligible = service
            .eligible_restaurants(&group.id())
            .await
            .expect("listing succeeds");
        assert_eq!(eligible, restaurants[1..].to_vec());
    }

    #[tokio::test]
    async fn last_weeks_winner_becomes_eligible_again() {
        let harness = Harness::new();
        harness.seed_users(&["ana"]).await;
        let restaurants = harness.seed_restaurants(&["Trattoria", "Cantina"]).await;
        let group = harness.group_of(&["ana"]).await;
        let last_week = harness.service_at(prior_wednesday());
        for restaurant in &restaurants {
            last_week
                .add_restaurant(&group.id(), &restaurant.id)
                .await
                .expect("association succeeds");
        }
        last_week
            .determine_winner(&group.id())
            .await
            .expect("round closes");

        let eligible = harness
            .service_at(wednesday())
            .eligible_restaurants(&group.id())
            .await
            .expect("listing succeeds");
        assert_eq!(eligible, restaurants);
    }
}
