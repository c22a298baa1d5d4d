//! Group aggregate: participants, proposed restaurants, ballot, and visit
//! history.
//!
//! All mutation goes through consuming `with_*`/`close_round` methods that
//! validate the transition and return the updated aggregate, so an invalid
//! shape can never reach a store. The voting engine owns the call sites; the
//! HTTP and persistence layers only read.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::restaurant::{Restaurant, RestaurantId};
use super::user::{EmailAddress, User};

/// Validation errors returned by the group constructors and transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    /// Identifier was empty or not a UUID.
    InvalidId,
    /// A group cannot be created without participants.
    NoParticipants,
    /// The user is already a participant of the group.
    ParticipantExists,
    /// The restaurant is already associated with the group.
    RestaurantExists,
    /// The voter already cast a vote this round.
    AlreadyVoted,
    /// No ballot entry matches the restaurant being voted on.
    MissingBallotEntry,
    /// A round cannot close over an empty ballot.
    EmptyBallot,
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "group id must be a valid UUID"),
            Self::NoParticipants => write!(f, "group must have at least one participant"),
            Self::ParticipantExists => write!(f, "user already in group"),
            Self::RestaurantExists => write!(f, "restaurant already in group"),
            Self::AlreadyVoted => write!(f, "user already voted"),
            Self::MissingBallotEntry => write!(f, "no ballot entry for restaurant"),
            Self::EmptyBallot => write!(f, "ballot is empty"),
        }
    }
}

impl std::error::Error for GroupValidationError {}

/// Stable group identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(Uuid);

impl GroupId {
    /// Validate and construct a [`GroupId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, GroupValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| GroupValidationError::InvalidId)
    }

    /// Generate a new random [`GroupId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GroupId> for String {
    fn from(value: GroupId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for GroupId {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One restaurant's running vote count for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    pub restaurant: Restaurant,
    pub votes: u32,
}

/// Record of a restaurant winning a round, with the most recent visit date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub restaurant: Restaurant,
    pub visited_at: DateTime<Utc>,
}

/// A dining group.
///
/// ## Invariants
/// - At least one participant, unique by email.
/// - `restaurants` unique by id, and `ballot` mirrors it entry for entry.
/// - `voters` holds each email at most once per round; cleared when a round
///   closes.
/// - `visited` holds at most one record per restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    created_at: DateTime<Utc>,
    participants: Vec<User>,
    restaurants: Vec<Restaurant>,
    visited: Vec<VisitRecord>,
    ballot: Vec<BallotEntry>,
    voters: Vec<EmailAddress>,
}

impl Group {
    /// Create a group from its founding participants.
    pub fn try_new(
        participants: Vec<User>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GroupValidationError> {
        if participants.is_empty() {
            return Err(GroupValidationError::NoParticipants);
        }
        let mut seen = HashSet::new();
        if participants.iter().any(|user| !seen.insert(user.email.as_str())) {
            return Err(GroupValidationError::ParticipantExists);
        }
        Ok(Self {
            id: GroupId::random(),
            created_at,
            participants,
            restaurants: Vec::new(),
            visited: Vec::new(),
            ballot: Vec::new(),
            voters: Vec::new(),
        })
    }

    /// Group identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Members of the group.
    pub fn participants(&self) -> &[User] {
        &self.participants
    }

    /// Restaurants proposed into the group, in insertion order.
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Visit history, at most one record per restaurant.
    pub fn visited(&self) -> &[VisitRecord] {
        &self.visited
    }

    /// Current round's ballot, parallel to [`Self::restaurants`].
    pub fn ballot(&self) -> &[BallotEntry] {
        &self.ballot
    }

    /// Emails that already voted in the current round.
    pub fn voters(&self) -> &[EmailAddress] {
        &self.voters
    }

    /// Whether the email belongs to a participant.
    pub fn has_participant(&self, email: &EmailAddress) -> bool {
        self.participants.iter().any(|user| user.email == *email)
    }

    /// Whether the restaurant is associated with the group.
    pub fn has_restaurant(&self, id: &RestaurantId) -> bool {
        self.restaurants.iter().any(|restaurant| restaurant.id == *id)
    }

    /// Whether the email already voted in the current round.
    pub fn has_voter(&self, email: &EmailAddress) -> bool {
        self.voters.contains(email)
    }

    /// Whether the restaurant appears in the visit history.
    pub fn has_visited(&self, id: &RestaurantId) -> bool {
        self.visited.iter().any(|record| record.restaurant.id == *id)
    }

    /// Add a participant.
    pub fn with_participant(mut self, user: User) -> Result<Self, GroupValidationError> {
        if self.has_participant(&user.email) {
            return Err(GroupValidationError::ParticipantExists);
        }
        self.participants.push(user);
        Ok(self)
    }

    /// Associate a restaurant, opening a zero-vote ballot entry for it so the
    /// ballot stays parallel to the restaurant list.
    pub fn with_restaurant(mut self, restaurant: Restaurant) -> Result<Self, GroupValidationError> {
        if self.has_restaurant(&restaurant.id) {
            return Err(GroupValidationError::RestaurantExists);
        }
        self.ballot.push(BallotEntry {
            restaurant: restaurant.clone(),
            votes: 0,
        });
        self.restaurants.push(restaurant);
        Ok(self)
    }

    /// Record one vote from `voter` for the given restaurant.
    pub fn with_vote(
        mut self,
        voter: EmailAddress,
        restaurant_id: &RestaurantId,
    ) -> Result<Self, GroupValidationError> {
        if self.has_voter(&voter) {
            return Err(GroupValidationError::AlreadyVoted);
        }
        let entry = self
            .ballot
            .iter_mut()
            .find(|entry| entry.restaurant.id == *restaurant_id)
            .ok_or(GroupValidationError::MissingBallotEntry)?;
        entry.votes += 1;
        self.voters.push(voter);
        Ok(self)
    }

    /// Close the current round: pick the winner, stamp the visit history,
    /// reset every vote count, and clear the voter list.
    ///
    /// The winner is the first ballot entry holding the strict maximum vote
    /// count, so ties resolve to the earliest-inserted restaurant.
    pub fn close_round(
        mut self,
        now: DateTime<Utc>,
    ) -> Result<(Self, Restaurant), GroupValidationError> {
        let Some(first) = self.ballot.first() else {
            return Err(GroupValidationError::EmptyBallot);
        };
        let mut top_votes = first.votes;
        let mut winner = first.restaurant.clone();
        for entry in &self.ballot {
            if entry.votes > top_votes {
                top_votes = entry.votes;
                winner = entry.restaurant.clone();
            }
        }

        match self
            .visited
            .iter_mut()
            .find(|record| record.restaurant.id == winner.id)
        {
            Some(record) => record.visited_at = now,
            None => self.visited.push(VisitRecord {
                restaurant: winner.clone(),
                visited_at: now,
            }),
        }

        for entry in &mut self.ballot {
            entry.votes = 0;
        }
        self.voters.clear();
        Ok((self, winner))
    }

    /// Restaurants not visited since the start of the current week, in
    /// insertion order.
    ///
    /// The week boundary is day-of-month arithmetic: the current day of the
    /// month minus the days elapsed since Sunday. Near the start of a month
    /// the boundary can reach zero or below, in which case every recorded
    /// visit counts as falling inside the current week.
    pub fn eligible_restaurants(&self, now: DateTime<Utc>) -> Vec<Restaurant> {
        if self.visited.is_empty() {
            return self.restaurants.clone();
        }
        let week_start_day =
            i64::from(now.day()) - i64::from(now.weekday().num_days_from_sunday());
        self.restaurants
            .iter()
            .filter(|restaurant| {
                self.visited
                    .iter()
                    .find(|record| record.restaurant.id == restaurant.id)
                    .is_none_or(|record| i64::from(record.visited_at.day()) <= week_start_day)
            })
            .cloned()
            .collect()
    }
}
