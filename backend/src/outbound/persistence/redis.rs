//! Redis-backed document store adapters.
//!
//! Each entity is one JSON document under a `<kind>:<key>` string key, so a
//! write always replaces the whole document. Connections come from a shared
//! bb8 pool.

use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::{
    GroupRepository, GroupStoreError, RestaurantRepository, RestaurantStoreError, UserRepository,
    UserStoreError,
};
use crate::domain::{EmailAddress, Group, GroupId, Restaurant, RestaurantId, User, UserId};

/// Shared connection pool for the Redis stores.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Build a connection pool for the given Redis URL.
pub async fn connect_pool(url: &str) -> Result<RedisPool, bb8_redis::redis::RedisError> {
    let manager = RedisConnectionManager::new(url)?;
    Pool::builder().max_size(16).build(manager).await
}

enum DocError {
    Connection(String),
    Query(String),
    Serialization(String),
}

async fn get_doc<T: DeserializeOwned>(pool: &RedisPool, key: String) -> Result<Option<T>, DocError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|error| DocError::Connection(error.to_string()))?;
    let raw: Option<String> = conn
        .get(&key)
        .await
        .map_err(|error| DocError::Query(error.to_string()))?;
    raw.map(|doc| serde_json::from_str(&doc))
        .transpose()
        .map_err(|error| DocError::Serialization(error.to_string()))
}

async fn get_all<T: DeserializeOwned>(pool: &RedisPool, pattern: &str) -> Result<Vec<T>, DocError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|error| DocError::Connection(error.to_string()))?;
    let keys: Vec<String> = conn
        .keys(pattern)
        .await
        .map_err(|error| DocError::Query(error.to_string()))?;
    let mut documents = Vec::with_capacity(keys.len());
    for key in keys {
        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|error| DocError::Query(error.to_string()))?;
        if let Some(doc) = raw {
            documents.push(
                serde_json::from_str(&doc)
                    .map_err(|error| DocError::Serialization(error.to_string()))?,
            );
        }
    }
    Ok(documents)
}

async fn put_doc<T: Serialize>(pool: &RedisPool, key: String, value: &T) -> Result<(), DocError> {
    let doc =
        serde_json::to_string(value).map_err(|error| DocError::Serialization(error.to_string()))?;
    let mut conn = pool
        .get()
        .await
        .map_err(|error| DocError::Connection(error.to_string()))?;
    let _: () = conn
        .set(&key, doc)
        .await
        .map_err(|error| DocError::Query(error.to_string()))?;
    Ok(())
}

async fn drop_doc(pool: &RedisPool, key: String) -> Result<bool, DocError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|error| DocError::Connection(error.to_string()))?;
    let removed: i64 = conn
        .del(&key)
        .await
        .map_err(|error| DocError::Query(error.to_string()))?;
    Ok(removed > 0)
}

impl From<DocError> for UserStoreError {
    fn from(error: DocError) -> Self {
        match error {
            DocError::Connection(message) => Self::connection(message),
            DocError::Query(message) => Self::query(message),
            DocError::Serialization(message) => Self::serialization(message),
        }
    }
}

impl From<DocError> for RestaurantStoreError {
    fn from(error: DocError) -> Self {
        match error {
            DocError::Connection(message) => Self::connection(message),
            DocError::Query(message) => Self::query(message),
            DocError::Serialization(message) => Self::serialization(message),
        }
    }
}

impl From<DocError> for GroupStoreError {
    fn from(error: DocError) -> Self {
        match error {
            DocError::Connection(message) => Self::connection(message),
            DocError::Query(message) => Self::query(message),
            DocError::Serialization(message) => Self::serialization(message),
        }
    }
}

/// User documents under `user:<email>`.
#[derive(Clone)]
pub struct RedisUserStore {
    pool: RedisPool,
}

impl RedisUserStore {
    /// Create the store over a shared pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(email: &EmailAddress) -> String {
        format!("user:{email}")
    }
}

#[async_trait]
impl UserRepository for RedisUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        Ok(get_doc(&self.pool, Self::key(email)).await?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let users: Vec<User> = get_all(&self.pool, "user:*").await?;
        Ok(users.into_iter().find(|user| user.id == *id))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserStoreError> {
        Ok(get_all(&self.pool, "user:*").await?)
    }

    async fn create(&self, user: &User) -> Result<(), UserStoreError> {
        Ok(put_doc(&self.pool, Self::key(&user.email), user).await?)
    }

    async fn update(&self, email: &EmailAddress, user: &User) -> Result<(), UserStoreError> {
        if user.email != *email {
            drop_doc(&self.pool, Self::key(email)).await?;
        }
        Ok(put_doc(&self.pool, Self::key(&user.email), user).await?)
    }

    async fn delete(&self, email: &EmailAddress) -> Result<bool, UserStoreError> {
        Ok(drop_doc(&self.pool, Self::key(email)).await?)
    }
}

/// Restaurant documents under `restaurant:<id>`.
#[derive(Clone)]
pub struct RedisRestaurantStore {
    pool: RedisPool,
}

impl RedisRestaurantStore {
    /// Create the store over a shared pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(id: &RestaurantId) -> String {
        format!("restaurant:{id}")
    }
}

#[async_trait]
impl RestaurantRepository for RedisRestaurantStore {
    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantStoreError> {
        Ok(get_doc(&self.pool, Self::key(id)).await?)
    }

    async fn find_all(&self) -> Result<Vec<Restaurant>, RestaurantStoreError> {
        Ok(get_all(&self.pool, "restaurant:*").await?)
    }

    async fn create(&self, restaurant: &Restaurant) -> Result<(), RestaurantStoreError> {
        Ok(put_doc(&self.pool, Self::key(&restaurant.id), restaurant).await?)
    }

    async fn update(
        &self,
        id: &RestaurantId,
        restaurant: &Restaurant,
    ) -> Result<(), RestaurantStoreError> {
        Ok(put_doc(&self.pool, Self::key(id), restaurant).await?)
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantStoreError> {
        Ok(drop_doc(&self.pool, Self::key(id)).await?)
    }
}

/// Group documents under `group:<id>`.
#[derive(Clone)]
pub struct RedisGroupStore {
    pool: RedisPool,
}

impl RedisGroupStore {
    /// Create the store over a shared pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(id: &GroupId) -> String {
        format!("group:{id}")
    }
}

#[async_trait]
impl GroupRepository for RedisGroupStore {
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupStoreError> {
        Ok(get_doc(&self.pool, Self::key(id)).await?)
    }

    async fn find_all(&self) -> Result<Vec<Group>, GroupStoreError> {
        Ok(get_all(&self.pool, "group:*").await?)
    }

    async fn create(&self, group: &Group) -> Result<(), GroupStoreError> {
        Ok(put_doc(&self.pool, Self::key(&group.id()), group).await?)
    }

    async fn update(&self, id: &GroupId, group: &Group) -> Result<(), GroupStoreError> {
        Ok(put_doc(&self.pool, Self::key(id), group).await?)
    }

    async fn delete(&self, id: &GroupId) -> Result<bool, GroupStoreError> {
        Ok(drop_doc(&self.pool, Self::key(id)).await?)
    }
}
