//! Collection gateways for the `users` and `houses` collections.
//!
//! Each operation maps to a single document operation; there is no
//! cross-collection consistency and no transactional grouping.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use househunter_core::{
    CreateUserOutcome, DeleteResult, House, HouseDocument, HouseFields, HouseId, HouseQuery,
    InsertResult, UpdateResult, User, UserDocument, UserId,
};

pub mod in_memory;
pub mod ordering;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Storage failure. Never recovered from; surfaces as a generic server error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Gateway over the `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All user documents.
    async fn list_users(&self) -> Result<Vec<UserDocument>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserDocument>, StoreError>;

    /// Insert unless a user with the same email exists.
    async fn create_user(&self, user: User) -> Result<CreateUserOutcome<UserId>, StoreError>;

    /// Delete by identifier. Missing documents yield a count of 0.
    async fn delete_user(&self, id: UserId) -> Result<DeleteResult, StoreError>;
}

/// Gateway over the `houses` collection.
#[async_trait]
pub trait HouseStore: Send + Sync {
    async fn insert_house(&self, house: House) -> Result<InsertResult<HouseId>, StoreError>;

    /// Matching documents, in insertion order unless the query sorts.
    async fn list_houses(&self, query: &HouseQuery) -> Result<Vec<HouseDocument>, StoreError>;

    async fn get_house(&self, id: HouseId) -> Result<Option<HouseDocument>, StoreError>;

    async fn delete_house(&self, id: HouseId) -> Result<DeleteResult, StoreError>;

    /// Overwrite the fixed field set; other fields and the identifier stay.
    async fn update_house(&self, id: HouseId, fields: HouseFields) -> Result<UpdateResult, StoreError>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<UserDocument>, StoreError> {
        (**self).list_users().await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserDocument>, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn create_user(&self, user: User) -> Result<CreateUserOutcome<UserId>, StoreError> {
        (**self).create_user(user).await
    }

    async fn delete_user(&self, id: UserId) -> Result<DeleteResult, StoreError> {
        (**self).delete_user(id).await
    }
}

#[async_trait]
impl<S> HouseStore for Arc<S>
where
    S: HouseStore + ?Sized,
{
    async fn insert_house(&self, house: House) -> Result<InsertResult<HouseId>, StoreError> {
        (**self).insert_house(house).await
    }

    async fn list_houses(&self, query: &HouseQuery) -> Result<Vec<HouseDocument>, StoreError> {
        (**self).list_houses(query).await
    }

    async fn get_house(&self, id: HouseId) -> Result<Option<HouseDocument>, StoreError> {
        (**self).get_house(id).await
    }

    async fn delete_house(&self, id: HouseId) -> Result<DeleteResult, StoreError> {
        (**self).delete_house(id).await
    }

    async fn update_house(&self, id: HouseId, fields: HouseFields) -> Result<UpdateResult, StoreError> {
        (**self).update_house(id, fields).await
    }
}
