//! `househunter-core`: document model shared by every other crate.
//!
//! This crate contains **pure domain** types (no storage or HTTP concerns).

pub mod error;
pub mod house;
pub mod id;
pub mod query;
pub mod results;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use house::{House, HouseDocument, HouseFields};
pub use id::{HouseId, UserId};
pub use query::{HouseQuery, SortOrder, SortSpec};
pub use results::{CreateUserOutcome, DeleteResult, InsertResult, UpdateResult};
pub use user::{Role, User, UserDocument};
