//! Infrastructure layer: collection gateways over the document store.

pub mod store;

pub use store::{HouseStore, InMemoryStore, PostgresStore, StoreError, UserStore};
