use std::sync::RwLock;

use async_trait::async_trait;

use househunter_core::{
    CreateUserOutcome, DeleteResult, House, HouseDocument, HouseFields, HouseId, HouseQuery,
    InsertResult, UpdateResult, User, UserDocument, UserId,
};

use super::ordering::sort_documents;
use super::{HouseStore, StoreError, UserStore};

/// In-memory document store for tests/dev.
///
/// Collections are kept in insertion order. Each operation takes one lock,
/// so the signup existence check and insert are atomic here.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<UserDocument>>,
    houses: RwLock<Vec<HouseDocument>>,
}

fn poisoned(collection: &str) -> StoreError {
    StoreError::Storage(format!("{collection} collection lock poisoned"))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn list_users(&self) -> Result<Vec<UserDocument>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned("users"))?;
        Ok(users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserDocument>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned("users"))?;
        Ok(users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn create_user(&self, user: User) -> Result<CreateUserOutcome<UserId>, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned("users"))?;
        if users.iter().any(|u| u.user.email == user.email) {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        let id = UserId::new();
        users.push(UserDocument::new(id, user));
        Ok(CreateUserOutcome::Created(InsertResult::new(id)))
    }

    async fn delete_user(&self, id: UserId) -> Result<DeleteResult, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned("users"))?;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(DeleteResult::new((before - users.len()) as u64))
    }
}

#[async_trait]
impl HouseStore for InMemoryStore {
    async fn insert_house(&self, house: House) -> Result<InsertResult<HouseId>, StoreError> {
        let mut houses = self.houses.write().map_err(|_| poisoned("houses"))?;
        let id = HouseId::new();
        houses.push(HouseDocument::new(id, house));
        Ok(InsertResult::new(id))
    }

    async fn list_houses(&self, query: &HouseQuery) -> Result<Vec<HouseDocument>, StoreError> {
        let matching: Vec<HouseDocument> = {
            let houses = self.houses.read().map_err(|_| poisoned("houses"))?;
            houses
                .iter()
                .filter(|h| match &query.city {
                    Some(city) => h.house.city() == Some(city.as_str()),
                    None => true,
                })
                .cloned()
                .collect()
        };

        Ok(match &query.sort {
            Some(spec) => sort_documents(matching, spec),
            None => matching,
        })
    }

    async fn get_house(&self, id: HouseId) -> Result<Option<HouseDocument>, StoreError> {
        let houses = self.houses.read().map_err(|_| poisoned("houses"))?;
        Ok(houses.iter().find(|h| h.id == id).cloned())
    }

    async fn delete_house(&self, id: HouseId) -> Result<DeleteResult, StoreError> {
        let mut houses = self.houses.write().map_err(|_| poisoned("houses"))?;
        let before = houses.len();
        houses.retain(|h| h.id != id);
        Ok(DeleteResult::new((before - houses.len()) as u64))
    }

    async fn update_house(&self, id: HouseId, fields: HouseFields) -> Result<UpdateResult, StoreError> {
        let mut houses = self.houses.write().map_err(|_| poisoned("houses"))?;
        Ok(match houses.iter_mut().find(|h| h.id == id) {
            Some(doc) => {
                let modified = doc.overwrite(&fields);
                UpdateResult::new(1, u64::from(modified))
            }
            None => UpdateResult::new(0, 0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use househunter_core::{Role, SortOrder, SortSpec};
    use serde_json::{Value, json};

    fn house(body: Value) -> House {
        serde_json::from_value(body).unwrap()
    }

    fn rents(docs: &[HouseDocument]) -> Vec<Value> {
        docs.iter().map(|h| h.field("rent").unwrap_or(Value::Null)).collect()
    }

    #[tokio::test]
    async fn signup_is_idempotent_by_email() {
        let store = InMemoryStore::new();

        let first = store
            .create_user(User::new("a@example.com", Some(Role::owner())))
            .await
            .unwrap();
        assert!(matches!(first, CreateUserOutcome::Created(_)));

        let second = store.create_user(User::new("a@example.com", None)).await.unwrap();
        assert_eq!(second, CreateUserOutcome::AlreadyExists);

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user.role, Some(Role::owner()));
    }

    #[tokio::test]
    async fn finds_user_by_email_and_deletes_by_id() {
        let store = InMemoryStore::new();
        let CreateUserOutcome::Created(res) = store.create_user(User::new("a@example.com", None)).await.unwrap() else {
            panic!("expected insert");
        };

        let found = store.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, res.inserted_id);
        assert!(store.find_user_by_email("b@example.com").await.unwrap().is_none());

        assert_eq!(store.delete_user(res.inserted_id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_user(res.inserted_id).await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn filters_by_city_in_insertion_order() {
        let store = InMemoryStore::new();
        store.insert_house(house(json!({ "city": "Dhaka", "rent": 300 }))).await.unwrap();
        store.insert_house(house(json!({ "city": "Sylhet", "rent": 100 }))).await.unwrap();
        store.insert_house(house(json!({ "city": "Dhaka", "rent": "200" }))).await.unwrap();
        store.insert_house(house(json!({ "city": 7, "rent": 50 }))).await.unwrap();

        let q = HouseQuery {
            city: Some("Dhaka".into()),
            sort: None,
        };
        let found = store.list_houses(&q).await.unwrap();
        assert_eq!(rents(&found), vec![json!(300), json!("200")]);
    }

    #[tokio::test]
    async fn sorts_filtered_results() {
        let store = InMemoryStore::new();
        for (city, rent) in [("Dhaka", json!(300)), ("Dhaka", json!("100")), ("Sylhet", json!(50)), ("Dhaka", json!(200))] {
            store.insert_house(house(json!({ "city": city, "rent": rent }))).await.unwrap();
        }

        let q = HouseQuery {
            city: Some("Dhaka".into()),
            sort: Some(SortSpec {
                field: "rent".into(),
                order: SortOrder::Asc,
            }),
        };
        let found = store.list_houses(&q).await.unwrap();
        // Numbers before strings.
        assert_eq!(rents(&found), vec![json!(200), json!(300), json!("100")]);
    }

    #[tokio::test]
    async fn update_overwrites_fixed_fields_only() {
        let store = InMemoryStore::new();
        let submitted = house(json!({
            "name": "Dhaka flat",
            "city": "Dhaka",
            "rent": 300,
            "ownerEmail": "o@example.com"
        }));
        let id = store.insert_house(submitted).await.unwrap().inserted_id;

        let fields: HouseFields = serde_json::from_value(json!({ "name": "Renamed", "rent": "350" })).unwrap();
        assert_eq!(store.update_house(id, fields.clone()).await.unwrap(), UpdateResult::new(1, 1));
        // Same values again: matched but not modified.
        assert_eq!(store.update_house(id, fields.clone()).await.unwrap(), UpdateResult::new(1, 0));
        assert_eq!(store.update_house(HouseId::new(), fields).await.unwrap(), UpdateResult::new(0, 0));

        let doc = store.get_house(id).await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.field("name"), Some(json!("Renamed")));
        assert_eq!(doc.field("rent"), Some(json!("350")));
        assert_eq!(doc.field("city"), Some(Value::Null));
        assert_eq!(doc.field("ownerEmail"), Some(json!("o@example.com")));
    }

    #[tokio::test]
    async fn delete_house_counts() {
        let store = InMemoryStore::new();
        let id = store.insert_house(house(json!({ "rent": 1 }))).await.unwrap().inserted_id;
        store.insert_house(house(json!({ "rent": 2 }))).await.unwrap();

        assert_eq!(store.delete_house(id).await.unwrap().deleted_count, 1);
        assert_eq!(store.list_houses(&HouseQuery::default()).await.unwrap().len(), 1);
        assert_eq!(store.delete_house(id).await.unwrap().deleted_count, 0);
        assert!(store.get_house(id).await.unwrap().is_none());
    }
}
