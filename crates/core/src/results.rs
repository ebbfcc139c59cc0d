//! Write-operation results, shaped like document-store driver results.

use serde::Serialize;

/// Result of inserting one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult<Id> {
    pub acknowledged: bool,
    pub inserted_id: Id,
}

impl<Id> InsertResult<Id> {
    pub fn new(inserted_id: Id) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of deleting by identifier (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Result of updating by identifier.
///
/// `modified_count` is 0 when the document matched but already held the
/// submitted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<()>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
        }
    }
}

/// Outcome of the idempotent user signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserOutcome<Id> {
    Created(InsertResult<Id>),
    /// A user with the same email was already stored; nothing was written.
    AlreadyExists,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_in_driver_shape() {
        assert_eq!(
            serde_json::to_value(DeleteResult::new(1)).unwrap(),
            json!({ "acknowledged": true, "deletedCount": 1 })
        );
        assert_eq!(
            serde_json::to_value(UpdateResult::new(1, 0)).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedId": null
            })
        );
        assert_eq!(
            serde_json::to_value(InsertResult::new("abc")).unwrap(),
            json!({ "acknowledged": true, "insertedId": "abc" })
        );
    }
}
