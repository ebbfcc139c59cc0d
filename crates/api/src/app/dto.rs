use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use househunter_core::{CreateUserOutcome, DomainError, HouseQuery, UserId};

// -------------------------
// Request DTOs
// -------------------------

/// Raw `GET /houses` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseListParams {
    pub city: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

impl TryFrom<HouseListParams> for HouseQuery {
    type Error = DomainError;

    fn try_from(p: HouseListParams) -> Result<Self, Self::Error> {
        HouseQuery::from_params(
            p.city.as_deref(),
            p.sort_field.as_deref(),
            p.sort_order.as_deref(),
        )
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub const USER_EXISTS_MESSAGE: &str = "User already exists";

pub fn create_user_outcome_to_json(outcome: CreateUserOutcome<UserId>) -> Value {
    match outcome {
        CreateUserOutcome::Created(res) => json!(res),
        CreateUserOutcome::AlreadyExists => json!({
            "message": USER_EXISTS_MESSAGE,
            "insertedId": null,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use househunter_core::InsertResult;

    #[test]
    fn existing_user_is_signaled_in_band() {
        assert_eq!(
            create_user_outcome_to_json(CreateUserOutcome::AlreadyExists),
            json!({ "message": "User already exists", "insertedId": null })
        );

        let id = UserId::new();
        let created = create_user_outcome_to_json(CreateUserOutcome::Created(InsertResult::new(id)));
        assert_eq!(created["insertedId"], id.to_string());
    }
}
