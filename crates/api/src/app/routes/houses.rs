use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    middleware::from_fn_with_state,
    routing::{get, post},
};

use househunter_core::{
    DeleteResult, House, HouseDocument, HouseFields, HouseId, HouseQuery, InsertResult, UpdateResult,
};

use crate::app::{dto::HouseListParams, errors::ApiError, services::AppServices};
use crate::middleware::{AuthState, auth_middleware};

/// Routes under `/houses`.
///
/// Only the single-listing read is guarded, and only by authentication:
/// listings carry no owner, so there is nothing to check ownership against.
pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/:id", get(get_house))
        .route_layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/", post(create_house).get(list_houses))
        .route("/:id", axum::routing::delete(delete_house).patch(update_house))
        .merge(protected)
}

/// `POST /houses`
pub async fn create_house(
    Extension(services): Extension<AppServices>,
    Json(house): Json<House>,
) -> Result<Json<InsertResult<HouseId>>, ApiError> {
    Ok(Json(services.houses.insert_house(house).await?))
}

/// `GET /houses?city=&sortField=&sortOrder=`
pub async fn list_houses(
    Extension(services): Extension<AppServices>,
    Query(params): Query<HouseListParams>,
) -> Result<Json<Vec<HouseDocument>>, ApiError> {
    let query = HouseQuery::try_from(params)?;
    Ok(Json(services.houses.list_houses(&query).await?))
}

/// `GET /houses/:id`: the document, or `null` when absent.
pub async fn get_house(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> Result<Json<Option<HouseDocument>>, ApiError> {
    let id: HouseId = id.parse()?;
    Ok(Json(services.houses.get_house(id).await?))
}

/// `DELETE /houses/:id`
pub async fn delete_house(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id: HouseId = id.parse()?;
    Ok(Json(services.houses.delete_house(id).await?))
}

/// `PATCH /houses/:id`: overwrite the fixed field set.
pub async fn update_house(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
    Json(fields): Json<HouseFields>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id: HouseId = id.parse()?;
    let result = services.houses.update_house(id, fields).await?;
    tracing::info!(
        matched = result.matched_count,
        modified = result.modified_count,
        "house updated"
    );
    Ok(Json(result))
}
