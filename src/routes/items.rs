use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::items::ItemList,
    error::AppResult,
    models::Item,
    response::ApiResponse,
    services::item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/{id}", get(get_item))
}

#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Whole catalog, ordered by id", body = ApiResponse<ItemList>)
    ),
    tag = "Items"
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ItemList>>> {
    Ok(Json(item_service::list_items(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Get item", body = ApiResponse<Item>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn get_item(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Item>>> {
    Ok(Json(item_service::get_item(&state, id).await?))
}
