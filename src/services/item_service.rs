use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    dto::items::ItemList,
    entity::items::{Column as ItemCol, Entity as Items, Model as ItemModel},
    error::{AppError, AppResult},
    models::{Category, Item},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_items(state: &AppState) -> AppResult<ApiResponse<ItemList>> {
    let items = Items::find()
        .order_by_asc(ItemCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Items", ItemList { items }, Some(meta)))
}

pub async fn get_item(state: &AppState, id: i32) -> AppResult<ApiResponse<Item>> {
    let item = match Items::find_by_id(id).one(&state.orm).await? {
        Some(item) => item_from_entity(item)?,
        None => return Err(AppError::NotFound("Item")),
    };
    Ok(ApiResponse::success("Item", item, None))
}

pub(crate) fn item_from_entity(model: ItemModel) -> AppResult<Item> {
    let category = model
        .category
        .parse::<Category>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Item {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category,
        rating: model.rating,
        reviews: model.reviews,
        in_stock: model.in_stock,
        image: model.image,
    })
}
