use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::cart::AddToCartRequest,
    entity::{
        cart_items::{ActiveModel as LineActive, Column as LineCol, Entity as CartItems},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        items::Entity as Items,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartLine},
    response::{ApiResponse, Meta},
    services::item_service::item_from_entity,
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Cart>> {
    let cart = match find_cart(&state.orm, user.user_id).await? {
        Some(cart) => cart,
        None => return Err(AppError::NotFound("Cart")),
    };

    let items = load_lines(&state.orm, cart.id).await?;
    let cart = Cart {
        id: cart.id,
        user_id: cart.user_id,
        items,
    };
    let meta = Meta::count(cart.items.len());
    Ok(ApiResponse::success("OK", cart, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLine>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = match Items::find_by_id(payload.item_id).one(&state.orm).await? {
        Some(item) => item,
        None => return Err(AppError::BadRequest("item not found".to_string())),
    };
    if !item.in_stock {
        return Err(AppError::BadRequest(format!("{} is out of stock", item.name)));
    }

    let txn = state.orm.begin().await?;

    let cart = match find_cart(&txn, user.user_id).await? {
        Some(cart) => cart,
        None => {
            CartActive {
                user_id: Set(user.user_id),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    let exist = CartItems::find()
        .filter(
            Condition::all()
                .add(LineCol::CartId.eq(cart.id))
                .add(LineCol::ItemId.eq(item.id)),
        )
        .one(&txn)
        .await?;

    let line = if let Some(line) = exist {
        let quantity = line
            .quantity
            .checked_add(payload.quantity)
            .ok_or_else(|| AppError::BadRequest("quantity is too large".to_string()))?;
        let mut active: LineActive = line.into();
        active.quantity = Set(quantity);
        active.update(&txn).await?
    } else {
        LineActive {
            cart_id: Set(cart.id),
            item_id: Set(item.id),
            quantity: Set(payload.quantity),
            price: Set(item.price),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?
    };

    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({ "item_id": item.id, "quantity": payload.quantity }),
    )
    .await;

    let line = CartLine {
        id: line.id,
        cart_id: line.cart_id,
        item_id: line.item_id,
        item: item_from_entity(item)?,
        quantity: line.quantity,
        price: line.price,
    };
    Ok(ApiResponse::success("Item added to cart", line, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    item_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = match find_cart(&state.orm, user.user_id).await? {
        Some(cart) => cart,
        None => return Err(AppError::NotFound("Cart item")),
    };

    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(LineCol::CartId.eq(cart.id))
                .add(LineCol::ItemId.eq(item_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Cart item"));
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "item_id": item_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> AppResult<Option<CartModel>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(conn)
        .await?;
    Ok(cart)
}

/// Cart lines in insertion order, each with its item snapshot.
pub(crate) async fn load_lines<C: ConnectionTrait>(conn: &C, cart_id: i32) -> AppResult<Vec<CartLine>> {
    CartItems::find()
        .filter(LineCol::CartId.eq(cart_id))
        .order_by_asc(LineCol::Id)
        .find_also_related(Items)
        .all(conn)
        .await?
        .into_iter()
        .map(|(line, item)| {
            let item = item.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "cart line {} references missing item {}",
                    line.id,
                    line.item_id
                ))
            })?;
            Ok(CartLine {
                id: line.id,
                cart_id: line.cart_id,
                item_id: line.item_id,
                item: item_from_entity(item)?,
                quantity: line.quantity,
                price: line.price,
            })
        })
        .collect()
}
