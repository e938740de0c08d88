use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::orders::OrderList,
    entity::{
        cart_items::{Column as LineCol, Entity as CartItems},
        items::Entity as Items,
        order_lines::{
            ActiveModel as OrderLineActive, Column as OrderLineCol, Entity as OrderLines,
            Model as OrderLineModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartLine, Item, Order, OrderReceipt},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        cart_service::{find_cart, load_lines},
        item_service::item_from_entity,
    },
    state::AppState,
};

pub const STATUS_PLACED: &str = "placed";

/// Turn the user's cart into an order and empty the cart, in one transaction.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderReceipt>> {
    let txn = state.orm.begin().await?;

    let cart = match find_cart(&txn, user.user_id).await? {
        Some(cart) => cart,
        None => return Err(AppError::BadRequest("Cart is empty".into())),
    };
    let lines = load_lines(&txn, cart.id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    if let Some(line) = lines.iter().find(|line| !line.item.in_stock) {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            line.item.name
        )));
    }

    let total: i64 = lines.iter().map(CartLine::line_total).sum();
    let now = Utc::now();

    let order = OrderActive {
        user_id: Set(user.user_id),
        cart_id: Set(cart.id),
        total: Set(total),
        status: Set(STATUS_PLACED.into()),
        created_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for line in &lines {
        OrderLineActive {
            order_id: Set(order.id),
            item_id: Set(line.item_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
            created_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    // empty the cart; the cart row itself survives
    CartItems::delete_many()
        .filter(LineCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(order_id = order.id, user_id = user.user_id, total, "order placed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_placed",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        OrderReceipt {
            order_id: order.id,
            total,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder
            .order_by_asc(OrderCol::CreatedAt)
            .order_by_asc(OrderCol::Id),
        SortOrder::Desc => finder
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id),
    };

    let orders = finder.all(&state.orm).await?;
    let orders = with_snapshots(&state.orm, orders).await?;

    let meta = Meta::count(orders.len());
    Ok(ApiResponse::success("Ok", OrderList { orders }, Some(meta)))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order")),
    };

    let mut orders = with_snapshots(&state.orm, vec![order]).await?;
    let order = orders
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order snapshot missing")))?;

    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// Attach the purchased lines to each order as a cart snapshot.
async fn with_snapshots<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let rows = OrderLines::find()
        .filter(OrderLineCol::OrderId.is_in(ids))
        .order_by_asc(OrderLineCol::Id)
        .find_also_related(Items)
        .all(conn)
        .await?;

    let mut lines_by_order: HashMap<i32, Vec<(OrderLineModel, Item)>> = HashMap::new();
    for (line, item) in rows {
        let item = item.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "order line {} references missing item {}",
                line.id,
                line.item_id
            ))
        })?;
        let item = item_from_entity(item)?;
        lines_by_order.entry(line.order_id).or_default().push((line, item));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = lines_by_order
                .remove(&order.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(line, item)| CartLine {
                    id: line.id,
                    cart_id: order.cart_id,
                    item_id: line.item_id,
                    item,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect();
            order_from_entity(order, items)
        })
        .collect())
}

fn order_from_entity(model: OrderModel, items: Vec<CartLine>) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        cart_id: model.cart_id,
        total: model.total,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        cart: Cart {
            id: model.cart_id,
            user_id: model.user_id,
            items,
        },
    }
}
