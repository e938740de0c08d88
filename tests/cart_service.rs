use techmart_storefront::{
    db::{create_orm_conn, run_migrations},
    dto::cart::AddToCartRequest,
    middleware::auth::AuthUser,
    response::Meta,
    routes::params::OrderListQuery,
    seed::{self, DEMO_USERNAME},
    services::{cart_service, item_service, order_service},
    state::AppState,
};

async fn setup() -> (AppState, AuthUser) {
    let orm = create_orm_conn("sqlite::memory:").await.expect("connect");
    run_migrations(&orm).await.expect("migrate");
    seed::seed(&orm).await.expect("seed");
    let user_id = seed::ensure_user(&orm, DEMO_USERNAME, seed::DEMO_PASSWORD)
        .await
        .expect("demo user");
    let user = AuthUser {
        user_id,
        username: DEMO_USERNAME.into(),
    };
    (AppState::new(orm, "test-secret", 1), user)
}

fn total(meta: Option<Meta>) -> Option<i64> {
    meta.and_then(|m| m.total)
}

#[tokio::test]
async fn list_meta_counts_rows() {
    let (state, user) = setup().await;

    let items = item_service::list_items(&state).await.expect("items");
    assert_eq!(total(items.meta), Some(8));
    let ids: Vec<i32> = items.data.expect("item list").items.iter().map(|i| i.id).collect();

    for (item_id, quantity) in [(ids[0], 2), (ids[1], 1), (ids[0], 1)] {
        cart_service::add_to_cart(&state, &user, AddToCartRequest { item_id, quantity })
            .await
            .expect("add");
    }

    let cart = cart_service::get_cart(&state, &user).await.expect("cart");
    assert_eq!(total(cart.meta), Some(2));
    assert_eq!(cart.data.expect("cart data").item_count(), 4);

    order_service::create_order(&state, &user).await.expect("order");
    let orders = order_service::list_orders(&state, &user, OrderListQuery::default())
        .await
        .expect("orders");
    assert_eq!(total(orders.meta), Some(1));
}

#[test]
fn meta_count_saturates() {
    assert_eq!(Meta::count(3).total, Some(3));
    assert_eq!(Meta::count(usize::MAX).total, Some(i64::MAX));
}
