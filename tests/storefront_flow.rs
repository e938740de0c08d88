use std::time::Duration;

use tokio::net::TcpListener;

use techmart_storefront::{
    app::build_app,
    client::{CartReconciler, CartStatus, HttpStore, RemoteStore, Session, StoreError},
    config::ClientConfig,
    db::{create_orm_conn, run_migrations},
    seed::{self, DEMO_PASSWORD, DEMO_USERNAME},
    state::AppState,
};

async fn spawn_server() -> String {
    let orm = create_orm_conn("sqlite::memory:").await.expect("connect");
    run_migrations(&orm).await.expect("migrate");
    seed::seed(&orm).await.expect("seed");
    seed::seed(&orm).await.expect("seed is idempotent");

    let app = build_app(AppState::new(orm, "test-secret", 1));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn connect() -> (HttpStore, Session) {
    let base_url = spawn_server().await;
    let store = HttpStore::new(&ClientConfig::new(base_url, Duration::from_secs(5))).expect("client");
    let session = Session::login(&store, DEMO_USERNAME, DEMO_PASSWORD)
        .await
        .expect("demo login");
    (store, session)
}

#[tokio::test]
async fn browse_add_remove_and_checkout() {
    let (store, session) = connect().await;

    let items = store.list_items().await.expect("items");
    assert_eq!(items.len(), 8);
    let coffee = items
        .iter()
        .find(|i| i.name == "Artisan Coffee Blend")
        .expect("coffee")
        .clone();
    let laptop = items
        .iter()
        .find(|i| i.name == "Quantum Gaming Laptop")
        .expect("laptop")
        .clone();

    let rec = CartReconciler::new(store);

    let cart = rec.load_cart(&session).await.expect("no cart yet");
    assert_eq!(cart.id, 0);
    assert_eq!(rec.status().await, CartStatus::Empty);
    assert_eq!(rec.load_cart_count(&session).await, 0);

    assert_eq!(rec.add_to_cart(&session, coffee.id, 2).await, Ok(2));
    assert_eq!(rec.add_to_cart(&session, laptop.id, 1).await, Ok(3));

    let cart = rec.load_cart(&session).await.expect("cart");
    assert_ne!(cart.id, 0);
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), 2 * coffee.price + laptop.price);
    assert_eq!(rec.status().await, CartStatus::Loaded);

    let cart = rec.remove_from_cart(&session, laptop.id).await.expect("remove");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].item_id, coffee.id);
    assert_eq!(cart.items[0].item.name, coffee.name);
    assert_eq!(rec.cart_count().await, 2);

    let receipt = rec.checkout(&session).await.expect("checkout");
    assert_eq!(receipt.total, 2 * coffee.price);
    assert_eq!(rec.cart_count().await, 0);
    assert_eq!(rec.status().await, CartStatus::Empty);

    let orders = rec.store().list_orders(&session).await.expect("orders");
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.id, receipt.order_id);
    assert_eq!(order.status, "placed");
    assert_eq!(order.total, receipt.total);
    assert_eq!(order.cart.items.len(), 1);
    assert_eq!(order.cart.items[0].quantity, 2);
    assert_eq!(order.cart.items[0].price, coffee.price);

    let cart = rec.load_cart(&session).await.expect("cart after checkout");
    assert!(cart.items.is_empty());
    assert_eq!(rec.status().await, CartStatus::Empty);

    let err = rec.checkout(&session).await.expect_err("empty cart");
    assert_eq!(err, StoreError::Validation("Cart is empty".into()));
}

#[tokio::test]
async fn repeated_add_increments_line() {
    let (store, session) = connect().await;
    let item_id = store.list_items().await.expect("items")[0].id;

    store.add_to_cart(&session, item_id, 1).await.expect("add");
    store.add_to_cart(&session, item_id, 2).await.expect("add again");

    let cart = store.get_cart(&session).await.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
}

#[tokio::test]
async fn server_errors_are_classified() {
    let (store, session) = connect().await;

    let err = store.get_cart(&session).await.expect_err("no cart yet");
    assert_eq!(err, StoreError::NotFound("Cart not found".into()));

    let err = store.remove_from_cart(&session, 1).await.expect_err("nothing to remove");
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store.add_to_cart(&session, 9_999, 1).await.expect_err("unknown item");
    assert_eq!(err, StoreError::Validation("item not found".into()));

    let err = store.add_to_cart(&session, 1, 0).await.expect_err("zero quantity");
    assert!(matches!(err, StoreError::Validation(_)));

    let err = Session::login(&store, DEMO_USERNAME, "nope")
        .await
        .expect_err("bad password");
    assert!(matches!(err, StoreError::Unauthorized(_) | StoreError::Validation(_)));

    let forged = Session::Authenticated {
        username: DEMO_USERNAME.into(),
        token: "not-a-jwt".into(),
    };
    let err = store.get_cart(&forged).await.expect_err("forged token");
    assert!(matches!(err, StoreError::Unauthorized(_)));

    let err = store.list_orders(&Session::default()).await.expect_err("logged out");
    assert!(matches!(err, StoreError::Unauthorized(_)));
}
