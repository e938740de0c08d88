use axum::extract::State;
use techmart_storefront::{
    db::{create_orm_conn, run_migrations},
    routes::health::health_check,
    state::AppState,
};

#[tokio::test]
async fn health_check_returns_ok() {
    let orm = create_orm_conn("sqlite::memory:").await.expect("connect");
    run_migrations(&orm).await.expect("migrate");
    let state = AppState::new(orm, "test-secret", 1);

    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
}
