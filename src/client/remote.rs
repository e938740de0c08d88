use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    client::{error::StoreError, session::Session},
    models::{Cart, Item, Order, OrderReceipt},
};

/// The TechMart API as seen by the storefront: the server is the only source of truth.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, username: &str, password: &str) -> Result<String, StoreError>;

    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    /// `StoreError::NotFound` when the user has never had a cart.
    async fn get_cart(&self, session: &Session) -> Result<Cart, StoreError>;

    async fn add_to_cart(
        &self,
        session: &Session,
        item_id: i32,
        quantity: i32,
    ) -> Result<(), StoreError>;

    async fn remove_from_cart(&self, session: &Session, item_id: i32) -> Result<(), StoreError>;

    /// Convert the server-side cart into an order and empty it.
    async fn create_order(&self, session: &Session) -> Result<OrderReceipt, StoreError>;

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, StoreError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn login(&self, username: &str, password: &str) -> Result<String, StoreError> {
        (**self).login(username, password).await
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        (**self).list_items().await
    }

    async fn get_cart(&self, session: &Session) -> Result<Cart, StoreError> {
        (**self).get_cart(session).await
    }

    async fn add_to_cart(
        &self,
        session: &Session,
        item_id: i32,
        quantity: i32,
    ) -> Result<(), StoreError> {
        (**self).add_to_cart(session, item_id, quantity).await
    }

    async fn remove_from_cart(&self, session: &Session, item_id: i32) -> Result<(), StoreError> {
        (**self).remove_from_cart(session, item_id).await
    }

    async fn create_order(&self, session: &Session) -> Result<OrderReceipt, StoreError> {
        (**self).create_order(session).await
    }

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, StoreError> {
        (**self).list_orders(session).await
    }
}
