use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    client::{error::StoreError, remote::RemoteStore, session::Session},
    config::ClientConfig,
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::AddToCartRequest,
        items::ItemList,
        orders::OrderList,
    },
    models::{Cart, Item, Order, OrderReceipt},
    response::ApiResponse,
};

/// `RemoteStore` over the TechMart HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unknown(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder, session: &Session) -> Result<RequestBuilder, StoreError> {
        Ok(request.bearer_auth(session.token()?))
    }
}

/// Unwrap the `ApiResponse` envelope, classifying failures by status.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        let body: ApiResponse<T> = response.json().await?;
        return body
            .data
            .ok_or_else(|| StoreError::Unknown(format!("response without data: {}", body.message)));
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
        Ok(body) => body.message,
        Err(_) if text.is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => text,
    };
    tracing::debug!(status = %status, reason = %message, "request failed");
    Err(StoreError::from_status(status, message))
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn login(&self, username: &str, password: &str) -> Result<String, StoreError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = read_envelope(response).await?;
        Ok(body.token)
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let response = self.http.get(self.url("/api/items")).send().await?;
        let body: ItemList = read_envelope(response).await?;
        Ok(body.items)
    }

    async fn get_cart(&self, session: &Session) -> Result<Cart, StoreError> {
        let request = self.authed(self.http.get(self.url("/api/cart")), session)?;
        read_envelope(request.send().await?).await
    }

    async fn add_to_cart(
        &self,
        session: &Session,
        item_id: i32,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.post(self.url("/api/cart")), session)?
            .json(&AddToCartRequest { item_id, quantity });
        let _line: serde_json::Value = read_envelope(request.send().await?).await?;
        Ok(())
    }

    async fn remove_from_cart(&self, session: &Session, item_id: i32) -> Result<(), StoreError> {
        let request = self.authed(
            self.http.delete(self.url(&format!("/api/cart/{item_id}"))),
            session,
        )?;
        let _ack: serde_json::Value = read_envelope(request.send().await?).await?;
        Ok(())
    }

    async fn create_order(&self, session: &Session) -> Result<OrderReceipt, StoreError> {
        let request = self.authed(self.http.post(self.url("/api/orders")), session)?;
        read_envelope(request.send().await?).await
    }

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, StoreError> {
        let request = self.authed(self.http.get(self.url("/api/orders")), session)?;
        let body: OrderList = read_envelope(request.send().await?).await?;
        Ok(body.orders)
    }
}
