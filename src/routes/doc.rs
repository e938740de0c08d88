use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
        cart::AddToCartRequest,
        items::ItemList,
        orders::OrderList,
    },
    models::{Cart, CartLine, Category, Item, Order, OrderReceipt},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, items, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        items::list_items,
        items::get_item,
        cart::get_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
    ),
    components(
        schemas(
            Category,
            Item,
            CartLine,
            Cart,
            Order,
            OrderReceipt,
            ItemList,
            OrderList,
            AddToCartRequest,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisteredUser,
            params::SortOrder,
            Meta,
            ApiResponse<Cart>,
            ApiResponse<ItemList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderReceipt>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Items", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
