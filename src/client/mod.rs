//! Storefront client: talks to the TechMart API and keeps a display projection of the cart.

pub mod catalog;
pub mod error;
pub mod http;
pub mod reconciler;
pub mod remote;
pub mod session;

pub use catalog::{CatalogQuery, SortBy};
pub use error::StoreError;
pub use http::HttpStore;
pub use reconciler::{CartReconciler, CartStatus, OptimisticPolicy};
pub use remote::RemoteStore;
pub use session::Session;
