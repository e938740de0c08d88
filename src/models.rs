//! Wire types shared by the API server and the storefront client.
//!
//! Money is carried in minor units (cents) so that line and order totals are exact.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Electronics,
    Furniture,
    #[serde(rename = "Food & Beverages")]
    FoodAndBeverages,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    #[serde(rename = "Sports & Fitness")]
    SportsAndFitness,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Electronics,
        Category::Furniture,
        Category::FoodAndBeverages,
        Category::HomeAndGarden,
        Category::SportsAndFitness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Furniture => "Furniture",
            Category::FoodAndBeverages => "Food & Beverages",
            Category::HomeAndGarden => "Home & Garden",
            Category::SportsAndFitness => "Sports & Fitness",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Furniture => "furniture",
            Category::FoodAndBeverages => "food-beverages",
            Category::HomeAndGarden => "home-garden",
            Category::SportsAndFitness => "sports-fitness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the display name or the slug, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown category: {needle}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: Category,
    pub rating: f64,
    pub reviews: i32,
    pub in_stock: bool,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: i32,
    pub cart_id: i32,
    pub item_id: i32,
    /// Snapshot of the item for display.
    pub item: Item,
    pub quantity: i32,
    /// Unit price captured when the line was created.
    pub price: i64,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartLine>,
}

impl Cart {
    /// The cart a user has before the server ever created one.
    pub fn empty(user_id: i32) -> Self {
        Self {
            id: 0,
            user_id,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> i64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::try_from(line.quantity).unwrap_or(0))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub cart_id: i32,
    /// Fixed when the order is placed.
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// The lines purchased, as they were at checkout.
    pub cart: Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderReceipt {
    pub order_id: i32,
    pub total: i64,
}

pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}
