//! Search, category filter and sort over a loaded catalog.

use std::{cmp::Ordering, str::FromStr};

use crate::models::{Category, Item};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::PriceLow => "price-low",
            SortBy::PriceHigh => "price-high",
            SortBy::Rating => "rating",
        }
    }

    fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::PriceLow => a.price.cmp(&b.price),
            SortBy::PriceHigh => b.price.cmp(&a.price),
            SortBy::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            "rating" => Ok(SortBy::Rating),
            other => Err(format!(
                "unknown sort: {other} (expected name, price-low, price-high or rating)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the name or description; empty matches everything.
    pub search: String,
    /// `None` means all categories.
    pub category: Option<Category>,
    pub sort_by: SortBy,
}

impl CatalogQuery {
    pub fn matches(&self, item: &Item) -> bool {
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || item.name.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    }

    /// Matching items in display order. The sort is stable, so ties keep catalog order.
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        let mut visible: Vec<&Item> = items.iter().filter(|item| self.matches(item)).collect();
        visible.sort_by(|a, b| self.sort_by.compare(a, b));
        visible
    }
}
