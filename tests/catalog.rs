use techmart_storefront::{
    client::{CatalogQuery, SortBy},
    models::Category,
};

mod common;

fn names(items: Vec<&techmart_storefront::models::Item>) -> Vec<String> {
    items.into_iter().map(|i| i.name.clone()).collect()
}

#[test]
fn default_query_sorts_by_name() {
    let items = common::catalog();
    let shown = CatalogQuery::default().apply(&items);
    assert_eq!(names(shown), ["Coffee", "Gadget", "Widget"]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let items = common::catalog();
    let query = CatalogQuery {
        search: "GAD".into(),
        ..Default::default()
    };
    assert_eq!(names(query.apply(&items)), ["Gadget"]);
}

#[test]
fn category_filter_and_price_sorts() {
    let mut items = common::catalog();
    items.push(common::item(4, "Speaker", 3, Category::Electronics, 4.0));

    let query = CatalogQuery {
        category: Some(Category::Electronics),
        sort_by: SortBy::PriceLow,
        ..Default::default()
    };
    assert_eq!(names(query.apply(&items)), ["Speaker", "Widget"]);

    let query = CatalogQuery {
        sort_by: SortBy::PriceHigh,
        ..Default::default()
    };
    assert_eq!(names(query.apply(&items)), ["Widget", "Coffee", "Gadget", "Speaker"]);
}

#[test]
fn rating_sort_is_descending() {
    let items = common::catalog();
    let query = CatalogQuery {
        sort_by: SortBy::Rating,
        ..Default::default()
    };
    assert_eq!(names(query.apply(&items)), ["Gadget", "Widget", "Coffee"]);
}

#[test]
fn sort_and_category_parse_from_cli_words() {
    assert_eq!("price-low".parse::<SortBy>(), Ok(SortBy::PriceLow));
    assert_eq!("rating".parse::<SortBy>(), Ok(SortBy::Rating));
    assert!("cheapest".parse::<SortBy>().is_err());

    assert_eq!("food-beverages".parse::<Category>(), Ok(Category::FoodAndBeverages));
    assert_eq!("Food & Beverages".parse::<Category>(), Ok(Category::FoodAndBeverages));
    assert_eq!("electronics".parse::<Category>(), Ok(Category::Electronics));
}
