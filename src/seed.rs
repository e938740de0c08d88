//! Demo account and catalog for a fresh database. Every step is idempotent.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::{
    entity::{
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::AppResult,
    models::Category,
    services::auth_service::hash_password,
};

pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "techmart123";

struct SeedItem {
    name: &'static str,
    description: &'static str,
    price: i64,
    category: Category,
    rating: f64,
    reviews: i32,
    image: &'static str,
}

const CATALOG: &[SeedItem] = &[
    SeedItem {
        name: "Quantum Gaming Laptop",
        description: "Next-generation gaming laptop with RTX 4080, 32GB RAM, and 1TB NVMe SSD for ultimate performance",
        price: 249_999,
        category: Category::Electronics,
        rating: 4.9,
        reviews: 2156,
        image: "https://images.unsplash.com/photo-1603302576837-37561b2e2302?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Smart Fitness Tracker Pro",
        description: "Advanced health monitoring with ECG, blood oxygen, sleep tracking, and 14-day battery life",
        price: 34_999,
        category: Category::Electronics,
        rating: 4.7,
        reviews: 1247,
        image: "https://images.unsplash.com/photo-1579586337278-3befd40fd17a?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Ergonomic Gaming Chair Elite",
        description: "Premium gaming chair with 4D armrests, lumbar support, and memory foam cushion for extended sessions",
        price: 59_999,
        category: Category::Furniture,
        rating: 4.8,
        reviews: 892,
        image: "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Artisan Coffee Blend",
        description: "Premium single-origin coffee beans from Ethiopian highlands with notes of citrus and chocolate",
        price: 3_499,
        category: Category::FoodAndBeverages,
        rating: 4.9,
        reviews: 3421,
        image: "https://images.unsplash.com/photo-1447933601403-0c6688de566e?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Professional Studio Monitor",
        description: "High-fidelity studio monitor with flat frequency response for accurate audio production",
        price: 129_999,
        category: Category::Electronics,
        rating: 4.9,
        reviews: 678,
        image: "https://images.unsplash.com/photo-1545454675-3531b543be5d?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Smart Home Hub",
        description: "Centralized smart home control with voice assistant, security monitoring, and IoT device management",
        price: 19_999,
        category: Category::Electronics,
        rating: 4.6,
        reviews: 945,
        image: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Wireless Noise-Canceling Headphones",
        description: "Premium over-ear headphones with active noise cancellation and 40-hour battery life",
        price: 44_999,
        category: Category::Electronics,
        rating: 4.8,
        reviews: 1567,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Mechanical Gaming Keyboard",
        description: "RGB mechanical keyboard with Cherry MX switches, programmable macros, and wrist rest",
        price: 17_999,
        category: Category::Electronics,
        rating: 4.7,
        reviews: 1123,
        image: "https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=400&h=300&fit=crop",
    },
];

pub async fn seed(conn: &DatabaseConnection) -> AppResult<()> {
    ensure_user(conn, DEMO_USERNAME, DEMO_PASSWORD).await?;
    let inserted = seed_catalog(conn).await?;
    tracing::info!(inserted, "catalog seeded");
    Ok(())
}

/// Create the user if the username is free; returns the user's id either way.
pub async fn ensure_user(conn: &DatabaseConnection, username: &str, password: &str) -> AppResult<i32> {
    if let Some(user) = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(conn)
        .await?
    {
        return Ok(user.id);
    }

    let user = UserActive {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!(username, "demo user created");
    Ok(user.id)
}

/// Insert the catalog items that are not present yet, matched by name.
pub async fn seed_catalog(conn: &DatabaseConnection) -> AppResult<usize> {
    let mut inserted = 0;
    for item in CATALOG {
        let exists = Items::find()
            .filter(ItemCol::Name.eq(item.name))
            .one(conn)
            .await?
            .is_some();
        if exists {
            continue;
        }
        ItemActive {
            name: Set(item.name.to_string()),
            description: Set(item.description.to_string()),
            price: Set(item.price),
            category: Set(item.category.as_str().to_string()),
            rating: Set(item.rating),
            reviews: Set(item.reviews),
            in_stock: Set(true),
            image: Set(item.image.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted += 1;
    }
    Ok(inserted)
}
