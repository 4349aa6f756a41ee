//! Products and subscriptions mirrored from the billing provider

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::models::{Product, Subscription, SubscriptionStatus};
use crate::config::ProductConfig;
use crate::{Error, Result};

/// Insert or refresh configured products
pub async fn seed_products(pool: &SqlitePool, products: &[ProductConfig]) -> Result<()> {
    for product in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_amount, is_recurring, is_archived)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                price_amount = excluded.price_amount,
                is_recurring = excluded.is_recurring,
                is_archived = excluded.is_archived
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_amount)
        .bind(product.is_recurring)
        .bind(product.is_archived)
        .execute(pool)
        .await?;
    }

    if !products.is_empty() {
        info!("Seeded {} product(s)", products.len());
    }
    Ok(())
}

/// Recurring, non-archived products, cheapest first
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_archived = 0 AND is_recurring = 1 ORDER BY price_amount ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Record the billing provider's view of a user's subscription
pub async fn upsert_subscription(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
    status: SubscriptionStatus,
) -> Result<Subscription> {
    let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if !user_exists {
        return Err(Error::NotFound("User not found".to_string()));
    }

    let product_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    if !product_exists {
        return Err(Error::NotFound(format!("Product not found: {}", product_id)));
    }

    let now = Utc::now();
    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (id, user_id, product_id, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, product_id) DO UPDATE SET
            status = excluded.status,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(product_id)
    .bind(status)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!(user_id, product_id, status = ?status, "Subscription updated");
    Ok(subscription)
}

pub async fn has_active_subscription(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let active: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = ? AND status = 'active')",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(active)
}

/// Product behind the user's most recently updated active subscription
pub async fn current_subscription_product(pool: &SqlitePool, user_id: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT p.*
        FROM subscriptions s
        JOIN products p ON p.id = s.product_id
        WHERE s.user_id = ? AND s.status = 'active'
        ORDER BY s.updated_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}
