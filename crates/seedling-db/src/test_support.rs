//! Shared test fixtures: an isolated in-memory database plus entity builders
//! with sensible defaults. Test-only module.

use chrono::Utc;
use uuid::Uuid;

use crate::pool::{Database, DbConfig};
use seedling_core::{Product, Role, User};

/// Fresh in-memory database with migrations applied. Each call is fully
/// isolated from every other test.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database should initialize")
}

/// Builds an active product with a fresh id.
pub fn test_product(name: &str, price_cents: i64, stock_quantity: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: None,
        price_cents,
        stock_quantity,
        is_active: true,
        category: "fruit_seedling".to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a user with a fresh id and a placeholder hash. Tests that exercise
/// real credential verification hash their own passwords.
pub fn test_user(name: &str, email: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        password_hash: "test-hash".to_string(),
        created_at: now,
        updated_at: now,
    }
}
