//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if user already exists
        let existing = self.get_user_by_email(&user.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!("User '{}' already exists", user.email)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        // A concurrent registration can slip past the pre-check
        .map_err(|e| DbError::from_insert(e, format!("User '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email (exact match)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::UserRole;
    use crate::repository::test_support::temp_database;

    use super::*;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_user() {
        let (_dir, db) = temp_database().await;
        assert!(!db.has_users().await.unwrap());

        let user = db.insert_user(new_user("ada@example.com", UserRole::Admin)).await.unwrap();
        assert!(user.id > 0);
        assert!(db.has_users().await.unwrap());

        let fetched = db.get_user_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.name, "Test User");
        assert_eq!(fetched.role, UserRole::Admin);
        assert_eq!(fetched.password_hash, "$argon2id$placeholder");
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let (_dir, db) = temp_database().await;
        db.insert_user(new_user("ada@example.com", UserRole::User)).await.unwrap();

        assert!(db.get_user_by_email("ADA@example.com").await.unwrap().is_none());
        assert!(db.get_user_by_email("ada@example.co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_dir, db) = temp_database().await;
        db.insert_user(new_user("ada@example.com", UserRole::User)).await.unwrap();

        let result = db.insert_user(new_user("ada@example.com", UserRole::Admin)).await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_a_decode_error() {
        let (_dir, db) = temp_database().await;
        sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
             VALUES ('x', 'x@example.com', 'h', 'admin', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = db.get_user_by_email("x@example.com").await;
        assert!(matches!(result, Err(DbError::Connection(_))));
    }
}
