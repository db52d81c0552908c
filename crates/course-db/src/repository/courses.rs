//! Course catalog operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Course, NewCourse};
use crate::repository::Database;

impl Database {
    // ==================== Course Operations ====================

    /// Insert a new course
    pub async fn insert_course(&self, course: NewCourse) -> Result<Course, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO courses (title, description, available_slots, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.available_slots)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Course {
            id,
            title: course.title,
            description: course.description,
            available_slots: course.available_slots,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a course by ID
    pub async fn get_course(&self, id: i64) -> Result<Option<Course>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, title, description, available_slots, created_at, updated_at
            FROM courses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Course::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all courses
    pub async fn list_courses(&self) -> Result<Vec<Course>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, available_slots, created_at, updated_at
            FROM courses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Course::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Replace every editable field of a course
    ///
    /// Returns `None` if no course has the given ID.
    pub async fn update_course(&self, id: i64, course: NewCourse) -> Result<Option<Course>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, available_slots = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.available_slots)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_course(id).await
    }

    /// Delete a course
    pub async fn delete_course(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::temp_database;

    use super::*;

    fn course(title: &str, slots: i64) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: format!("{} description", title),
            available_slots: slots,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_list() {
        let (_dir, db) = temp_database().await;
        assert!(db.list_courses().await.unwrap().is_empty());

        let rust = db.insert_course(course("Rust", 10)).await.unwrap();
        let sql = db.insert_course(course("SQL", 5)).await.unwrap();

        let fetched = db.get_course(rust.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Rust");
        assert_eq!(fetched.available_slots, 10);

        let all = db.list_courses().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![rust.id, sql.id]);
    }

    #[tokio::test]
    async fn test_update_course() {
        let (_dir, db) = temp_database().await;
        let created = db.insert_course(course("Rust", 10)).await.unwrap();

        let updated = db
            .update_course(created.id, course("Advanced Rust", 3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Advanced Rust");
        assert_eq!(updated.description, "Advanced Rust description");
        assert_eq!(updated.available_slots, 3);
    }

    #[tokio::test]
    async fn test_update_missing_course() {
        let (_dir, db) = temp_database().await;
        let result = db.update_course(42, course("Ghost", 1)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_course() {
        let (_dir, db) = temp_database().await;
        let created = db.insert_course(course("Rust", 10)).await.unwrap();

        assert!(db.delete_course(created.id).await.unwrap());
        assert!(db.get_course(created.id).await.unwrap().is_none());
        assert!(!db.delete_course(created.id).await.unwrap());
    }
}
