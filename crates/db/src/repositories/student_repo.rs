//! Repository for community `students`.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::community::{CreateStudent, Student};

const COLUMNS: &str = "id, user_id, name, email, phone, college, course, state, city, interest, \
                       reason, status, created_at, updated_at";

pub struct StudentRepo;

impl StudentRepo {
    /// Join as a student. Students are approved on sign-up.
    pub async fn create(
        pool: &PgPool,
        input: &CreateStudent,
        user_id: DbId,
        status: &str,
    ) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students
                (user_id, name, email, phone, college, course, state, city, interest, reason, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.college)
            .bind(&input.course)
            .bind(&input.state)
            .bind(&input.city)
            .bind(&input.interest)
            .bind(&input.reason)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, status: Option<&str>) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM students
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
