use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;

use super::{BookingStore, UserStore};
use crate::domain::{Booking, NewBooking, NewUser, User};
use crate::error::DatabaseError;

/// PostgreSQL-backed store; schema lives in `migrations/`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, (i64, String, String, DateTime<Utc>, DateTime<Utc>)>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash, created_at, updated_at)| User {
            id,
            username,
            password_hash,
            created_at,
            updated_at,
        }))
    }

    async fn save(&self, user: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete(&self, user_id: i64) -> Result<(), DatabaseError> {
        // bookings cascade
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn create(&self, user_id: i64, booking: NewBooking) -> Result<Booking, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (user_id, start_time, end_time, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(Booking {
            id,
            user_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            comment: booking.comment,
        })
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, DatabaseError> {
        let rows = sqlx::query_as::<_, (i64, i64, NaiveDateTime, NaiveDateTime, String)>(
            r#"
            SELECT id, user_id, start_time, end_time, comment
            FROM bookings
            WHERE user_id = $1
            ORDER BY start_time, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, start_time, end_time, comment)| Booking {
                id,
                user_id,
                start_time,
                end_time,
                comment,
            })
            .collect())
    }

    async fn remove(&self, user_id: i64, booking_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
