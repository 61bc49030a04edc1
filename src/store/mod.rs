/// Persistence collaborators
///
/// Handlers and the refresh flow only see these traits. Two backends exist:
/// an in-memory one (default, and used by the test suite) and PostgreSQL.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{Booking, NewBooking, NewUser, User};
use crate::error::DatabaseError;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `UniqueConstraintViolation` if the username is taken
    async fn save(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Removes the user; their bookings go with them
    async fn delete(&self, user_id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, user_id: i64, booking: NewBooking) -> Result<Booking, DatabaseError>;

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, DatabaseError>;

    /// `false` if no booking with that id belongs to the user
    async fn remove(&self, user_id: i64, booking_id: i64) -> Result<bool, DatabaseError>;
}
