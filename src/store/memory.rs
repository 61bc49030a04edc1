use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{BookingStore, UserStore};
use crate::domain::{Booking, NewBooking, NewUser, User};
use crate::error::DatabaseError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    bookings: Vec<Booking>,
    next_user_id: i64,
    next_booking_id: i64,
}

/// Process-local store backed by a mutex-guarded pair of tables
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        self.tables
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "Username already registered".to_string(),
            ));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn delete(&self, user_id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables()?;
        tables.users.retain(|u| u.id != user_id);
        tables.bookings.retain(|b| b.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn create(&self, user_id: i64, booking: NewBooking) -> Result<Booking, DatabaseError> {
        let mut tables = self.tables()?;
        tables.next_booking_id += 1;
        let booking = Booking {
            id: tables.next_booking_id,
            user_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            comment: booking.comment,
        };
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Booking>, DatabaseError> {
        let tables = self.tables()?;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        // Same order as the Postgres store
        bookings.sort_by_key(|b| (b.start_time, b.id));
        Ok(bookings)
    }

    async fn remove(&self, user_id: i64, booking_id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        let before = tables.bookings.len();
        tables
            .bookings
            .retain(|b| !(b.id == booking_id && b.user_id == user_id));
        Ok(tables.bookings.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    fn new_booking(hour: u32) -> NewBooking {
        let day = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        NewBooking {
            start_time: day.and_hms_opt(hour, 0, 0).unwrap(),
            end_time: day.and_hms_opt(hour + 1, 0, 0).unwrap(),
            comment: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find_user() {
        let store = InMemoryStore::new();
        let saved = store.save(new_user("alice")).await.unwrap();

        assert_eq!(saved.id, 1);
        assert_eq!(saved.created_at, saved.updated_at);
        let found = store.find_by_username("alice").await.unwrap();
        assert_eq!(found, Some(saved));
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = InMemoryStore::new();
        store.save(new_user("alice")).await.unwrap();

        let result = store.save(new_user("alice")).await;
        assert!(matches!(
            result,
            Err(DatabaseError::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_bookings_are_scoped_to_owner() {
        let store = InMemoryStore::new();
        let alice = store.save(new_user("alice")).await.unwrap();
        let bob = store.save(new_user("bob")).await.unwrap();

        let booking = store.create(alice.id, new_booking(9)).await.unwrap();
        store.create(bob.id, new_booking(10)).await.unwrap();

        assert_eq!(store.list_for_user(alice.id).await.unwrap(), vec![booking.clone()]);
        assert!(!store.remove(bob.id, booking.id).await.unwrap());
        assert!(store.remove(alice.id, booking.id).await.unwrap());
        assert!(store.list_for_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_drops_bookings() {
        let store = InMemoryStore::new();
        let alice = store.save(new_user("alice")).await.unwrap();
        store.create(alice.id, new_booking(9)).await.unwrap();

        store.delete(alice.id).await.unwrap();

        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert!(store.list_for_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bookings_are_listed_by_start_time() {
        let store = InMemoryStore::new();
        let alice = store.save(new_user("alice")).await.unwrap();

        let late = store.create(alice.id, new_booking(15)).await.unwrap();
        let early = store.create(alice.id, new_booking(9)).await.unwrap();
        let early_again = store.create(alice.id, new_booking(9)).await.unwrap();

        let ids: Vec<i64> = store
            .list_for_user(alice.id)
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![early.id, early_again.id, late.id]);
    }
}
