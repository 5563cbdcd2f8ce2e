use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;

use super::Driver;
use crate::auth::session::generate_session_token;

/// A logged-in browser session
#[derive(Queryable, Selectable, Insertable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Driver))]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(primary_key(token))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    /// Random token carried in the session cookie
    token: String,
    driver_id: i32,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
    /// Number of index page views during this session
    visits: i32,
}

impl Session {
    /// Creates a session for `driver_id` that lives for `ttl`
    pub fn new(driver_id: i32, ttl: Duration) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            token: generate_session_token(),
            driver_id,
            created_at: now,
            expires_at: now + ttl,
            visits: 0,
        }
    }

    pub fn get_token(&self) -> String {
        self.token.clone()
    }

    pub fn get_driver_id(&self) -> i32 {
        self.driver_id
    }

    pub fn get_visits(&self) -> i32 {
        self.visits
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_live() {
        let session = Session::new(3, Duration::hours(1));

        assert_eq!(session.get_driver_id(), 3);
        assert_eq!(session.get_visits(), 0);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let session = Session::new(3, Duration::zero());

        assert!(session.is_expired());
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = Session::new(1, Duration::hours(1));
        let b = Session::new(1, Duration::hours(1));

        assert_ne!(a.get_token(), b.get_token());
    }
}
