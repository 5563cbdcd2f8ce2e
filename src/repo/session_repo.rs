use crate::db::DbPool;
use crate::models::{Driver, Session};
use crate::schema::{drivers, sessions};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Starts a session for a driver that expires after `ttl`
#[instrument(skip(pool))]
pub fn create_session(pool: &DbPool, driver_id: i32, ttl: Duration) -> Result<Session> {
    let conn = &mut pool.get()?;

    let session = Session::new(driver_id, ttl);
    diesel::insert_into(sessions::table)
        .values(&session)
        .execute(conn)?;

    info!("Started session for driver {}", driver_id);

    Ok(session)
}

/// Looks up a live session and its driver by token.
///
/// Expired sessions are deleted and reported as absent, as are sessions of
/// deactivated drivers.
#[instrument(skip_all)]
pub fn find_session(pool: &DbPool, token: &str) -> Result<Option<(Session, Driver)>> {
    let conn = &mut pool.get()?;

    let row = sessions::table
        .inner_join(drivers::table)
        .filter(sessions::token.eq(token))
        .select((Session::as_select(), Driver::as_select()))
        .first::<(Session, Driver)>(conn)
        .optional()?;

    match row {
        Some((session, _)) if session.is_expired() => {
            debug!("Session expired");
            diesel::delete(sessions::table.find(token)).execute(conn)?;
            Ok(None)
        }
        Some((_, driver)) if !driver.is_active() => {
            debug!("Session belongs to an inactive driver");
            Ok(None)
        }
        other => Ok(other),
    }
}

/// Ends a session. Returns false if it did not exist.
#[instrument(skip_all)]
pub fn delete_session(pool: &DbPool, token: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.find(token)).execute(conn)?;

    Ok(deleted > 0)
}

/// Increments the session's visit counter and returns the new value.
///
/// A session that has already ended counts as 0 visits.
#[instrument(skip_all)]
pub fn record_visit(pool: &DbPool, token: &str) -> Result<i32> {
    let conn = &mut pool.get()?;

    let visits = diesel::update(sessions::table.find(token))
        .set(sessions::visits.eq(sessions::visits + 1))
        .returning(sessions::visits)
        .get_result(conn)
        .optional()?;

    Ok(visits.unwrap_or(0))
}

/// Deletes every expired session, returning how many were removed
#[instrument(skip(pool))]
pub fn purge_expired_sessions(pool: &DbPool) -> Result<usize> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.filter(sessions::expires_at.le(Utc::now().naive_utc())))
        .execute(conn)?;

    if deleted > 0 {
        info!("Purged {} expired sessions", deleted);
    }

    Ok(deleted)
}
