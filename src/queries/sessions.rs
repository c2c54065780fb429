use crate::models::{NewSession, Session};
use crate::schema::sessions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;

#[tracing::instrument(name = "Store a session", skip(conn, session))]
pub fn insert(conn: &mut PgConnection, session: &NewSession) -> QueryResult<usize> {
    diesel::insert_into(sessions::table)
        .values(session)
        .execute(conn)
}

/// The session `session_id` if it has not expired at `now`.
#[tracing::instrument(name = "Load a session", skip(conn, session_id))]
pub fn find_active(
    conn: &mut PgConnection,
    session_id: &str,
    now: DateTime<Utc>,
) -> QueryResult<Option<Session>> {
    sessions::table
        .filter(sessions::id.eq(session_id))
        .filter(sessions::expires_at.gt(now))
        .select(Session::as_select())
        .first(conn)
        .optional()
}

#[tracing::instrument(name = "Delete a session", skip(conn, session_id))]
pub fn delete(conn: &mut PgConnection, session_id: &str) -> QueryResult<usize> {
    diesel::delete(sessions::table.find(session_id)).execute(conn)
}

#[tracing::instrument(name = "Purge expired sessions", skip(conn))]
pub fn delete_expired(conn: &mut PgConnection, now: DateTime<Utc>) -> QueryResult<usize> {
    diesel::delete(sessions::table.filter(sessions::expires_at.le(now))).execute(conn)
}
