use crate::domain::Role;
use crate::models::NewSession;
use crate::queries;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use diesel::PgConnection;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

pub const SESSION_COOKIE: &str = "session_id";
const SESSION_ID_LENGTH: usize = 32;

/// What the session store keeps for a signed-in user.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionData {
    pub user_id: i32,
    pub role: Role,
}

pub fn generate_session_id() -> String {
    let mut rng = thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(SESSION_ID_LENGTH)
        .collect()
}

/// Persists a new session expiring `ttl` from `now` and returns its id.
///
/// Expired sessions are purged on the way.
#[tracing::instrument(name = "Start a session", skip(conn, data), fields(user_id = data.user_id))]
pub fn start_session(
    conn: &mut PgConnection,
    data: &SessionData,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, anyhow::Error> {
    let purged = queries::sessions::delete_expired(conn, now)
        .context("Failed to purge expired sessions.")?;
    if purged > 0 {
        tracing::info!(purged, "Purged expired sessions");
    }

    let id = generate_session_id();
    let payload = serde_json::to_string(data).context("Failed to serialize session data.")?;
    queries::sessions::insert(
        conn,
        &NewSession {
            id: &id,
            data: &payload,
            expires_at: now + ttl,
        },
    )
    .context("Failed to store the session.")?;
    Ok(id)
}

/// The data behind `session_id`, or `None` if it is unknown or expired.
pub fn load_session(
    conn: &mut PgConnection,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<SessionData>, anyhow::Error> {
    let session = match queries::sessions::find_active(conn, session_id, now)
        .context("Failed to look up the session.")?
    {
        Some(session) => session,
        None => return Ok(None),
    };
    let data = serde_json::from_str(&session.data).context("Stored session data is corrupt.")?;
    Ok(Some(data))
}
