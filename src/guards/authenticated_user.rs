use crate::access::RolePredicate;
use crate::access::Access;
use crate::domain::Role;
use crate::guards::{load_session, SESSION_COOKIE};
use crate::queries;
use crate::routes::ApiError;
use crate::startup::FundraiserDbConn;
use anyhow::{anyhow, Context};
use chrono::Utc;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

/// A user with a live session. Only constructible by the request guard.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub session_id: String,
    // prevents construction outside of this module
    _private: (),
}

impl AuthenticatedUser {
    /// Fails with 403 unless the user has `role`.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        match RolePredicate::Only(role).check(Some(self.role)) {
            Access::Allow => Ok(()),
            Access::Deny => Err(ApiError::Forbidden),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let session_id = match request.cookies().get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                return Outcome::Error((
                    Status::Unauthorized,
                    anyhow!("User has not been authenticated."),
                ))
            }
        };
        let conn = try_outcome!(request.guard::<FundraiserDbConn>().await.map_error(|_| (
            Status::InternalServerError,
            anyhow!("Failed to retrieve a connection from the DB pool.")
        )));

        match from_request_result(session_id, conn).await {
            Ok(Some(user)) => Outcome::Success(user),
            Ok(None) => Outcome::Error((
                Status::Unauthorized,
                anyhow!("The session is unknown or has expired."),
            )),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to authenticate a request");
                Outcome::Error((Status::InternalServerError, e))
            }
        }
    }
}

async fn from_request_result(
    session_id: String,
    conn: FundraiserDbConn,
) -> Result<Option<AuthenticatedUser>, anyhow::Error> {
    conn.run(move |conn| {
        let data = match load_session(conn, &session_id, Utc::now())? {
            Some(data) => data,
            None => return Ok(None),
        };
        let user = match queries::users::find_by_id(conn, data.user_id)
            .context("Failed to load the session's user.")?
        {
            Some(user) => user,
            None => return Ok(None),
        };
        let role = user.role().map_err(|e| anyhow!(e))?;

        Ok(Some(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            role,
            session_id,
            _private: (),
        }))
    })
    .await
}
