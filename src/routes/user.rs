use crate::cache::keys;
use crate::guards::AuthenticatedUser;
use crate::queries::users::{load_user_info, UserInfo};
use crate::routes::{cached, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use rocket::serde::json::Json;
use rocket::State;

#[get("/api/user/info")]
pub async fn user_info(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<UserInfo>, ApiError> {
    let user_id = user.user_id;
    let info: Option<UserInfo> = cached(cache, &conn, &keys::user_info(user_id), move |c| {
        load_user_info(c, user_id)
    })
    .await?;
    info.map(Json).ok_or(ApiError::NotFound("User"))
}
