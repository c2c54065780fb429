use crate::cache::keys;
use crate::domain::{NotificationContent, Role};
use crate::guards::AuthenticatedUser;
use crate::models::{NewNotification, Notification};
use crate::queries;
use crate::routes::{cached, execute, own_school, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use anyhow::Context;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    user_id: i32,
    title: String,
    message: String,
}

#[get("/api/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let user_id = user.user_id;
    cached(cache, &conn, &keys::notifications(user_id), move |c| {
        queries::notifications::list_for_user(c, user_id)
    })
    .await
    .map(Json)
}

/// Administrators may notify anyone; schools may notify their own students.
#[tracing::instrument(
    name = "Creating a notification",
    skip(user, body, conn, cache),
    fields(request_id = %Uuid::new_v4(), sender = user.user_id, recipient = body.user_id)
)]
#[post("/api/notifications", data = "<body>")]
pub async fn create_notification(
    user: AuthenticatedUser,
    body: Json<NotificationBody>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<status::Created<Json<Notification>>, ApiError> {
    let body = body.into_inner();
    let recipient = body.user_id;
    match user.role {
        Role::Admin => {}
        Role::School => {
            let school_id = own_school(&user, &conn).await?.id;
            let enrolled = execute(&conn, "Failed to check the recipient.", move |c| {
                queries::students::is_enrolled(c, recipient, school_id)
            })
            .await?;
            if !enrolled {
                return Err(ApiError::Forbidden);
            }
        }
        Role::Student => return Err(ApiError::Forbidden),
    }
    let content =
        NotificationContent::parse(body.title, body.message).map_err(ApiError::Validation)?;

    let created = conn
        .run(move |c| {
            queries::notifications::insert(
                c,
                &NewNotification {
                    user_id: recipient,
                    title: content.title.as_ref(),
                    message: content.message.as_ref(),
                },
            )
        })
        .await;
    let notification = match created {
        Err(e) if queries::is_foreign_key_violation(&e) => return Err(ApiError::NotFound("User")),
        other => other.context("Failed to store the notification.")?,
    };

    cache.invalidate(&keys::notifications(recipient));
    Ok(status::Created::new(format!("/api/notifications/{}", notification.id))
        .body(Json(notification)))
}

#[put("/api/notifications/<notification_id>/read")]
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    notification_id: i32,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Notification>, ApiError> {
    let user_id = user.user_id;
    let notification = execute(&conn, "Failed to update the notification.", move |c| {
        queries::notifications::mark_read(c, notification_id, user_id)
    })
    .await?
    .ok_or(ApiError::NotFound("Notification"))?;
    cache.invalidate(&keys::notifications(user_id));
    Ok(Json(notification))
}
