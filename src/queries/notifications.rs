use crate::models::{NewNotification, Notification};
use crate::schema::notifications;
use diesel::prelude::*;
use diesel::PgConnection;

#[tracing::instrument(name = "List notifications of a user", skip(conn))]
pub fn list_for_user(conn: &mut PgConnection, user_id: i32) -> QueryResult<Vec<Notification>> {
    notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order((notifications::created_at.desc(), notifications::id.desc()))
        .select(Notification::as_select())
        .load(conn)
}

#[tracing::instrument(name = "Insert a notification", skip(conn, notification), fields(user_id = notification.user_id))]
pub fn insert(
    conn: &mut PgConnection,
    notification: &NewNotification,
) -> QueryResult<Notification> {
    diesel::insert_into(notifications::table)
        .values(notification)
        .returning(Notification::as_returning())
        .get_result(conn)
}

/// Marks a notification read if it belongs to `user_id`.
#[tracing::instrument(name = "Mark a notification read", skip(conn))]
pub fn mark_read(
    conn: &mut PgConnection,
    notification_id: i32,
    user_id: i32,
) -> QueryResult<Option<Notification>> {
    diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id)),
    )
    .set(notifications::read.eq(true))
    .returning(Notification::as_returning())
    .get_result(conn)
    .optional()
}
