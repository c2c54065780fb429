use crate::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(
    Queryable, Selectable, Debug, Clone, serde::Serialize, serde::Deserialize,
)]
#[diesel(table_name = notifications)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub message: &'a str,
}
