use crate::schema::students;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone, serde::Serialize)]
#[diesel(table_name = students)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub school_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent {
    pub school_id: i32,
    pub user_id: i32,
}
