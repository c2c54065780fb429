use crate::schema::sessions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub id: String,
    pub data: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub id: &'a str,
    pub data: &'a str,
    pub expires_at: DateTime<Utc>,
}
