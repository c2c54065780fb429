use crate::schema::student_fundraisers;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// One row of `student_fundraisers`: a student holding one ticket for a fundraiser.
#[derive(Queryable, Selectable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = student_fundraisers)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub student_id: i32,
    pub fundraiser_id: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, Copy)]
#[diesel(table_name = student_fundraisers)]
pub struct NewTicket {
    pub student_id: i32,
    pub fundraiser_id: i32,
}
