use crate::schema::fundraisers;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

#[derive(
    Queryable, Selectable, Debug, Clone, serde::Serialize, serde::Deserialize,
)]
#[diesel(table_name = fundraisers)]
#[serde(rename_all = "camelCase")]
pub struct Fundraiser {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub school_id: i32,
    pub is_active: bool,
    pub event_date: NaiveDate,
    pub price: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = fundraisers)]
pub struct NewFundraiser<'a> {
    pub name: &'a str,
    pub location: &'a str,
    pub school_id: i32,
    pub event_date: NaiveDate,
    pub price: i32,
}
