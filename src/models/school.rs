use crate::schema::schools;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[diesel(table_name = schools)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: i32,
    pub name: String,
    pub admin_name: String,
    pub address: Option<String>,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = schools)]
pub struct NewSchool<'a> {
    pub name: &'a str,
    pub admin_name: &'a str,
    pub address: Option<&'a str>,
    pub user_id: i32,
}

/// Fields an administrator may edit. `None` leaves the column untouched;
/// `address: Some(None)` clears it.
#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = schools)]
pub struct SchoolChanges {
    pub name: Option<String>,
    pub admin_name: Option<String>,
    pub address: Option<Option<String>>,
}

impl SchoolChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.admin_name.is_none() && self.address.is_none()
    }
}
