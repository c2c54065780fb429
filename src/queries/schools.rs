use crate::models::{School, SchoolChanges};
use crate::schema::schools;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Text, Timestamptz};
use diesel::PgConnection;

/// One line of the admin schools list.
#[derive(QueryableByName, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub admin_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub address: Option<String>,
    #[diesel(sql_type = Text)]
    pub username: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = BigInt)]
    pub student_count: i64,
    #[diesel(sql_type = BigInt)]
    pub ticket_count: i64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
}

#[tracing::instrument(name = "Find the school owned by a user", skip(conn))]
pub fn find_by_user(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<School>> {
    schools::table
        .filter(schools::user_id.eq(user_id))
        .select(School::as_select())
        .first(conn)
        .optional()
}

#[tracing::instrument(name = "List schools", skip(conn))]
pub fn list_rows(conn: &mut PgConnection) -> QueryResult<Vec<SchoolRow>> {
    diesel::sql_query(
        "SELECT sc.id, sc.name, sc.admin_name, sc.address, u.username, u.email, sc.created_at, \
             (SELECT COUNT(*) FROM students st WHERE st.school_id = sc.id) AS student_count, \
             (SELECT COUNT(*) FROM student_fundraisers sf \
                 JOIN students st ON st.id = sf.student_id \
                 WHERE st.school_id = sc.id) AS ticket_count \
         FROM schools sc \
         JOIN users u ON u.id = sc.user_id \
         ORDER BY sc.name, sc.id",
    )
    .load(conn)
}

/// Applies `changes` and returns the updated school, or `None` when no school has `school_id`.
#[tracing::instrument(name = "Update a school", skip(conn, changes))]
pub fn update(
    conn: &mut PgConnection,
    school_id: i32,
    changes: &SchoolChanges,
) -> QueryResult<Option<School>> {
    if changes.is_empty() {
        return schools::table
            .find(school_id)
            .select(School::as_select())
            .first(conn)
            .optional();
    }
    diesel::update(schools::table.find(school_id))
        .set(changes)
        .returning(School::as_returning())
        .get_result(conn)
        .optional()
}
