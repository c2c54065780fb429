use crate::models::Student;
use crate::schema::students;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Text, Timestamptz};
use diesel::PgConnection;

/// One line of a students list, with the student's own ticket totals.
#[derive(QueryableByName, Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Integer)]
    pub user_id: i32,
    #[diesel(sql_type = Text)]
    pub username: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Integer)]
    pub school_id: i32,
    #[diesel(sql_type = Text)]
    pub school_name: String,
    #[diesel(sql_type = BigInt)]
    pub ticket_count: i64,
    #[diesel(sql_type = BigInt)]
    pub amount_raised: i64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
}

#[tracing::instrument(name = "Find the student profile of a user", skip(conn))]
pub fn find_by_user(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<Student>> {
    students::table
        .filter(students::user_id.eq(user_id))
        .select(Student::as_select())
        .first(conn)
        .optional()
}

/// Lists students with their ticket totals, restricted to one school when `school_id` is set.
#[tracing::instrument(name = "List students", skip(conn))]
pub fn list_rows(conn: &mut PgConnection, school_id: Option<i32>) -> QueryResult<Vec<StudentRow>> {
    diesel::sql_query(
        "SELECT st.id, st.user_id, u.username, u.email, st.school_id, sc.name AS school_name, \
             st.created_at, \
             COUNT(sf.fundraiser_id) AS ticket_count, \
             COALESCE(SUM(f.price), 0)::BIGINT AS amount_raised \
         FROM students st \
         JOIN users u ON u.id = st.user_id \
         JOIN schools sc ON sc.id = st.school_id \
         LEFT JOIN student_fundraisers sf ON sf.student_id = st.id \
         LEFT JOIN fundraisers f ON f.id = sf.fundraiser_id \
         WHERE ($1::INTEGER IS NULL OR st.school_id = $1) \
         GROUP BY st.id, u.username, u.email, sc.name \
         ORDER BY sc.name, u.username",
    )
    .bind::<Nullable<Integer>, _>(school_id)
    .load(conn)
}

/// Whether the user `user_id` is a student enrolled at `school_id`.
#[tracing::instrument(name = "Check student enrollment", skip(conn))]
pub fn is_enrolled(conn: &mut PgConnection, user_id: i32, school_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        students::table
            .filter(students::user_id.eq(user_id))
            .filter(students::school_id.eq(school_id)),
    ))
    .get_result(conn)
}
