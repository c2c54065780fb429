//! Ticket-sales aggregation. One `student_fundraisers` row is one ticket.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::PgConnection;

/// Totals for one school.
///
/// `total_amount` sums the price of each ticket's fundraiser, so it equals
/// `total_tickets × price` whenever the school sells at one unit price.
#[derive(QueryableByName, Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[diesel(sql_type = BigInt)]
    pub total_tickets: i64,
    #[diesel(sql_type = BigInt)]
    pub total_amount: i64,
    #[diesel(sql_type = BigInt)]
    pub student_count: i64,
}

/// Totals across every school, shown on the admin dashboard.
#[derive(QueryableByName, Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[diesel(sql_type = BigInt)]
    pub school_count: i64,
    #[diesel(sql_type = BigInt)]
    pub student_count: i64,
    #[diesel(sql_type = BigInt)]
    pub fundraiser_count: i64,
    #[diesel(sql_type = BigInt)]
    pub total_tickets: i64,
    #[diesel(sql_type = BigInt)]
    pub total_amount: i64,
}

/// Aggregates the tickets held by the students of `school_id`.
///
/// `student_count` counts distinct students holding at least one ticket.
/// A school without students or tickets, or an unknown id, yields all zeros.
#[tracing::instrument(name = "Compute school sales summary", skip(conn))]
pub fn sales_summary(conn: &mut PgConnection, school_id: i32) -> QueryResult<SalesSummary> {
    diesel::sql_query(
        "SELECT COUNT(sf.student_id) AS total_tickets, \
             COALESCE(SUM(f.price), 0)::BIGINT AS total_amount, \
             COUNT(DISTINCT sf.student_id) AS student_count \
         FROM student_fundraisers sf \
         JOIN students st ON st.id = sf.student_id \
         JOIN fundraisers f ON f.id = sf.fundraiser_id \
         WHERE st.school_id = $1",
    )
    .bind::<Integer, _>(school_id)
    .get_result(conn)
}

#[tracing::instrument(name = "Compute sales overview", skip(conn))]
pub fn overview(conn: &mut PgConnection) -> QueryResult<Overview> {
    diesel::sql_query(
        "SELECT (SELECT COUNT(*) FROM schools) AS school_count, \
             (SELECT COUNT(*) FROM students) AS student_count, \
             (SELECT COUNT(*) FROM fundraisers) AS fundraiser_count, \
             (SELECT COUNT(*) FROM student_fundraisers) AS total_tickets, \
             (SELECT COALESCE(SUM(f.price), 0)::BIGINT FROM student_fundraisers sf \
                 JOIN fundraisers f ON f.id = sf.fundraiser_id) AS total_amount",
    )
    .get_result(conn)
}
