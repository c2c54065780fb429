use crate::models::{Fundraiser, NewFundraiser, NewTicket, Student, Ticket};
use crate::schema::{fundraisers, student_fundraisers};
use diesel::prelude::*;
use diesel::PgConnection;

/// A fundraiser as seen by one student.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFundraiser {
    #[serde(flatten)]
    pub fundraiser: Fundraiser,
    pub joined: bool,
}

#[tracing::instrument(name = "List fundraisers of a school", skip(conn))]
pub fn list_for_school(conn: &mut PgConnection, school_id: i32) -> QueryResult<Vec<Fundraiser>> {
    fundraisers::table
        .filter(fundraisers::school_id.eq(school_id))
        .order((fundraisers::event_date.asc(), fundraisers::id.asc()))
        .select(Fundraiser::as_select())
        .load(conn)
}

#[tracing::instrument(name = "Insert a fundraiser", skip(conn, new_fundraiser), fields(name = %new_fundraiser.name))]
pub fn insert(conn: &mut PgConnection, new_fundraiser: &NewFundraiser) -> QueryResult<Fundraiser> {
    diesel::insert_into(fundraisers::table)
        .values(new_fundraiser)
        .returning(Fundraiser::as_returning())
        .get_result(conn)
}

/// Flips `is_active` on a fundraiser owned by `school_id`. `None` when no such fundraiser exists.
#[tracing::instrument(name = "Set fundraiser activity", skip(conn))]
pub fn set_active(
    conn: &mut PgConnection,
    fundraiser_id: i32,
    school_id: i32,
    active: bool,
) -> QueryResult<Option<Fundraiser>> {
    diesel::update(
        fundraisers::table
            .filter(fundraisers::id.eq(fundraiser_id))
            .filter(fundraisers::school_id.eq(school_id)),
    )
    .set(fundraisers::is_active.eq(active))
    .returning(Fundraiser::as_returning())
    .get_result(conn)
    .optional()
}

/// Active fundraisers of the student's school, flagged with whether the student already holds a ticket.
#[tracing::instrument(name = "List fundraisers for a student", skip(conn, student), fields(student_id = student.id))]
pub fn list_for_student(
    conn: &mut PgConnection,
    student: &Student,
) -> QueryResult<Vec<StudentFundraiser>> {
    let rows = fundraisers::table
        .left_join(
            student_fundraisers::table.on(student_fundraisers::fundraiser_id
                .eq(fundraisers::id)
                .and(student_fundraisers::student_id.eq(student.id))),
        )
        .filter(fundraisers::school_id.eq(student.school_id))
        .filter(fundraisers::is_active.eq(true))
        .order((fundraisers::event_date.asc(), fundraisers::id.asc()))
        .select((
            Fundraiser::as_select(),
            student_fundraisers::student_id.nullable(),
        ))
        .load::<(Fundraiser, Option<i32>)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(fundraiser, ticket)| StudentFundraiser {
            fundraiser,
            joined: ticket.is_some(),
        })
        .collect())
}

/// An active fundraiser of `school_id`, i.e. one a student of that school may join.
#[tracing::instrument(name = "Find a joinable fundraiser", skip(conn))]
pub fn find_joinable(
    conn: &mut PgConnection,
    fundraiser_id: i32,
    school_id: i32,
) -> QueryResult<Option<Fundraiser>> {
    fundraisers::table
        .filter(fundraisers::id.eq(fundraiser_id))
        .filter(fundraisers::school_id.eq(school_id))
        .filter(fundraisers::is_active.eq(true))
        .select(Fundraiser::as_select())
        .first(conn)
        .optional()
}

/// Records one ticket. A repeated (student, fundraiser) pair fails with a unique violation.
#[tracing::instrument(name = "Insert a ticket", skip(conn))]
pub fn insert_ticket(conn: &mut PgConnection, ticket: NewTicket) -> QueryResult<Ticket> {
    diesel::insert_into(student_fundraisers::table)
        .values(ticket)
        .returning(Ticket::as_returning())
        .get_result(conn)
}
