use crate::cache::keys;
use crate::domain::Role;
use crate::guards::AuthenticatedUser;
use crate::models::{NewTicket, Student, Ticket};
use crate::queries;
use crate::queries::fundraisers::StudentFundraiser;
use crate::routes::{cached, execute, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use anyhow::Context;
use diesel::QueryResult;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

/// The student profile of the signed-in user. Fails with 403 for other roles.
pub async fn own_student(
    user: &AuthenticatedUser,
    conn: &FundraiserDbConn,
) -> Result<Student, ApiError> {
    user.require(Role::Student)?;
    let user_id = user.user_id;
    execute(conn, "Failed to load the user's student profile.", move |c| {
        queries::students::find_by_user(c, user_id)
    })
    .await?
    .ok_or(ApiError::NotFound("Student"))
}

#[get("/api/student/fundraisers")]
pub async fn student_fundraisers(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<StudentFundraiser>>, ApiError> {
    let student = own_student(&user, &conn).await?;
    cached(cache, &conn, &keys::student_fundraisers(user.user_id), move |c| {
        queries::fundraisers::list_for_student(c, &student)
    })
    .await
    .map(Json)
}

enum JoinOutcome {
    Joined(Ticket),
    NotJoinable,
    AlreadyJoined,
}

/// Takes one ticket for an open fundraiser of the student's own school.
#[tracing::instrument(
    name = "Joining a fundraiser",
    skip(user, conn, cache),
    fields(request_id = %Uuid::new_v4(), user_id = user.user_id)
)]
#[post("/api/student/fundraisers/<fundraiser_id>/join")]
pub async fn join_fundraiser(
    user: AuthenticatedUser,
    fundraiser_id: i32,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<status::Created<Json<Ticket>>, ApiError> {
    let student = own_student(&user, &conn).await?;
    let (student_id, school_id) = (student.id, student.school_id);

    let outcome = conn
        .run(move |c| -> QueryResult<JoinOutcome> {
            if queries::fundraisers::find_joinable(c, fundraiser_id, school_id)?.is_none() {
                return Ok(JoinOutcome::NotJoinable);
            }
            match queries::fundraisers::insert_ticket(
                c,
                NewTicket {
                    student_id,
                    fundraiser_id,
                },
            ) {
                Ok(ticket) => Ok(JoinOutcome::Joined(ticket)),
                Err(e) if queries::is_unique_violation(&e) => Ok(JoinOutcome::AlreadyJoined),
                Err(e) => Err(e),
            }
        })
        .await
        .context("Failed to record the ticket.")?;

    match outcome {
        JoinOutcome::NotJoinable => Err(ApiError::NotFound("Fundraiser")),
        JoinOutcome::AlreadyJoined => Err(ApiError::Conflict(
            "You already hold a ticket for this fundraiser.".into(),
        )),
        JoinOutcome::Joined(ticket) => {
            cache.invalidate(&keys::student_fundraisers(user.user_id));
            cache.invalidate(&keys::sales_summary(school_id));
            cache.invalidate(&keys::school_students(school_id));
            cache.invalidate(keys::ADMIN_STUDENTS);
            cache.invalidate(keys::ADMIN_SCHOOLS);
            cache.invalidate(keys::ADMIN_OVERVIEW);
            tracing::info!(student_id, fundraiser_id, "Ticket recorded");
            Ok(status::Created::new(format!(
                "/api/student/fundraisers/{}",
                fundraiser_id
            ))
            .body(Json(ticket)))
        }
    }
}
