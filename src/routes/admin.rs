use crate::cache::keys;
use crate::domain::{RequiredText, Role};
use crate::guards::AuthenticatedUser;
use crate::models::{School, SchoolChanges};
use crate::queries;
use crate::queries::sales::Overview;
use crate::queries::schools::SchoolRow;
use crate::queries::students::StudentRow;
use crate::routes::{cached, execute, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

/// Partial update of a school. A blank `address` clears it.
#[derive(serde::Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchoolUpdateBody {
    name: Option<String>,
    admin_name: Option<String>,
    address: Option<String>,
}

impl TryFrom<SchoolUpdateBody> for SchoolChanges {
    type Error = String;

    fn try_from(body: SchoolUpdateBody) -> Result<Self, Self::Error> {
        let name = body
            .name
            .map(|name| RequiredText::parse("School name", name))
            .transpose()?;
        let admin_name = body
            .admin_name
            .map(|name| RequiredText::parse("Administrator name", name))
            .transpose()?;
        let address = match body.address {
            None => None,
            Some(address) => Some(
                RequiredText::parse_optional("Address", Some(address))?.map(RequiredText::into_inner),
            ),
        };
        Ok(SchoolChanges {
            name: name.map(RequiredText::into_inner),
            admin_name: admin_name.map(RequiredText::into_inner),
            address,
        })
    }
}

#[get("/api/admin/overview")]
pub async fn admin_overview(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Overview>, ApiError> {
    user.require(Role::Admin)?;
    cached(cache, &conn, keys::ADMIN_OVERVIEW, queries::sales::overview)
        .await
        .map(Json)
}

#[get("/api/admin/schools")]
pub async fn admin_schools(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<SchoolRow>>, ApiError> {
    user.require(Role::Admin)?;
    cached(cache, &conn, keys::ADMIN_SCHOOLS, queries::schools::list_rows)
        .await
        .map(Json)
}

#[tracing::instrument(
    name = "Editing a school",
    skip(user, body, conn, cache),
    fields(request_id = %Uuid::new_v4(), user_id = user.user_id)
)]
#[put("/api/admin/schools/<school_id>", data = "<body>")]
pub async fn update_school(
    user: AuthenticatedUser,
    school_id: i32,
    body: Json<SchoolUpdateBody>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<School>, ApiError> {
    user.require(Role::Admin)?;
    let changes: SchoolChanges = body.into_inner().try_into().map_err(ApiError::Validation)?;
    let school = execute(&conn, "Failed to update the school.", move |c| {
        queries::schools::update(c, school_id, &changes)
    })
    .await?
    .ok_or(ApiError::NotFound("School"))?;

    cache.invalidate(keys::ADMIN_SCHOOLS);
    cache.invalidate(keys::ADMIN_STUDENTS);
    cache.invalidate(&keys::school_students(school_id));
    cache.invalidate_prefix("/api/user/info");
    Ok(Json(school))
}

#[get("/api/admin/students")]
pub async fn admin_students(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<StudentRow>>, ApiError> {
    user.require(Role::Admin)?;
    cached(cache, &conn, keys::ADMIN_STUDENTS, |c| {
        queries::students::list_rows(c, None)
    })
    .await
    .map(Json)
}
