use crate::cache::keys;
use crate::domain::{RequiredText, Role, TicketPrice};
use crate::guards::AuthenticatedUser;
use crate::models::{Fundraiser, NewFundraiser, School};
use crate::queries;
use crate::queries::sales::SalesSummary;
use crate::queries::students::StudentRow;
use crate::routes::{cached, execute, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use chrono::NaiveDate;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundraiserBody {
    name: String,
    location: String,
    event_date: NaiveDate,
    price: Option<i64>,
}

#[derive(serde::Deserialize)]
pub struct ActiveBody {
    active: bool,
}

/// The school owned by the signed-in user. Fails with 403 for other roles.
pub async fn own_school(
    user: &AuthenticatedUser,
    conn: &FundraiserDbConn,
) -> Result<School, ApiError> {
    user.require(Role::School)?;
    let user_id = user.user_id;
    execute(conn, "Failed to load the user's school.", move |c| {
        queries::schools::find_by_user(c, user_id)
    })
    .await?
    .ok_or(ApiError::NotFound("School"))
}

/// Drops every cached read that shows this school's fundraisers.
fn invalidate_fundraisers(cache: &ApiCache, school_id: i32) {
    cache.invalidate(&keys::school_fundraisers(school_id));
    cache.invalidate_prefix(keys::STUDENT_FUNDRAISERS);
    cache.invalidate(keys::ADMIN_OVERVIEW);
}

#[get("/api/school/sales-summary")]
pub async fn sales_summary(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<SalesSummary>, ApiError> {
    let school_id = own_school(&user, &conn).await?.id;
    cached(cache, &conn, &keys::sales_summary(school_id), move |c| {
        queries::sales::sales_summary(c, school_id)
    })
    .await
    .map(Json)
}

#[get("/api/school/fundraisers")]
pub async fn school_fundraisers(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<Fundraiser>>, ApiError> {
    let school_id = own_school(&user, &conn).await?.id;
    cached(cache, &conn, &keys::school_fundraisers(school_id), move |c| {
        queries::fundraisers::list_for_school(c, school_id)
    })
    .await
    .map(Json)
}

#[tracing::instrument(
    name = "Creating a fundraiser",
    skip(user, body, conn, cache),
    fields(request_id = %Uuid::new_v4(), user_id = user.user_id, name = %body.name)
)]
#[post("/api/school/fundraisers", data = "<body>")]
pub async fn create_fundraiser(
    user: AuthenticatedUser,
    body: Json<FundraiserBody>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<status::Created<Json<Fundraiser>>, ApiError> {
    let school_id = own_school(&user, &conn).await?.id;
    let body = body.into_inner();
    let name = RequiredText::parse("Name", body.name).map_err(ApiError::Validation)?;
    let location = RequiredText::parse("Location", body.location).map_err(ApiError::Validation)?;
    let price = match body.price {
        Some(cents) => TicketPrice::parse(cents).map_err(ApiError::Validation)?,
        None => TicketPrice::default(),
    };
    let event_date = body.event_date;

    let fundraiser = execute(&conn, "Failed to store the fundraiser.", move |c| {
        queries::fundraisers::insert(
            c,
            &NewFundraiser {
                name: name.as_ref(),
                location: location.as_ref(),
                school_id,
                event_date,
                price: price.cents(),
            },
        )
    })
    .await?;
    invalidate_fundraisers(cache, school_id);

    Ok(status::Created::new(format!("/api/school/fundraisers/{}", fundraiser.id))
        .body(Json(fundraiser)))
}

#[tracing::instrument(name = "Opening or closing a fundraiser", skip(user, body, conn, cache), fields(user_id = user.user_id, active = body.active))]
#[put("/api/school/fundraisers/<fundraiser_id>/active", data = "<body>")]
pub async fn set_fundraiser_active(
    user: AuthenticatedUser,
    fundraiser_id: i32,
    body: Json<ActiveBody>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Fundraiser>, ApiError> {
    let school_id = own_school(&user, &conn).await?.id;
    let active = body.active;
    let fundraiser = execute(&conn, "Failed to update the fundraiser.", move |c| {
        queries::fundraisers::set_active(c, fundraiser_id, school_id, active)
    })
    .await?
    .ok_or(ApiError::NotFound("Fundraiser"))?;
    invalidate_fundraisers(cache, school_id);
    Ok(Json(fundraiser))
}

#[get("/api/school/students")]
pub async fn school_students(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<Json<Vec<StudentRow>>, ApiError> {
    let school_id = own_school(&user, &conn).await?.id;
    cached(cache, &conn, &keys::school_students(school_id), move |c| {
        queries::students::list_rows(c, Some(school_id))
    })
    .await
    .map(Json)
}
