//! Server-rendered dashboards behind the role-gated navigator.

use crate::access::{Navigation, Navigator, Page};
use crate::cache::{keys, QueryState};
use crate::domain::Role;
use crate::guards::AuthenticatedUser;
use crate::queries;
use crate::routes::{cached, own_school, own_student, ApiError};
use crate::startup::{ApiCache, FundraiserDbConn};
use crate::views::{format_cents, tables, NavLink, PageContext, SummaryCard, Templates, Viewer};
use diesel::{PgConnection, QueryResult};
use rocket::http::uri::fmt::Path;
use rocket::http::uri::Segments;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Rows shown per list on a dashboard; the full lists have their own pages.
const DASHBOARD_ROWS: usize = 5;

#[derive(Responder)]
pub enum PageResponse {
    Html(RawHtml<String>),
    Redirect(Redirect),
}

#[get("/<path..>", rank = 100)]
pub async fn page(
    path: Segments<'_, Path>,
    viewer: request::Outcome<AuthenticatedUser, anyhow::Error>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
    templates: &State<Templates>,
) -> Result<PageResponse, Status> {
    let path = format!("/{}", path.collect::<Vec<_>>().join("/"));
    let viewer = signed_in(viewer)?;
    let role = viewer.as_ref().map(|user| user.role);

    let page = match Navigator::default().resolve(&path, role) {
        Navigation::NotFound => return Err(Status::NotFound),
        Navigation::Redirect(target) => {
            tracing::debug!(%path, target, "Redirecting a page visit");
            return Ok(PageResponse::Redirect(Redirect::to(target)));
        }
        Navigation::Render(page) => page,
    };

    let renderer = PageRenderer {
        conn: &conn,
        cache,
        templates,
    };
    let html = match (page, viewer) {
        (Page::Login, _) => renderer.login(),
        (page, Some(user)) => renderer.dashboard(page, &user).await,
        // The navigator only renders role-gated pages for signed-in viewers.
        (_, None) => return Ok(PageResponse::Redirect(Redirect::to(crate::access::LOGIN_PATH))),
    };
    html.map(|html| PageResponse::Html(RawHtml(html)))
        .map_err(|e| {
            tracing::error!(error.cause_chain = ?e, %path, "Failed to render a page");
            Status::InternalServerError
        })
}

/// The viewer, or `None` for anonymous visits. Only a missing or expired
/// session counts as anonymous; any other guard failure fails the page.
fn signed_in<T>(outcome: request::Outcome<T, anyhow::Error>) -> Result<Option<T>, Status> {
    match outcome {
        Outcome::Success(user) => Ok(Some(user)),
        Outcome::Forward(_) => Ok(None),
        Outcome::Error((status, _)) if status == Status::Unauthorized => Ok(None),
        Outcome::Error((status, e)) => {
            tracing::error!(error.cause_chain = ?e, %status, "Failed to identify the viewer");
            Err(status)
        }
    }
}

fn nav_for(role: Role) -> Vec<NavLink> {
    let link = |label: &'static str, href: &'static str| NavLink { label, href };
    let mut nav = match role {
        Role::Admin => vec![
            link("Dashboard", "/admin"),
            link("Schools", "/admin/schools"),
            link("Students", "/admin/students"),
        ],
        Role::School => vec![
            link("Dashboard", "/school"),
            link("Students", "/school/students"),
            link("Fundraisers", "/school/fundraisers"),
        ],
        Role::Student => vec![link("Dashboard", "/student")],
    };
    nav.push(link("Notifications", "/notifications"));
    nav
}

fn title_of(page: Page) -> &'static str {
    match page {
        Page::Login => "Sign in",
        Page::AdminDashboard => "Administration",
        Page::AdminSchools => "All schools",
        Page::AdminStudents => "All students",
        Page::SchoolDashboard => "School dashboard",
        Page::SchoolStudents => "Our students",
        Page::SchoolFundraisers => "Our fundraisers",
        Page::StudentDashboard => "My fundraisers",
        Page::Notifications => "Notifications",
    }
}

/// The message a list shows in place of its rows when its load failed.
fn failure_message(e: &ApiError) -> String {
    match e {
        ApiError::UnexpectedError(_) => "This list could not be loaded. Try again shortly.".into(),
        other => other.to_string(),
    }
}

struct PageRenderer<'a> {
    conn: &'a FundraiserDbConn,
    cache: &'a ApiCache,
    templates: &'a Templates,
}

impl<'a> PageRenderer<'a> {
    fn login(&self) -> Result<String, tera::Error> {
        self.templates.render(
            "login.html",
            &PageContext {
                title: title_of(Page::Login).into(),
                ..Default::default()
            },
        )
    }

    /// Reads through the shared cache; a failure becomes the list's error state.
    async fn load<T, F>(&self, key: &str, query: F) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    {
        match cached(self.cache, self.conn, key, query).await {
            Ok(value) => QueryState::Ready(value),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, key, "Failed to load page data");
                QueryState::Failed(failure_message(&e))
            }
        }
    }

    async fn dashboard(&self, page: Page, user: &AuthenticatedUser) -> Result<String, tera::Error> {
        let mut context = PageContext {
            title: title_of(page).into(),
            viewer: Some(Viewer {
                username: user.username.clone(),
                role: user.role.as_str(),
            }),
            nav: nav_for(user.role),
            ..Default::default()
        };
        if let Err(e) = self.fill(page, user, &mut context).await {
            tracing::error!(error.cause_chain = ?e, user_id = user.user_id, "Failed to load a profile");
            context.error = Some(failure_message(&e));
        }
        self.templates.render("dashboard.html", &context)
    }

    /// Adds the cards and lists of `page`. Errors only for a missing profile;
    /// list failures are rendered in place.
    async fn fill(
        &self,
        page: Page,
        user: &AuthenticatedUser,
        context: &mut PageContext,
    ) -> Result<(), ApiError> {
        let templates = self.templates;
        match page {
            Page::Login => {}
            Page::AdminDashboard => {
                match self.load(keys::ADMIN_OVERVIEW, queries::sales::overview).await {
                    QueryState::Ready(overview) => {
                        context.cards = vec![
                            SummaryCard::new("Schools", overview.school_count.to_string()),
                            SummaryCard::new("Students", overview.student_count.to_string()),
                            SummaryCard::new("Fundraisers", overview.fundraiser_count.to_string()),
                            SummaryCard::new("Tickets sold", overview.total_tickets.to_string()),
                            SummaryCard::new("Total raised", format_cents(overview.total_amount)),
                        ]
                    }
                    QueryState::Failed(message) => context.error = Some(message),
                    QueryState::Idle | QueryState::Pending => {}
                }
                let schools = self.load(keys::ADMIN_SCHOOLS, queries::schools::list_rows).await;
                let students = self
                    .load(keys::ADMIN_STUDENTS, |c| queries::students::list_rows(c, None))
                    .await;
                context.sections = vec![
                    tables::schools().limit(DASHBOARD_ROWS).render(templates, &schools)?,
                    tables::all_students().limit(DASHBOARD_ROWS).render(templates, &students)?,
                ];
            }
            Page::AdminSchools => {
                let schools = self.load(keys::ADMIN_SCHOOLS, queries::schools::list_rows).await;
                context.sections = vec![tables::schools().render(templates, &schools)?];
            }
            Page::AdminStudents => {
                let students = self
                    .load(keys::ADMIN_STUDENTS, |c| queries::students::list_rows(c, None))
                    .await;
                context.sections = vec![tables::all_students().render(templates, &students)?];
            }
            Page::SchoolDashboard => {
                let school = own_school(user, self.conn).await?;
                let school_id = school.id;
                context.title = school.name;
                match self
                    .load(&keys::sales_summary(school_id), move |c| {
                        queries::sales::sales_summary(c, school_id)
                    })
                    .await
                {
                    QueryState::Ready(summary) => {
                        context.cards = vec![
                            SummaryCard::new("Tickets sold", summary.total_tickets.to_string()),
                            SummaryCard::new("Amount raised", format_cents(summary.total_amount)),
                            SummaryCard::new("Students selling", summary.student_count.to_string()),
                        ]
                    }
                    QueryState::Failed(message) => context.error = Some(message),
                    QueryState::Idle | QueryState::Pending => {}
                }
                let fundraisers = self
                    .load(&keys::school_fundraisers(school_id), move |c| {
                        queries::fundraisers::list_for_school(c, school_id)
                    })
                    .await;
                let students = self
                    .load(&keys::school_students(school_id), move |c| {
                        queries::students::list_rows(c, Some(school_id))
                    })
                    .await;
                context.sections = vec![
                    tables::fundraisers().limit(DASHBOARD_ROWS).render(templates, &fundraisers)?,
                    tables::school_students().limit(DASHBOARD_ROWS).render(templates, &students)?,
                ];
            }
            Page::SchoolStudents => {
                let school_id = own_school(user, self.conn).await?.id;
                let students = self
                    .load(&keys::school_students(school_id), move |c| {
                        queries::students::list_rows(c, Some(school_id))
                    })
                    .await;
                context.sections = vec![tables::school_students().render(templates, &students)?];
            }
            Page::SchoolFundraisers => {
                let school_id = own_school(user, self.conn).await?.id;
                let fundraisers = self
                    .load(&keys::school_fundraisers(school_id), move |c| {
                        queries::fundraisers::list_for_school(c, school_id)
                    })
                    .await;
                context.sections = vec![tables::fundraisers().render(templates, &fundraisers)?];
            }
            Page::StudentDashboard => {
                let student = own_student(user, self.conn).await?;
                let fundraisers = self
                    .load(&keys::student_fundraisers(user.user_id), move |c| {
                        queries::fundraisers::list_for_student(c, &student)
                    })
                    .await;
                if let QueryState::Ready(list) = &fundraisers {
                    let joined = list.iter().filter(|f| f.joined).count();
                    let owed: i64 = list
                        .iter()
                        .filter(|f| f.joined)
                        .map(|f| i64::from(f.fundraiser.price))
                        .sum();
                    context.cards = vec![
                        SummaryCard::new("Open fundraisers", list.len().to_string()),
                        SummaryCard::new("Tickets held", joined.to_string()),
                        SummaryCard::new("Ticket value", format_cents(owed)),
                    ];
                }
                let user_id = user.user_id;
                let notifications = self
                    .load(&keys::notifications(user_id), move |c| {
                        queries::notifications::list_for_user(c, user_id)
                    })
                    .await;
                context.sections = vec![
                    tables::student_fundraisers().render(templates, &fundraisers)?,
                    tables::notifications()
                        .limit(DASHBOARD_ROWS)
                        .render(templates, &notifications)?,
                ];
            }
            Page::Notifications => {
                let user_id = user.user_id;
                let notifications = self
                    .load(&keys::notifications(user_id), move |c| {
                        queries::notifications::list_for_user(c, user_id)
                    })
                    .await;
                context.sections = vec![tables::notifications().render(templates, &notifications)?];
            }
        }
        Ok(())
    }
}
