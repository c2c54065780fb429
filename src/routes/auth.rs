use crate::access::home_for;
use crate::access::LOGIN_PATH;
use crate::domain::{AccountProfile, NewAccount, Password, RequiredText, Role, UserEmail, Username};
use crate::guards::{start_session, AuthenticatedUser, SessionData, SESSION_COOKIE};
use crate::models::User;
use crate::queries;
use crate::queries::users::UserInfo;
use crate::routes::{execute, ApiError};
use crate::cache::keys;
use crate::startup::{ApiCache, FundraiserDbConn, SessionPolicy};
use crate::views::{PageContext, Templates};
use anyhow::{anyhow, Context};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::response::content::RawHtml;
use rocket::response::{status, Redirect};
use rocket::serde::json::Json;
use rocket::State;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    email: String,
    username: String,
    password: Secret<String>,
    role: String,
    school_name: Option<String>,
    admin_name: Option<String>,
    address: Option<String>,
    school_id: Option<i32>,
}

impl TryFrom<RegisterBody> for NewAccount {
    type Error = String;

    fn try_from(body: RegisterBody) -> Result<Self, Self::Error> {
        let email = UserEmail::parse(body.email)?;
        let username = Username::parse(body.username)?;
        let password = Password::parse(body.password)?;
        let profile = match Role::parse(&body.role)? {
            Role::Admin => return Err("Administrator accounts cannot be self-registered.".into()),
            Role::School => AccountProfile::School {
                name: RequiredText::parse("School name", body.school_name.unwrap_or_default())?,
                admin_name: RequiredText::parse(
                    "Administrator name",
                    body.admin_name.unwrap_or_default(),
                )?,
                address: RequiredText::parse_optional("Address", body.address)?,
            },
            Role::Student => AccountProfile::Student {
                school_id: body
                    .school_id
                    .ok_or_else(|| "Student accounts need a schoolId.".to_string())?,
            },
        };
        Ok(NewAccount {
            email,
            username,
            password,
            profile,
        })
    }
}

#[derive(serde::Deserialize, FromForm)]
pub struct Credentials {
    login: String,
    password: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    role: Role,
    home: &'static str,
}

#[tracing::instrument(
    name = "Registering a new account",
    skip(body, conn, cache),
    fields(
        request_id = %Uuid::new_v4(),
        username = %body.username,
        role = %body.role
    )
)]
#[post("/api/auth/register", data = "<body>")]
pub async fn register(
    body: Json<RegisterBody>,
    conn: FundraiserDbConn,
    cache: &State<ApiCache>,
) -> Result<status::Created<Json<UserInfo>>, ApiError> {
    let account: NewAccount = body.into_inner().try_into().map_err(ApiError::Validation)?;
    let school_id = match account.profile {
        AccountProfile::Student { school_id } => Some(school_id),
        AccountProfile::School { .. } => None,
    };
    let password_hash = spawn_password_hashing(account.password.expose_secret().clone()).await?;

    let created = conn
        .run(move |c| {
            let user = queries::users::create_account(c, &account, &password_hash)?;
            queries::users::load_user_info(c, user.id)
        })
        .await;
    match created {
        Ok(Some(info)) => {
            invalidate_listings(cache, school_id);
            Ok(status::Created::new(format!("/api/users/{}", info.id)).body(Json(info)))
        }
        Ok(None) => Err(anyhow!("The new account vanished before it could be read back.").into()),
        Err(e) if queries::is_unique_violation(&e) => Err(ApiError::Conflict(
            "That email or username is already registered.".into(),
        )),
        Err(e) if queries::is_foreign_key_violation(&e) => Err(ApiError::Validation(format!(
            "School {} does not exist.",
            school_id.unwrap_or_default()
        ))),
        Err(e) => Err(anyhow::Error::new(e)
            .context("Failed to store the new account.")
            .into()),
    }
}

/// Drops the admin lists a new account shows up in, and for a student its school's list.
fn invalidate_listings(cache: &ApiCache, school_id: Option<i32>) {
    cache.invalidate(keys::ADMIN_SCHOOLS);
    cache.invalidate(keys::ADMIN_OVERVIEW);
    if let Some(school_id) = school_id {
        cache.invalidate(keys::ADMIN_STUDENTS);
        cache.invalidate(&keys::school_students(school_id));
    }
}

#[tracing::instrument(name = "Logging in", skip(credentials, conn, cookies, policy), fields(request_id = %Uuid::new_v4(), login = %credentials.login))]
#[post("/api/auth/login", data = "<credentials>")]
pub async fn login(
    credentials: Json<Credentials>,
    conn: FundraiserDbConn,
    cookies: &CookieJar<'_>,
    policy: &State<SessionPolicy>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = authenticate(&conn, credentials.into_inner()).await?;
    let role = sign_in(&conn, cookies, policy, user).await?;
    Ok(Json(LoginResponse {
        role,
        home: role.home_path(),
    }))
}

#[derive(Responder)]
pub enum LoginFormOutcome {
    SignedIn(Redirect),
    Rejected(status::Custom<RawHtml<String>>),
}

/// The login page's form. Failures re-render the page instead of answering JSON.
#[tracing::instrument(name = "Logging in through the form", skip(credentials, conn, cookies, policy, templates), fields(request_id = %Uuid::new_v4(), login = %credentials.login))]
#[post("/login", data = "<credentials>")]
pub async fn login_form(
    credentials: Form<Credentials>,
    conn: FundraiserDbConn,
    cookies: &CookieJar<'_>,
    policy: &State<SessionPolicy>,
    templates: &State<Templates>,
) -> Result<LoginFormOutcome, ApiError> {
    let rejected = |message: String, status: Status| -> Result<LoginFormOutcome, ApiError> {
        let html = templates
            .render(
                "login.html",
                &PageContext {
                    title: "Sign in".into(),
                    error: Some(message),
                    ..Default::default()
                },
            )
            .context("Failed to render the login page.")?;
        Ok(LoginFormOutcome::Rejected(status::Custom(status, RawHtml(html))))
    };

    let user = match authenticate(&conn, credentials.into_inner()).await {
        Ok(user) => user,
        Err(ApiError::Unauthorized) => {
            return rejected("Invalid username or password.".into(), Status::Unauthorized)
        }
        Err(e) => return Err(e),
    };
    let role = sign_in(&conn, cookies, policy, user).await?;
    Ok(LoginFormOutcome::SignedIn(Redirect::to(role.home_path())))
}

#[tracing::instrument(name = "Logging out", skip(user, conn, cookies, cache), fields(user_id = user.user_id))]
#[post("/api/auth/logout")]
pub async fn logout(
    user: AuthenticatedUser,
    conn: FundraiserDbConn,
    cookies: &CookieJar<'_>,
    cache: &State<ApiCache>,
) -> Result<Status, ApiError> {
    end_session(&conn, cookies, cache, Some(user)).await?;
    Ok(Status::NoContent)
}

#[post("/logout")]
pub async fn logout_form(
    user: Option<AuthenticatedUser>,
    conn: FundraiserDbConn,
    cookies: &CookieJar<'_>,
    cache: &State<ApiCache>,
) -> Result<Redirect, ApiError> {
    end_session(&conn, cookies, cache, user).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

/// The user matching `credentials`, or `Unauthorized`.
async fn authenticate(conn: &FundraiserDbConn, credentials: Credentials) -> Result<User, ApiError> {
    let login = credentials.login.clone();
    let user = execute(conn, "Failed to look up the user.", move |c| {
        queries::users::find_by_login(c, &login)
    })
    .await?
    .ok_or(ApiError::Unauthorized)?;

    let candidate = Secret::new(credentials.password);
    let expected = user.password_hash.clone();
    let verified = rocket::tokio::task::spawn_blocking(move || {
        verify_password_hash(&expected, &candidate)
    })
    .await
    .context("Failed to spawn a blocking task.")??;

    match verified {
        true => Ok(user),
        false => Err(ApiError::Unauthorized),
    }
}

async fn sign_in(
    conn: &FundraiserDbConn,
    cookies: &CookieJar<'_>,
    policy: &SessionPolicy,
    user: User,
) -> Result<Role, ApiError> {
    let role = user.role().map_err(|e| anyhow!(e))?;
    let data = SessionData {
        user_id: user.id,
        role,
    };
    let ttl = policy.ttl;
    let session_id = conn
        .run(move |c| start_session(c, &data, Utc::now(), ttl))
        .await?;
    cookies.add(
        Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    tracing::info!(user_id = user.id, %role, "User signed in");
    Ok(role)
}

async fn end_session(
    conn: &FundraiserDbConn,
    cookies: &CookieJar<'_>,
    cache: &ApiCache,
    user: Option<AuthenticatedUser>,
) -> Result<(), ApiError> {
    if let Some(user) = user {
        let session_id = user.session_id.clone();
        execute(conn, "Failed to delete the session.", move |c| {
            queries::sessions::delete(c, &session_id)
        })
        .await?;
        for key in keys::user_scoped(user.user_id) {
            cache.invalidate(&key);
        }
        tracing::info!(user_id = user.user_id, home = home_for(Some(user.role)), "User signed out");
    }
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok(())
}

async fn spawn_password_hashing(password: String) -> Result<String, ApiError> {
    let hash = rocket::tokio::task::spawn_blocking(move || compute_password_hash(Secret::new(password)))
        .await
        .context("Failed to spawn a blocking task.")??;
    Ok(hash)
}

pub fn compute_password_hash(password: Secret<String>) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash a password: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_password_hash(
    expected: &str,
    candidate: &Secret<String>,
) -> Result<bool, anyhow::Error> {
    let expected = PasswordHash::new(expected)
        .map_err(|e| anyhow!("Stored password hash is not in PHC format: {}", e))?;
    Ok(Argon2::default()
        .verify_password(candidate.expose_secret().as_bytes(), &expected)
        .is_ok())
}
