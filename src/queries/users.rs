use crate::domain::{AccountProfile, NewAccount};
use crate::models::{NewSchool, NewStudent, NewUser, School, User};
use crate::schema::{schools, students, users};
use diesel::prelude::*;
use diesel::PgConnection;

/// Profile returned by `/api/user/info`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub role: String,
    pub school: Option<School>,
    pub student: Option<StudentProfile>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i32,
    pub school_id: i32,
    pub school_name: String,
}

#[tracing::instrument(name = "Insert a user", skip(conn, new_user), fields(username = %new_user.username))]
pub fn insert_user(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
}

/// Creates the user row and its role profile atomically.
#[tracing::instrument(
    name = "Create an account",
    skip(conn, account, password_hash),
    fields(username = %account.username.as_ref(), role = %account.role())
)]
pub fn create_account(
    conn: &mut PgConnection,
    account: &NewAccount,
    password_hash: &str,
) -> QueryResult<User> {
    conn.transaction(|conn| {
        let user = insert_user(
            conn,
            &NewUser {
                email: account.email.as_ref(),
                username: account.username.as_ref(),
                password_hash,
                role: account.role().as_str(),
            },
        )?;
        match &account.profile {
            AccountProfile::School {
                name,
                admin_name,
                address,
            } => {
                diesel::insert_into(schools::table)
                    .values(NewSchool {
                        name: name.as_ref(),
                        admin_name: admin_name.as_ref(),
                        address: address.as_ref().map(|a| a.as_ref()),
                        user_id: user.id,
                    })
                    .execute(conn)?;
            }
            AccountProfile::Student { school_id } => {
                diesel::insert_into(students::table)
                    .values(NewStudent {
                        school_id: *school_id,
                        user_id: user.id,
                    })
                    .execute(conn)?;
            }
        }
        Ok(user)
    })
}

#[tracing::instrument(name = "Find a user by id", skip(conn))]
pub fn find_by_id(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<User>> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Looks a user up by username or email, whichever `login` matches.
#[tracing::instrument(name = "Find a user by login", skip(conn))]
pub fn find_by_login(conn: &mut PgConnection, login: &str) -> QueryResult<Option<User>> {
    let email = login.trim().to_lowercase();
    users::table
        .filter(users::username.eq(login).or(users::email.eq(email)))
        .select(User::as_select())
        .first(conn)
        .optional()
}

#[tracing::instrument(name = "Load user info", skip(conn))]
pub fn load_user_info(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<UserInfo>> {
    let user = match find_by_id(conn, user_id)? {
        Some(user) => user,
        None => return Ok(None),
    };
    let school = schools::table
        .filter(schools::user_id.eq(user.id))
        .select(School::as_select())
        .first(conn)
        .optional()?;
    let student = students::table
        .inner_join(schools::table)
        .filter(students::user_id.eq(user.id))
        .select((students::id, students::school_id, schools::name))
        .first::<(i32, i32, String)>(conn)
        .optional()?
        .map(|(id, school_id, school_name)| StudentProfile {
            id,
            school_id,
            school_name,
        });
    Ok(Some(UserInfo {
        id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
        school,
        student,
    }))
}
