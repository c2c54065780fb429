use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::{Connection, PgConnection};
use fundraiser::configuration::{get_configuration, Settings};
use fundraiser::migrations;
use fundraiser::models::NewUser;
use fundraiser::queries;
use fundraiser::routes::compute_password_hash;
use fundraiser::startup::Application;
use fundraiser::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub address: String,
    pub db_connection: PgConnection,
}

/// A signed-in user with its own cookie jar.
pub struct TestUser {
    pub user_id: i32,
    pub username: String,
    pub client: reqwest::Client,
    address: String,
}

pub struct TestSchool {
    pub id: i32,
    pub user: TestUser,
}

pub struct TestStudent {
    pub id: i32,
    pub user: TestUser,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.database.database_name = Uuid::new_v4().to_string();
        c
    };

    let db_connection = setup_database(&configuration);

    let mut app = Application::build(&configuration)
        .await
        .expect("Failed to build the application.");
    let _ = tokio::spawn(app.server.launch());
    let port = app.port.get().await.expect("The server never bound a port.");
    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_connection,
    }
}

/// Creates a database with nothing in it and returns its connection string.
pub fn create_empty_database() -> Secret<String> {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = Uuid::new_v4().to_string();
    let mut connection = connect(configuration.database.connection_string_without_database());
    diesel::sql_query(format!(
        "CREATE DATABASE \"{}\"",
        configuration.database.database_name
    ))
    .execute(&mut connection)
    .expect("Failed to create database.");
    configuration.database.connection_string()
}

fn setup_database(configuration: &Settings) -> PgConnection {
    let mut connection = connect(configuration.database.connection_string_without_database());

    diesel::sql_query(format!(
        "CREATE DATABASE \"{}\"",
        configuration.database.database_name
    ))
    .execute(&mut connection)
    .expect("Failed to create database.");

    let mut connection = connect(configuration.database.connection_string());
    migrations::run_all(&mut connection).expect("Failed to migrate the database.");
    connection
}

fn connect(connection_string: Secret<String>) -> PgConnection {
    PgConnection::establish(connection_string.expose_secret())
        .expect("Failed to connect to Postgres.")
}

/// A client that keeps cookies and does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, body: &Value) -> reqwest::Response {
        client()
            .post(self.url("/api/auth/register"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, client: &reqwest::Client, login: &str, password: &str) -> reqwest::Response {
        client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "login": login, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn sign_in(&self, user_id: i32, username: &str) -> TestUser {
        let client = client();
        let response = self.login(&client, username, PASSWORD).await;
        assert_eq!(200, response.status().as_u16(), "{} could not sign in", username);
        TestUser {
            user_id,
            username: username.to_string(),
            client,
            address: self.address.clone(),
        }
    }

    /// Administrators cannot register themselves; they are inserted directly.
    pub async fn create_admin(&mut self) -> TestUser {
        let username = format!("admin{}", &Uuid::new_v4().simple().to_string()[..8]);
        let hash = compute_password_hash(Secret::new(PASSWORD.into())).unwrap();
        let admin = queries::users::insert_user(
            &mut self.db_connection,
            &NewUser {
                email: &format!("{}@district.org", username),
                username: &username,
                password_hash: &hash,
                role: "admin",
            },
        )
        .unwrap();
        self.sign_in(admin.id, &username).await
    }

    pub async fn create_school(&self, name: &str) -> TestSchool {
        let username = format!("school{}", &Uuid::new_v4().simple().to_string()[..8]);
        let response = self
            .register(&json!({
                "email": format!("{}@schools.org", username),
                "username": username,
                "password": PASSWORD,
                "role": "school",
                "schoolName": name,
                "adminName": "Pat Principal",
                "address": "1 Main Street",
            }))
            .await;
        assert_eq!(201, response.status().as_u16());
        let info: Value = response.json().await.unwrap();
        TestSchool {
            id: info["school"]["id"].as_i64().unwrap() as i32,
            user: self
                .sign_in(info["id"].as_i64().unwrap() as i32, &username)
                .await,
        }
    }

    pub async fn create_student(&self, school_id: i32) -> TestStudent {
        let username = format!("student{}", &Uuid::new_v4().simple().to_string()[..8]);
        let response = self
            .register(&json!({
                "email": format!("{}@pupils.org", username),
                "username": username,
                "password": PASSWORD,
                "role": "student",
                "schoolId": school_id,
            }))
            .await;
        assert_eq!(201, response.status().as_u16());
        let info: Value = response.json().await.unwrap();
        TestStudent {
            id: info["student"]["id"].as_i64().unwrap() as i32,
            user: self
                .sign_in(info["id"].as_i64().unwrap() as i32, &username)
                .await,
        }
    }
}

impl TestUser {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(200, response.status().as_u16(), "GET {} failed", path);
        response.json().await.unwrap()
    }
}

impl TestSchool {
    /// Creates an active fundraiser priced at `price` cents and returns its id.
    pub async fn create_fundraiser(&self, name: &str, price: i64) -> i32 {
        let response = self
            .user
            .post(
                "/api/school/fundraisers",
                &json!({
                    "name": name,
                    "location": "Gymnasium",
                    "eventDate": NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                    "price": price,
                }),
            )
            .await;
        assert_eq!(201, response.status().as_u16());
        let fundraiser: Value = response.json().await.unwrap();
        fundraiser["id"].as_i64().unwrap() as i32
    }
}

impl TestStudent {
    pub async fn join(&self, fundraiser_id: i32) -> reqwest::Response {
        self.user
            .post(
                &format!("/api/student/fundraisers/{}/join", fundraiser_id),
                &json!({}),
            )
            .await
    }
}
