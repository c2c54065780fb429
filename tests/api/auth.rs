use crate::helpers::{client, spawn_app, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_a_201_and_the_new_profile() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .register(&json!({
            "email": "Principal@Lincoln.edu",
            "username": "lincoln",
            "password": PASSWORD,
            "role": "school",
            "schoolName": "Lincoln High",
            "adminName": "Pat Principal",
        }))
        .await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let info: Value = response.json().await.unwrap();
    assert_eq!(info["email"], "principal@lincoln.edu");
    assert_eq!(info["role"], "school");
    assert_eq!(info["school"]["name"], "Lincoln High");
    assert!(info["school"]["address"].is_null());
    assert!(info.get("passwordHash").is_none());
}

#[tokio::test]
async fn register_returns_a_409_for_a_taken_username() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    // act
    let response = app
        .register(&json!({
            "email": "someone.else@lincoln.edu",
            "username": school.user.username,
            "password": PASSWORD,
            "role": "student",
            "schoolId": school.id,
        }))
        .await;

    // assert
    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn register_returns_a_400_when_data_is_invalid() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (
            json!({"email": "not-an-email", "username": "ada", "password": PASSWORD, "role": "student", "schoolId": 1}),
            "an invalid email",
        ),
        (
            json!({"email": "ada@school.org", "username": "ada", "password": "short", "role": "student", "schoolId": 1}),
            "a short password",
        ),
        (
            json!({"email": "ada@school.org", "username": "ada", "password": PASSWORD, "role": "admin"}),
            "a self-registered admin",
        ),
        (
            json!({"email": "ada@school.org", "username": "ada", "password": PASSWORD, "role": "student", "schoolId": 4242}),
            "an unknown school",
        ),
        (
            json!({"email": "ada@school.org", "username": "ada", "password": PASSWORD, "role": "school"}),
            "a school without a name",
        ),
        (json!({"username": "ada"}), "missing fields"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.register(&invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn login_accepts_the_username_or_the_email() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let email = format!("{}@schools.org", school.user.username);

    for login in [school.user.username.as_str(), email.as_str()] {
        // act
        let response = app.login(&client(), login, PASSWORD).await;

        // assert
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["role"], "school");
        assert_eq!(body["home"], "/school");
    }
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    // act
    let response = app
        .login(&client(), &school.user.username, "not the password")
        .await;

    // assert
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn protected_endpoints_require_a_session() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = client()
        .get(app.url("/api/user/info"))
        .send()
        .await
        .unwrap();

    // assert
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn user_info_describes_the_signed_in_student() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let student = app.create_student(school.id).await;

    // act
    let info = student.user.get_json("/api/user/info").await;

    // assert
    assert_eq!(info["role"], "student");
    assert_eq!(info["student"]["id"], student.id);
    assert_eq!(info["student"]["schoolName"], "Lincoln High");
    assert!(info["school"].is_null());
}

#[tokio::test]
async fn logout_ends_the_session() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    // act
    let response = school.user.post("/api/auth/logout", &json!({})).await;

    // assert
    assert_eq!(204, response.status().as_u16());
    let response = school.user.get("/api/user/info").await;
    assert_eq!(401, response.status().as_u16());
}
