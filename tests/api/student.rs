use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn students_see_only_active_fundraisers_of_their_school() {
    // arrange
    let app = spawn_app().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    lincoln.create_fundraiser("Car wash", 1000).await;
    let closed = lincoln.create_fundraiser("Bake sale", 1000).await;
    roosevelt.create_fundraiser("Fun run", 1000).await;
    lincoln
        .user
        .put(
            &format!("/api/school/fundraisers/{}/active", closed),
            &json!({ "active": false }),
        )
        .await;
    let student = app.create_student(lincoln.id).await;

    // act
    let fundraisers = student.user.get_json("/api/student/fundraisers").await;

    // assert
    let fundraisers = fundraisers.as_array().unwrap();
    assert_eq!(fundraisers.len(), 1);
    assert_eq!(fundraisers[0]["name"], "Car wash");
    assert_eq!(fundraisers[0]["joined"], false);
}

#[tokio::test]
async fn joining_returns_a_201_and_marks_the_fundraiser_joined() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let fundraiser = school.create_fundraiser("Car wash", 1000).await;
    let student = app.create_student(school.id).await;
    student.user.get_json("/api/student/fundraisers").await;

    // act
    let response = student.join(fundraiser).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let ticket: Value = response.json().await.unwrap();
    assert_eq!(ticket["studentId"], student.id);
    assert_eq!(ticket["fundraiserId"], fundraiser);
    let fundraisers = student.user.get_json("/api/student/fundraisers").await;
    assert_eq!(fundraisers[0]["joined"], true);
}

#[tokio::test]
async fn joining_twice_returns_a_409() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let fundraiser = school.create_fundraiser("Car wash", 1000).await;
    let student = app.create_student(school.id).await;
    student.join(fundraiser).await;

    // act
    let response = student.join(fundraiser).await;

    // assert
    assert_eq!(409, response.status().as_u16());
    let summary = school.user.get_json("/api/school/sales-summary").await;
    assert_eq!(summary["totalTickets"], 1);
}

#[tokio::test]
async fn joining_another_schools_fundraiser_returns_a_404() {
    // arrange
    let app = spawn_app().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    let fundraiser = roosevelt.create_fundraiser("Fun run", 1000).await;
    let student = app.create_student(lincoln.id).await;

    // act
    let response = student.join(fundraiser).await;

    // assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn schools_cannot_join_fundraisers() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let fundraiser = school.create_fundraiser("Car wash", 1000).await;

    // act
    let response = school
        .user
        .post(
            &format!("/api/student/fundraisers/{}/join", fundraiser),
            &json!({}),
        )
        .await;

    // assert
    assert_eq!(403, response.status().as_u16());
}
