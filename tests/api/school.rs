use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn sales_summary_counts_tickets_and_distinct_students() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let car_wash = school.create_fundraiser("Car wash", 1000).await;
    let bake_sale = school.create_fundraiser("Bake sale", 1000).await;
    let ada = app.create_student(school.id).await;
    let grace = app.create_student(school.id).await;
    let linus = app.create_student(school.id).await;
    for (student, fundraiser) in [(&ada, car_wash), (&ada, bake_sale), (&grace, car_wash), (&linus, bake_sale)] {
        assert_eq!(201, student.join(fundraiser).await.status().as_u16());
    }

    // act
    let summary = school.user.get_json("/api/school/sales-summary").await;

    // assert
    assert_eq!(
        summary,
        json!({ "totalTickets": 4, "totalAmount": 4000, "studentCount": 3 })
    );
}

#[tokio::test]
async fn sales_summary_is_all_zero_for_a_new_school() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    app.create_student(school.id).await;

    // act
    let summary = school.user.get_json("/api/school/sales-summary").await;

    // assert
    assert_eq!(
        summary,
        json!({ "totalTickets": 0, "totalAmount": 0, "studentCount": 0 })
    );
}

#[tokio::test]
async fn sales_summary_only_counts_the_schools_own_students() {
    // arrange
    let app = spawn_app().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    let fundraiser = roosevelt.create_fundraiser("Fun run", 2500).await;
    let student = app.create_student(roosevelt.id).await;
    student.join(fundraiser).await;

    // act
    let summary = lincoln.user.get_json("/api/school/sales-summary").await;

    // assert
    assert_eq!(summary["totalTickets"], 0);
}

#[tokio::test]
async fn a_refreshed_summary_reflects_new_tickets() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let fundraiser = school.create_fundraiser("Car wash", 1500).await;
    let student = app.create_student(school.id).await;
    let before = school.user.get_json("/api/school/sales-summary").await;

    // act
    student.join(fundraiser).await;
    let after = school.user.get_json("/api/school/sales-summary").await;

    // assert
    assert_eq!(before["totalTickets"], 0);
    assert_eq!(after["totalTickets"], 1);
    assert_eq!(after["totalAmount"], 1500);
}

#[tokio::test]
async fn fundraisers_default_to_the_standard_price() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    // act
    let response = school
        .user
        .post(
            "/api/school/fundraisers",
            &json!({ "name": "Car wash", "location": "Parking lot", "eventDate": "2025-05-01" }),
        )
        .await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let fundraiser: Value = response.json().await.unwrap();
    assert_eq!(fundraiser["price"], 1000);
    assert_eq!(fundraiser["isActive"], true);
    let listed = school.user.get_json("/api/school/fundraisers").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fundraisers_reject_a_non_positive_price() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    // act
    let response = school
        .user
        .post(
            "/api/school/fundraisers",
            &json!({ "name": "Car wash", "location": "Parking lot", "eventDate": "2025-05-01", "price": 0 }),
        )
        .await;

    // assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_school_cannot_close_another_schools_fundraiser() {
    // arrange
    let app = spawn_app().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    let fundraiser = roosevelt.create_fundraiser("Fun run", 1000).await;

    // act
    let response = lincoln
        .user
        .put(
            &format!("/api/school/fundraisers/{}/active", fundraiser),
            &json!({ "active": false }),
        )
        .await;

    // assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn school_students_lists_ticket_totals() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let fundraiser = school.create_fundraiser("Car wash", 1200).await;
    let student = app.create_student(school.id).await;
    student.join(fundraiser).await;

    // act
    let students = school.user.get_json("/api/school/students").await;

    // assert
    let students = students.as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["ticketCount"], 1);
    assert_eq!(students[0]["amountRaised"], 1200);
}

#[tokio::test]
async fn a_newly_registered_student_shows_up_in_the_next_listing() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let before = school.user.get_json("/api/school/students").await;
    assert_eq!(before.as_array().unwrap().len(), 0);

    // act
    app.create_student(school.id).await;

    // assert
    let after = school.user.get_json("/api/school/students").await;
    assert_eq!(after.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn students_cannot_read_school_endpoints() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    let student = app.create_student(school.id).await;

    // act
    let response = student.user.get("/api/school/sales-summary").await;

    // assert
    assert_eq!(403, response.status().as_u16());
}
