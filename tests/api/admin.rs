use crate::helpers::spawn_app;
use serde_json::json;

#[tokio::test]
async fn admins_see_every_school_and_student() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    app.create_student(lincoln.id).await;
    app.create_student(roosevelt.id).await;
    app.create_student(roosevelt.id).await;

    // act
    let schools = admin.get_json("/api/admin/schools").await;
    let students = admin.get_json("/api/admin/students").await;

    // assert
    let schools = schools.as_array().unwrap();
    assert_eq!(schools.len(), 2);
    let roosevelt_row = schools.iter().find(|s| s["id"] == roosevelt.id).unwrap();
    assert_eq!(roosevelt_row["studentCount"], 2);
    assert_eq!(students.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn the_overview_totals_every_school() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin().await;
    let lincoln = app.create_school("Lincoln High").await;
    let roosevelt = app.create_school("Roosevelt Middle").await;
    let car_wash = lincoln.create_fundraiser("Car wash", 1000).await;
    let fun_run = roosevelt.create_fundraiser("Fun run", 2500).await;
    app.create_student(lincoln.id).await.join(car_wash).await;
    app.create_student(roosevelt.id).await.join(fun_run).await;

    // act
    let overview = admin.get_json("/api/admin/overview").await;

    // assert
    assert_eq!(
        overview,
        json!({
            "schoolCount": 2,
            "studentCount": 2,
            "fundraiserCount": 2,
            "totalTickets": 2,
            "totalAmount": 3500,
        })
    );
}

#[tokio::test]
async fn newly_registered_accounts_show_up_in_the_next_listing() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin().await;
    let lincoln = app.create_school("Lincoln High").await;
    assert_eq!(admin.get_json("/api/admin/schools").await.as_array().unwrap().len(), 1);
    assert_eq!(admin.get_json("/api/admin/students").await.as_array().unwrap().len(), 0);
    assert_eq!(admin.get_json("/api/admin/overview").await["schoolCount"], 1);

    // act
    app.create_school("Roosevelt Middle").await;
    app.create_student(lincoln.id).await;

    // assert
    let schools = admin.get_json("/api/admin/schools").await;
    assert_eq!(schools.as_array().unwrap().len(), 2);
    let lincoln_row = schools.as_array().unwrap().iter().find(|s| s["id"] == lincoln.id).unwrap();
    assert_eq!(lincoln_row["studentCount"], 1);
    assert_eq!(admin.get_json("/api/admin/students").await.as_array().unwrap().len(), 1);
    let overview = admin.get_json("/api/admin/overview").await;
    assert_eq!(overview["schoolCount"], 2);
    assert_eq!(overview["studentCount"], 1);
}

#[tokio::test]
async fn edits_to_a_school_show_up_in_the_next_listing() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin().await;
    let school = app.create_school("Lincoln High").await;
    admin.get_json("/api/admin/schools").await;

    // act
    let response = admin
        .put(
            &format!("/api/admin/schools/{}", school.id),
            &json!({ "name": "Lincoln Senior High", "address": "" }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let schools = admin.get_json("/api/admin/schools").await;
    assert_eq!(schools[0]["name"], "Lincoln Senior High");
    assert!(schools[0]["address"].is_null());
    let info = school.user.get_json("/api/user/info").await;
    assert_eq!(info["school"]["name"], "Lincoln Senior High");
}

#[tokio::test]
async fn editing_an_unknown_school_returns_a_404() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin().await;

    // act
    let response = admin
        .put("/api/admin/schools/4242", &json!({ "name": "Nowhere" }))
        .await;

    // assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn schools_cannot_use_admin_endpoints() {
    // arrange
    let app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;

    for path in ["/api/admin/overview", "/api/admin/schools", "/api/admin/students"] {
        // act
        let response = school.user.get(path).await;

        // assert
        assert_eq!(403, response.status().as_u16(), "{} was not forbidden", path);
    }
}
