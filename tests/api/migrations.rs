use crate::helpers::spawn_app;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use fundraiser::migrations::{self, MigrationOutcome};

#[derive(QueryableByName)]
struct Price {
    #[diesel(sql_type = Integer)]
    price: i32,
}

fn prices(conn: &mut PgConnection) -> Vec<i32> {
    diesel::sql_query("SELECT price FROM fundraisers ORDER BY id")
        .load::<Price>(conn)
        .unwrap()
        .into_iter()
        .map(|row| row.price)
        .collect()
}

#[tokio::test]
async fn running_migrations_again_changes_nothing() {
    // arrange
    let mut app = spawn_app().await;

    // act
    let reports = migrations::run_all(&mut app.db_connection).unwrap();

    // assert
    assert_eq!(reports.len(), 3);
    for report in reports {
        assert_eq!(report.outcome, MigrationOutcome::Skipped, "{} was not skipped", report.name);
    }
}

#[tokio::test]
async fn missing_and_invalid_prices_are_backfilled() {
    // arrange
    let mut app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    school.create_fundraiser("Car wash", 1500).await;
    school.create_fundraiser("Bake sale", 2000).await;
    school.create_fundraiser("Fun run", 2500).await;
    let conn = &mut app.db_connection;
    diesel::sql_query("ALTER TABLE fundraisers ALTER COLUMN price DROP NOT NULL")
        .execute(conn)
        .unwrap();
    diesel::sql_query("UPDATE fundraisers SET price = NULL WHERE name = 'Car wash'")
        .execute(conn)
        .unwrap();
    diesel::sql_query("UPDATE fundraisers SET price = 0 WHERE name = 'Bake sale'")
        .execute(conn)
        .unwrap();

    // act
    let first = migrations::run_all(conn).unwrap();
    let second = migrations::run_all(conn).unwrap();

    // assert
    assert_eq!(first[2].outcome, MigrationOutcome::Corrected { rows: 2 });
    assert_eq!(second[2].outcome, MigrationOutcome::Skipped);
    assert_eq!(prices(conn), vec![1000, 1000, 2500]);
}

#[tokio::test]
async fn a_missing_price_column_is_added_with_the_default() {
    // arrange
    let mut app = spawn_app().await;
    let school = app.create_school("Lincoln High").await;
    school.create_fundraiser("Car wash", 1500).await;
    let conn = &mut app.db_connection;
    diesel::sql_query("ALTER TABLE fundraisers DROP COLUMN price")
        .execute(conn)
        .unwrap();

    // act
    let reports = migrations::run_all(conn).unwrap();

    // assert
    assert_eq!(reports[2].name, "ensure_fundraiser_price");
    assert_eq!(reports[2].outcome, MigrationOutcome::Applied);
    assert_eq!(prices(conn), vec![1000]);
}
