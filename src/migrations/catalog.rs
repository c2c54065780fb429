use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use diesel::PgConnection;

#[derive(QueryableByName)]
struct Present {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Whether `table` exists in the connection's current schema.
pub fn table_exists(conn: &mut PgConnection, table: &str) -> QueryResult<bool> {
    diesel::sql_query(
        "SELECT EXISTS (\
             SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1\
         ) AS present",
    )
    .bind::<Text, _>(table)
    .get_result::<Present>(conn)
    .map(|row| row.present)
}

/// Whether `table` has a column named `column`.
pub fn column_exists(conn: &mut PgConnection, table: &str, column: &str) -> QueryResult<bool> {
    diesel::sql_query(
        "SELECT EXISTS (\
             SELECT 1 FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2\
         ) AS present",
    )
    .bind::<Text, _>(table)
    .bind::<Text, _>(column)
    .get_result::<Present>(conn)
    .map(|row| row.present)
}
