use super::catalog::{column_exists, table_exists};
use super::{Migration, MigrationOutcome};
use crate::domain::TicketPrice;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::PgConnection;

/// Creates the persisted session store.
pub struct EnsureSessionTable;

impl Migration for EnsureSessionTable {
    fn name(&self) -> &'static str {
        "ensure_session_table"
    }

    fn apply(&self, conn: &mut PgConnection) -> QueryResult<MigrationOutcome> {
        if table_exists(conn, "sessions")? {
            return Ok(MigrationOutcome::Skipped);
        }
        diesel::sql_query(
            "CREATE TABLE sessions (\
                 id TEXT PRIMARY KEY, \
                 data TEXT NOT NULL, \
                 expires_at TIMESTAMPTZ NOT NULL\
             )",
        )
        .execute(conn)?;
        diesel::sql_query("CREATE INDEX sessions_expires_at_idx ON sessions (expires_at)")
            .execute(conn)?;
        Ok(MigrationOutcome::Applied)
    }
}

/// Adds `fundraisers.price`, or repairs legacy rows whose price is missing or not positive.
pub struct EnsureFundraiserPrice;

impl Migration for EnsureFundraiserPrice {
    fn name(&self) -> &'static str {
        "ensure_fundraiser_price"
    }

    fn apply(&self, conn: &mut PgConnection) -> QueryResult<MigrationOutcome> {
        let default = TicketPrice::DEFAULT_CENTS;
        if !column_exists(conn, "fundraisers", "price")? {
            // DDL cannot take bind parameters.
            diesel::sql_query(format!(
                "ALTER TABLE fundraisers ADD COLUMN price INTEGER NOT NULL DEFAULT {}",
                default
            ))
            .execute(conn)?;
            return Ok(MigrationOutcome::Applied);
        }

        let rows = diesel::sql_query(
            "UPDATE fundraisers SET price = $1 WHERE price IS NULL OR price <= 0",
        )
        .bind::<Integer, _>(default)
        .execute(conn)?;
        diesel::sql_query(format!(
            "ALTER TABLE fundraisers ALTER COLUMN price SET DEFAULT {}",
            default
        ))
        .execute(conn)?;
        diesel::sql_query("ALTER TABLE fundraisers ALTER COLUMN price SET NOT NULL")
            .execute(conn)?;

        Ok(match rows {
            0 => MigrationOutcome::Skipped,
            rows => MigrationOutcome::Corrected { rows },
        })
    }
}
