//! Schema management.
//!
//! The baseline tables ship as embedded Diesel migrations. Later changes are
//! idempotent scripts that inspect the catalog before acting, so running the
//! whole sequence any number of times converges on the same schema and data.

mod catalog;
mod scripts;

pub use catalog::{column_exists, table_exists};
pub use scripts::{EnsureFundraiserPrice, EnsureSessionTable};

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::fmt;

pub const BASELINE: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(thiserror::Error)]
pub enum MigrationError {
    #[error("Failed to apply the baseline migrations")]
    Baseline(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Migration script `{script}` failed")]
    Script {
        script: &'static str,
        #[source]
        source: diesel::result::Error,
    },
}

impl fmt::Debug for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

/// What a script did on this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The structure was missing and has been created.
    Applied,
    /// The structure existed and the data needed no correction.
    Skipped,
    /// The structure existed; `rows` rows were repaired.
    Corrected { rows: usize },
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::Applied => write!(f, "applied"),
            MigrationOutcome::Skipped => write!(f, "already up to date"),
            MigrationOutcome::Corrected { rows } => write!(f, "corrected {} row(s)", rows),
        }
    }
}

/// An idempotent schema change.
pub trait Migration {
    fn name(&self) -> &'static str;

    /// Inspect the catalog and apply whatever is missing. Runs inside a transaction.
    fn apply(&self, conn: &mut PgConnection) -> diesel::QueryResult<MigrationOutcome>;
}

/// Scripts in the order they must run.
pub fn scripts() -> Vec<Box<dyn Migration>> {
    vec![Box::new(EnsureSessionTable), Box::new(EnsureFundraiserPrice)]
}

/// A step of `run_all`, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: String,
    pub outcome: MigrationOutcome,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.outcome)
    }
}

/// Applies pending baseline migrations.
#[tracing::instrument(name = "Run baseline migrations", skip(conn))]
pub fn run_baseline(conn: &mut PgConnection) -> Result<StepReport, MigrationError> {
    let applied = conn
        .run_pending_migrations(BASELINE)
        .map_err(MigrationError::Baseline)?;
    tracing::info!(applied = applied.len(), "Baseline migrations checked");
    Ok(StepReport {
        name: "baseline".to_string(),
        outcome: match applied.len() {
            0 => MigrationOutcome::Skipped,
            _ => MigrationOutcome::Applied,
        },
    })
}

/// Runs one script inside its own transaction, so a failure leaves nothing half-applied.
#[tracing::instrument(name = "Run migration script", skip(conn, script), fields(script = script.name()))]
pub fn run_script(
    conn: &mut PgConnection,
    script: &dyn Migration,
) -> Result<StepReport, MigrationError> {
    let outcome = conn
        .transaction(|conn| script.apply(conn))
        .map_err(|source| MigrationError::Script {
            script: script.name(),
            source,
        })?;
    tracing::info!(%outcome, "Migration script finished");
    Ok(StepReport {
        name: script.name().to_string(),
        outcome,
    })
}

/// Baseline, then every script. `on_step` sees each report as soon as it is produced.
pub fn run_all_with<F>(conn: &mut PgConnection, mut on_step: F) -> Result<Vec<StepReport>, MigrationError>
where
    F: FnMut(&StepReport),
{
    let mut reports = Vec::new();
    let baseline = run_baseline(conn)?;
    on_step(&baseline);
    reports.push(baseline);
    for script in scripts() {
        let report = run_script(conn, script.as_ref())?;
        on_step(&report);
        reports.push(report);
    }
    Ok(reports)
}

pub fn run_all(conn: &mut PgConnection) -> Result<Vec<StepReport>, MigrationError> {
    run_all_with(conn, |_| {})
}
