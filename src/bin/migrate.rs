//! Brings the database named by `DATABASE_URL` up to date.
//!
//! Prints one line per step and exits non-zero on the first failure.

use diesel::{Connection, PgConnection};
use fundraiser::configuration::database_url_from_env;
use fundraiser::migrations::{run_all_with, StepReport};
use fundraiser::telemetry::{get_subscriber, init_subscriber};
use secrecy::ExposeSecret;
use std::process::ExitCode;

fn main() -> ExitCode {
    let subscriber = get_subscriber("migrate".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber);

    let database_url = match database_url_from_env() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut conn = match PgConnection::establish(database_url.expose_secret()) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("error: failed to connect to the database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Running migrations...");
    let result = run_all_with(&mut conn, |step: &StepReport| {
        println!("  {}", step);
    });
    drop(conn);

    match result {
        Ok(steps) => {
            println!("Done ({} step(s)).", steps.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
