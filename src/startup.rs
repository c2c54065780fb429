use crate::cache::QueryCache;
use crate::catchers::*;
use crate::configuration::Settings;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use crate::views::Templates;
use rocket::{Ignite, Rocket};
use rocket_sync_db_pools::database;
use secrecy::ExposeSecret;

#[database("fundraiser_db")]
pub struct FundraiserDbConn(diesel::PgConnection);

/// JSON read cache keyed by endpoint path, shared by the API and the pages.
pub type ApiCache = QueryCache<serde_json::Value>;

/// How long a login stays valid.
pub struct SessionPolicy {
    pub ttl: chrono::Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Failed to compile the page templates")]
    Templates(#[from] tera::Error),
    #[error("Failed to build the server")]
    Server(#[from] rocket::Error),
}

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Application, StartupError> {
        let (port_saver, port) = port_saver::create_pair();
        let figment = rocket::Config::figment()
            .merge(("address", configuration.application.host))
            .merge(("port", configuration.application.port.unwrap_or(0)))
            .merge((
                "databases.fundraiser_db.url",
                configuration.database.connection_string().expose_secret().clone(),
            ))
            .merge((
                "databases.fundraiser_db.pool_size",
                configuration.database.pool_size,
            ));
        let templates = Templates::new()?;

        let server = rocket::custom(figment)
            .attach(FundraiserDbConn::fairing())
            .attach(port_saver)
            .manage(ApiCache::new())
            .manage(templates)
            .manage(SessionPolicy {
                ttl: chrono::Duration::hours(configuration.application.session_ttl_hours),
            })
            .mount(
                "/",
                routes![
                    health_check,
                    register,
                    login,
                    login_form,
                    logout,
                    logout_form,
                    user_info,
                    sales_summary,
                    school_fundraisers,
                    create_fundraiser,
                    set_fundraiser_active,
                    school_students,
                    admin_overview,
                    admin_schools,
                    update_school,
                    admin_students,
                    student_fundraisers,
                    join_fundraiser,
                    list_notifications,
                    create_notification,
                    mark_notification_read,
                    page,
                ],
            )
            .register(
                "/",
                catchers![
                    unauthorized_as_json,
                    forbidden_as_json,
                    not_found_page,
                    unprocessable_entity_to_bad_request
                ],
            )
            .ignite()
            .await?;
        Ok(Application { server, port })
    }
}
