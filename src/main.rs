use fundraiser::configuration::get_configuration;
use fundraiser::startup::{Application, StartupError};
use fundraiser::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> Result<(), StartupError> {
    let subscriber = get_subscriber("fundraiser".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(&configuration).await?;
    application.server.launch().await?;
    Ok(())
}
