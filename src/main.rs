use anyhow::Context;
use campaign_manager::{app::App, config::get_configuration, console, telemetry::get_subscriber};
use tokio::io::BufReader;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("Failed to read configuration.")?;

    get_subscriber(&config.log_level, std::io::stderr).init();

    let mut app = App::build(&config).context("Could not build the backend client")?;

    tracing::info!(backend = %config.backend.base_url, "starting campaign session");
    console::run(&mut app, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    Ok(())
}
