//! Backend entry-point: loads configuration, builds the connection pool, and
//! serves the account API.

mod server;

use accounts::inbound::http::health::HealthState;
use accounts::outbound::persistence::DbPool;
use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, BuildMode, ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_env(&DefaultEnv::new(), BuildMode::current())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let AppSettings {
        database,
        bind_addr,
        session,
    } = settings;

    let pool = DbPool::new(database)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(session, bind_addr, pool))?;
    info!(%bind_addr, "accounts server listening");
    server.await
}
