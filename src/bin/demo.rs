//! Connects to the server named in `IIKOSERVER_CONFIG`, lists a few
//! reference types, and releases the session.

use iikoserver_api::{ClientRegistry, IikoServerConfig, IikoServerResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> IikoServerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = IikoServerConfig::load()?;
    info!(host = %config.host, login = %config.login, "connecting");

    let registry = ClientRegistry::new();
    let client = registry.get_or_create_from_config(&config).await?;

    let order_types = client.get_order_types_list(false).await?;
    info!("order types: {}", order_types.len());
    for entity in &order_types {
        info!("  {} ({})", entity.name, entity.id);
    }

    let payment_types = client.get_payment_types_list(false).await?;
    info!("payment types: {}", payment_types.len());

    let groups = client.get_root_product_groups(false).await?;
    info!("root product groups: {}", groups.len());

    // Releases the license seat; skipping this leaves the session occupied
    // until server-side expiry.
    registry.close_all().await;
    Ok(())
}
