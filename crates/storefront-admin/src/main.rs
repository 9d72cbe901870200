use admin_framework::telemetry::setup_tracing;
use admin_framework::Credentials;
use std::env;
use storefront_admin::config::AdminConfig;
use storefront_admin::lifecycle::AdminSystem;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    setup_tracing();

    let config = AdminConfig::from_env();
    info!(api_url = %config.api_url, "Starting storefront admin");

    let system = AdminSystem::new(config).map_err(|e| e.to_string())?;
    system.init().await;

    if !system.session.is_authenticated() {
        match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => {
                let span = tracing::info_span!("login", %email);
                let outcome = system
                    .session
                    .login(Credentials::new(email, password))
                    .instrument(span)
                    .await;
                if let Some(message) = outcome.error {
                    error!(error = %message, "Login failed");
                }
            }
            _ => warn!("Not logged in; set ADMIN_EMAIL and ADMIN_PASSWORD to log in"),
        }
    }

    if let Some(user) = system.session.session().user {
        info!(name = %user.name, role = %user.role, "Session ready");
        system.touch();

        let table = system.product_table();
        match table.fetch().await {
            Ok(_) => {
                let page = table.snapshot();
                info!(
                    shown = page.items.len(),
                    total = page.pagination.total,
                    pages = page.pagination.total_pages,
                    "Products"
                );
                for product in &page.items {
                    info!(
                        id = %product.id,
                        name = %product.name,
                        stock = product.stock,
                        price = product.price,
                        "Product"
                    );
                }
            }
            Err(e) => error!(error = %e.display_message(), "Could not load products"),
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Storefront admin stopped");
    Ok(())
}
