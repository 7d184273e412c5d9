use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::error::GatewayError;
use crate::manager::StoreManager;

pub async fn start_server(addr: &str) -> anyhow::Result<()> {
    let manager = Arc::new(StoreManager::new());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, build_router(manager))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assemble the admin API router. Public so integration tests can drive it
/// against an in-process listener.
pub fn build_router(manager: Arc<StoreManager>) -> Router {
    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://admin.your-shop.com" for production
    // If not set, allows any origin (development mode)
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        // Store connection
        .route("/api/store/claim", post(handlers::claim_store_handler))
        .route("/api/store/register", post(handlers::register_store_handler))
        .route(
            "/api/store/check-connection",
            post(handlers::check_connection_handler),
        )
        .route(
            "/api/store/disconnect",
            post(handlers::disconnect_store_handler),
        )
        .route("/api/store/delete", post(handlers::delete_store_handler))
        // Wallet status & connect flows
        .route("/api/wallet/status", get(handlers::wallet_status_handler))
        .route(
            "/api/wallet/crossmark",
            post(handlers::save_crossmark_wallet_handler),
        )
        .route(
            "/api/wallet/disconnect",
            post(handlers::disconnect_wallet_handler),
        )
        .route(
            "/api/wallet/xaman/connect",
            post(handlers::xaman_connect_handler),
        )
        .route("/api/wallet/xaman/poll", post(handlers::xaman_poll_handler))
        .route("/api/wallet/xaman/wait", post(handlers::xaman_wait_handler))
        .route(
            "/api/wallet/xaman/login",
            post(handlers::xaman_login_handler),
        )
        .route(
            "/api/wallet/xaman/poll-login",
            post(handlers::xaman_poll_login_handler),
        )
        .route(
            "/api/wallet/xaman/wait-login",
            post(handlers::xaman_wait_login_handler),
        )
        // Promo codes
        .route("/api/promo/validate", post(handlers::validate_promo_handler))
        .route("/api/promo/apply", post(handlers::apply_promo_handler))
        // Payout configuration
        .route("/api/settings/rates", post(handlers::set_rates_handler))
        .route(
            "/api/settings/payout-mode",
            post(handlers::set_payout_mode_handler),
        )
        .route(
            "/api/settings/batching",
            post(handlers::set_batching_handler),
        )
        .route(
            "/api/settings/tracking",
            post(handlers::set_tracking_handler),
        )
        // Auto-sign policy
        .route(
            "/api/autosign/settings",
            get(handlers::autosign_settings_handler),
        )
        .route("/api/autosign/terms", post(handlers::accept_terms_handler))
        .route("/api/autosign/limits", post(handlers::set_limits_handler))
        .route(
            "/api/autosign/verify",
            post(handlers::verify_autosign_handler),
        )
        .route(
            "/api/autosign/revoke",
            post(handlers::revoke_autosign_handler),
        )
        .layer(middleware::from_fn_with_state(
            manager.clone(),
            require_admin,
        ))
        .layer(cors)
        .with_state(manager)
}

/// Admin capability is checked once at the boundary, not per action.
/// With no ADMIN_TOKEN configured the gateway runs open (development mode).
async fn require_admin(
    State(manager): State<Arc<StoreManager>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(expected) = manager.config.admin_token.as_deref() {
        let provided = req
            .headers()
            .get("x-admin-token")
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            return GatewayError::Unauthorized.into_response();
        }
    }
    next.run(req).await
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
