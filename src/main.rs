use std::net::SocketAddr;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;

use fbs_api::{create_app, db, docs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let port = std::env::var("APP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8000);

    let pool = db::init().await?;
    let app = create_app(pool)
        .await?
        .merge(docs::swagger_routes(docs::build_openapi(port)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    match tls_paths() {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(&cert, &key)
                .await
                .with_context(|| format!("failed to load TLS certificate {cert} / key {key}"))?;
            tracing::info!(%addr, "listening with TLS");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(%addr, "listening");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

/// Both `TLS_CERT_PATH` and `TLS_KEY_PATH` must be set to serve HTTPS.
fn tls_paths() -> Option<(String, String)> {
    let cert = std::env::var("TLS_CERT_PATH").ok().filter(|v| !v.trim().is_empty());
    let key = std::env::var("TLS_KEY_PATH").ok().filter(|v| !v.trim().is_empty());

    match (cert, key) {
        (Some(cert), Some(key)) => Some((cert, key)),
        (None, None) => None,
        _ => {
            tracing::warn!("only one of TLS_CERT_PATH / TLS_KEY_PATH is set; serving plain HTTP");
            None
        }
    }
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
