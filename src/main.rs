use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use userdesk::api;
use userdesk::logger::*;
use userdesk::server::*;
use userdesk::settings::*;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.apply(&project_settings.log)?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    let tls = match (
        &project_settings.http.cert_path,
        &project_settings.http.key_path,
    ) {
        (Some(cert_path), Some(key_path)) => {
            for path in [cert_path, key_path] {
                if !fs::metadata(path)?.is_file() {
                    return Err(anyhow::anyhow!(
                        "TLS cert/key is not a regular file: {:?}",
                        path
                    ));
                }
            }
            Some((cert_path.clone(), key_path.clone()))
        }
        (None, None) => None,
        _ => {
            return Err(anyhow::anyhow!(
                "http.cert_path and http.key_path must be set together"
            ));
        }
    };

    let server = Arc::new(Server::try_new(&project_settings).await?);

    let static_dir = project_settings.http.static_dir.clone().map(PathBuf::from);
    let service = api::v1::routes(server.clone())
        .or(api::v1::assets(static_dir))
        .recover(api::v1::recover_error)
        .with(warp::trace::request());

    info!(%address, tls = tls.is_some(), "listening");
    match tls {
        Some((cert_path, key_path)) => {
            warp::serve(service)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .bind_with_graceful_shutdown(address, shutdown_signal())
                .1
                .await
        }
        None => {
            warp::serve(service)
                .bind_with_graceful_shutdown(address, shutdown_signal())
                .1
                .await
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(10);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Could not register SIGINT: {}", e);
    }
}
