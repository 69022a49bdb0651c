//! S3Mock server: a local S3-compatible emulator.
//!
//! # Usage
//!
//! ```text
//! PORT=7000 s3mock-server
//! s3mock-server --health-check
//! ```
//!
//! Configuration is read from the environment; see
//! [`S3MockConfig::from_env`](s3mock_core::S3MockConfig::from_env) for the
//! full variable list. `RUST_LOG` overrides `LOG_LEVEL`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use s3mock_core::{InMemoryStorage, S3MockConfig, S3Provider, StorageBackend, ready_pair};
use s3mock_http::{S3HttpConfig, S3HttpService};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

type Service = S3HttpService<S3Provider<InMemoryStorage>>;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the service and start backend initialization in the background.
///
/// Requests arriving before initialization completes wait on the ready gate.
fn build_service(config: &S3MockConfig) -> Service {
    let storage = Arc::new(InMemoryStorage::new());
    let (notifier, gate) = ready_pair();

    let backend = Arc::clone(&storage);
    tokio::spawn(async move {
        match backend.initialize().await {
            Ok(()) => notifier.notify_ready(),
            Err(e) => error!(error = %e, "storage backend failed to initialize"),
        }
    });

    let provider = S3Provider::new(storage, gate, config.policy_authorizer());
    S3HttpService::new(provider, S3HttpConfig::from(config))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: Service) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }
            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Request the health endpoint of a running server.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;
    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Address to probe for a given listen address.
fn probe_addr(listen_addr: &str) -> String {
    listen_addr.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = S3MockConfig::from_env();

    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&probe_addr(&config.gateway_listen))
            .await
            .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    info!(
        s3_domain = %config.s3_domain,
        s3_virtual_hosting = config.s3_virtual_hosting,
        s3_skip_signature_validation = config.s3_skip_signature_validation,
        access_key_id = %config.access_key_id,
        "initializing S3Mock",
    );

    let service = build_service(&config);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting S3Mock server");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_probe_loopback_for_wildcard_listen_address() {
        assert_eq!(probe_addr("0.0.0.0:7000"), "127.0.0.1:7000");
        assert_eq!(probe_addr("10.0.0.5:9000"), "10.0.0.5:9000");
    }

    #[tokio::test]
    async fn test_should_serve_health_check_over_tcp() {
        let config = S3MockConfig::default();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr").to_string();

        tokio::select! {
            result = serve(listener, build_service(&config)) => {
                panic!("server stopped early: {result:?}");
            }
            result = run_health_check(&addr) => result.expect("healthy server"),
        }
    }

    #[tokio::test]
    async fn test_should_fail_health_check_without_server() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr").to_string();
        drop(listener);

        assert!(run_health_check(&addr).await.is_err());
    }
}
