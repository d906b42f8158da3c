//! TCP accept loop and graceful shutdown.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::server::RelayServer;

use super::connection;

/// Accept connections until `shutdown` fires, spawning one task per socket.
///
/// On shutdown the listener stops accepting; live connections are noted and
/// discarded rather than drained — the relay holds no state worth flushing.
pub async fn serve(
    listener: TcpListener,
    server: Arc<RelayServer>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "Relay listening");

    let tracker = TaskTracker::new();

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        tracker.spawn(connection::handle_connection(
                            stream,
                            addr,
                            server.clone(),
                        ));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Accept failed");
                    }
                }
            }
        }
    }

    tracker.close();
    let live_connections = server.connection_count().await;
    tracing::info!(live_connections, "Listener stopped, discarding live connections");
    Ok(())
}
