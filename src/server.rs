//! Server loop: serve until ctrl-c/SIGTERM, or until a create failure is escalated.

use crate::error::ServeError;
use crate::fault::{Fault, FaultReceiver};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub async fn serve(listener: TcpListener, app: Router, mut faults: FaultReceiver) -> Result<(), ServeError> {
    let (fault_tx, mut fault_rx) = oneshot::channel::<Fault>();
    let shutdown = async move {
        tokio::select! {
            fault = next_fault(&mut faults) => {
                tracing::error!(%fault, "shutting down on escalated fault");
                let _ = fault_tx.send(fault);
            }
            _ = shutdown_signal() => {
                tracing::info!("shutdown signal received");
            }
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    match fault_rx.try_recv() {
        Ok(fault) => Err(ServeError::Fault(fault)),
        Err(_) => Ok(()),
    }
}

async fn next_fault(faults: &mut FaultReceiver) -> Fault {
    match faults.recv().await {
        Some(fault) => fault,
        None => std::future::pending().await,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
