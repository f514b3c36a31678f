//! OS signal handling that turns SIGINT/SIGTERM into a cancelled token.

use log::{debug, warn};
use strum::Display;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShutdownSignal {
    #[strum(to_string = "SIGINT")]
    Interrupt,
    #[strum(to_string = "SIGTERM")]
    Terminate,
}

/// Record a received signal and request shutdown. Safe to call any number of times.
pub fn request_shutdown(signal: ShutdownSignal, shutdown: &CancellationToken) {
    warn!("Received {signal} signal.");
    shutdown.cancel();
}

/// Listen for SIGINT and SIGTERM in the background and cancel `shutdown` on each.
///
/// # Errors
///
/// Returns an error if a signal handler cannot be registered.
#[cfg(unix)]
pub fn install(shutdown: CancellationToken) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    debug!("Installed SIGINT and SIGTERM handlers");

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = interrupt.recv() => ShutdownSignal::Interrupt,
                Some(()) = terminate.recv() => ShutdownSignal::Terminate,
                else => break,
            };
            request_shutdown(received, &shutdown);
        }
    }))
}

/// Listen for Ctrl+C in the background and cancel `shutdown` on each.
///
/// # Errors
///
/// Never fails on this platform; the signature matches the unix variant.
#[cfg(not(unix))]
pub fn install(shutdown: CancellationToken) -> Result<JoinHandle<()>> {
    debug!("Installed Ctrl+C handler");

    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            request_shutdown(ShutdownSignal::Interrupt, &shutdown);
        }
    }))
}
