//! Keeps a session alive: reconnects after any failure until shutdown.

use std::{any::Any, panic::AssertUnwindSafe, time::Duration};

use futures::FutureExt;
use log::{debug, error, info};
use tokio_util::sync::CancellationToken;

use crate::backend::Connector;
use crate::commands::BotContext;
use crate::error::{BotError, SessionError};
use crate::session::{SessionRuntime, SessionSettings};

/// What happened over the supervisor's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    /// Sessions that ended in a handshake failure or a fault. Each one is logged.
    pub failures: usize,
    /// Cooldowns started before reconnecting.
    pub retries: usize,
}

/// Retries forever with a fixed cooldown; only a shutdown request ends it.
pub struct Supervisor<C: Connector> {
    connector: C,
    ctx: BotContext,
    settings: SessionSettings,
    retry_cooldown: Duration,
}

impl<C: Connector> Supervisor<C> {
    pub fn new(
        connector: C,
        ctx: BotContext,
        settings: SessionSettings,
        retry_cooldown: Duration,
    ) -> Self {
        Self {
            connector,
            ctx,
            settings,
            retry_cooldown,
        }
    }

    /// Run sessions back to back until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: &CancellationToken) -> SupervisorReport {
        let mut report = SupervisorReport::default();

        while !shutdown.is_cancelled() {
            let runtime = SessionRuntime::new(&self.connector, &self.ctx, &self.settings, shutdown);
            let outcome = AssertUnwindSafe(runtime.run())
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(SessionError::Fault(BotError::Panic(panic_message(&*panic))))
                });

            match outcome {
                Ok(()) => break,
                Err(SessionError::Handshake(e)) => error!("Initial connection failed: {e}"),
                Err(SessionError::Fault(e)) => error!("Encountered exception: {e}"),
            }
            report.failures += 1;

            if shutdown.is_cancelled() {
                break;
            }

            report.retries += 1;
            info!(
                "Trying again in {} seconds...",
                self.retry_cooldown.as_secs_f32()
            );
            tokio::select! {
                () = shutdown.cancelled() => {}
                () = tokio::time::sleep(self.retry_cooldown) => {}
            }
        }

        info!("Bot stopped.");
        info!(
            "Bot was up for about {} seconds.",
            self.ctx.uptime_seconds()
        );
        debug!(
            "Supervisor saw {} failures and {} retries",
            report.failures, report.retries
        );
        report
    }

    #[cfg(test)]
    pub(crate) fn connector(&self) -> &C {
        &self.connector
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
