//! Clean exit on SIGINT/SIGTERM once the run configuration is known.

use tokio::signal::unix::{signal, SignalKind};

use super::context::{RunContext, RunReport};

pub struct ShutdownHandler {
    report: RunReport,
}

impl ShutdownHandler {
    pub fn new(ctx: &RunContext) -> Self {
        Self {
            report: ctx.report.clone(),
        }
    }

    /// Resolves with the signal name. Listeners are installed on first poll.
    pub async fn wait(&self) -> &'static str {
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("SIGTERM listener: {}", e);
                return self.wait_interrupt().await;
            }
        };
        tokio::select! {
            name = self.wait_interrupt() => name,
            _ = terminate.recv() => "SIGTERM",
        }
    }

    async fn wait_interrupt(&self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::warn!("SIGINT listener: {}", e);
                std::future::pending().await
            }
        }
    }

    pub fn exit_line(&self) -> String {
        self.report.exit_line()
    }

    pub fn shutdown(&self, signal_name: &str) -> ! {
        tracing::debug!("received {}", signal_name);
        tracing::info!("{}", self.exit_line());
        std::process::exit(0)
    }
}
