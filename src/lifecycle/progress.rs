//! Background progress indicator.
//!
//! The indicator is a spawned task listening on a one-shot stop channel.
//! `finish` signals and joins it; dropping an unfinished indicator still
//! signals, so the line is cleared on every exit path.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: [&str; 6] = ["⣟", "⣯", "⣷", "⣾", "⣽", "⣻"];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running indicator.
pub struct ProgressIndicator {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressIndicator {
    /// Draw on stderr when it is a terminal; otherwise draw nothing.
    pub fn start(message: impl Into<String>) -> Self {
        let stderr = io::stderr();
        if stderr.is_terminal() {
            Self::start_with_writer(message, stderr)
        } else {
            Self::start_with_writer(message, io::sink())
        }
    }

    /// Draw frames to `writer` until stopped.
    pub fn start_with_writer<W>(message: impl Into<String>, mut writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let message = message.into();
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut frame = 0;

            loop {
                tokio::select! {
                    // A dropped sender also ends the loop.
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let _ = write!(writer, "\r{} {} ", message, FRAMES[frame]);
                        let _ = writer.flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                }
            }

            let blank = " ".repeat(message.chars().count() + 3);
            let _ = write!(writer, "\r{}\r", blank);
            let _ = writer.flush();
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the indicator to stop and wait for it to clear its line.
    pub async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "Progress indicator task ended abnormally");
            }
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Run `future` under an indicator on stderr.
pub async fn with_progress<F, T>(message: impl Into<String>, future: F) -> T
where
    F: Future<Output = T>,
{
    run_with_indicator(ProgressIndicator::start(message), future).await
}

/// Run `future`, then stop and join `indicator` whatever the outcome.
pub async fn run_with_indicator<F, T>(indicator: ProgressIndicator, future: F) -> T
where
    F: Future<Output = T>,
{
    let output = future.await;
    indicator.finish().await;
    output
}
