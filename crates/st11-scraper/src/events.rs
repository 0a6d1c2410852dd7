//! One-directional progress reporting from the crawl worker to the
//! operator surface.
//!
//! The worker owns an [`EventSender`] and emits phase changes, log lines,
//! the final product list, and errors. The surface only listens; the one
//! path back into the worker is the cancellation token it holds. A closed
//! receiver is not an error — the crawl keeps running and events are
//! dropped.

use serde::Serialize;
use st11_core::Product;
use tokio::sync::mpsc;

/// Phases of the crawl state machine, in execution order, plus the three
/// terminal states.
///
/// `Cancelled` is absorbing: it is reachable from every non-terminal phase
/// via the cancellation token, checked at phase boundaries (never
/// preemptively). `Failed` is reached by unhandled errors during browser
/// launch, navigation, or the content wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlPhase {
    Idle,
    Initializing,
    Navigating,
    WaitingForContent,
    Scrolling,
    Extracting,
    Downloading,
    Completed,
    Cancelled,
    Failed,
}

impl CrawlPhase {
    /// Returns `true` for the three states the machine cannot leave.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CrawlPhase::Completed | CrawlPhase::Cancelled | CrawlPhase::Failed
        )
    }
}

impl std::fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CrawlPhase::Idle => "idle",
            CrawlPhase::Initializing => "initializing",
            CrawlPhase::Navigating => "navigating",
            CrawlPhase::WaitingForContent => "waiting for content",
            CrawlPhase::Scrolling => "scrolling",
            CrawlPhase::Extracting => "extracting",
            CrawlPhase::Downloading => "downloading",
            CrawlPhase::Completed => "completed",
            CrawlPhase::Cancelled => "cancelled",
            CrawlPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Notifications flowing from the worker to the surface.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// The state machine moved to a new phase.
    Phase(CrawlPhase),
    /// A human-readable progress line for the log stream.
    Log(String),
    /// The final (or partial, on cancellation) product list, in DOM order.
    Products(Vec<Product>),
    /// A fatal run error, surfaced once.
    Error(String),
    /// The worker is done, whatever the terminal state was.
    Finished,
}

/// Sending half of the crawl event channel.
///
/// All send methods silently drop events if the surface has gone away;
/// the crawl itself never depends on being observed.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<CrawlEvent>,
}

impl EventSender {
    /// Creates the event channel, returning the worker's sending half and
    /// the surface's receiving half.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CrawlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn phase(&self, phase: CrawlPhase) {
        let _ = self.tx.send(CrawlEvent::Phase(phase));
    }

    pub fn log(&self, message: impl Into<String>) {
        let _ = self.tx.send(CrawlEvent::Log(message.into()));
    }

    pub fn products(&self, products: Vec<Product>) {
        let _ = self.tx.send(CrawlEvent::Products(products));
    }

    pub fn error(&self, message: impl Into<String>) {
        let _ = self.tx.send(CrawlEvent::Error(message.into()));
    }

    pub fn finished(&self) {
        let _ = self.tx.send(CrawlEvent::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(CrawlPhase::Completed.is_terminal());
        assert!(CrawlPhase::Cancelled.is_terminal());
        assert!(CrawlPhase::Failed.is_terminal());
        assert!(!CrawlPhase::Scrolling.is_terminal());
        assert!(!CrawlPhase::Idle.is_terminal());
    }

    #[tokio::test]
    async fn events_arrive_in_send_order() {
        let (tx, mut rx) = EventSender::channel();
        tx.phase(CrawlPhase::Initializing);
        tx.log("starting");
        tx.finished();

        assert!(matches!(
            rx.recv().await,
            Some(CrawlEvent::Phase(CrawlPhase::Initializing))
        ));
        assert!(matches!(rx.recv().await, Some(CrawlEvent::Log(ref m)) if m == "starting"));
        assert!(matches!(rx.recv().await, Some(CrawlEvent::Finished)));
    }

    #[tokio::test]
    async fn sending_after_receiver_drop_is_silent() {
        let (tx, rx) = EventSender::channel();
        drop(rx);
        // Must not panic or error out.
        tx.log("nobody listening");
        tx.finished();
    }
}
