use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// User-facing side channel. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Error(message) => message,
        }
    }
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("✅ {}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!("⚠️ {}", message);
    }
}

/// Forwards notices to whoever holds the receiver (a UI task, a test)
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notice: Notice) {
        // Receiver gone means nobody is listening anymore
        let _ = self.tx.send(notice);
    }
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        self.send(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.send(Notice::Error(message.to_string()));
    }
}
