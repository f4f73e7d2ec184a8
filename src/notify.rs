use parking_lot::Mutex;
use std::sync::Arc;

/// ToastLevel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// Toast
///
/// One user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Notifier
///
/// The fire-and-forget notification channel. Implementations must not fail and
/// must not block: a toast that cannot be shown is simply dropped.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}

/// NotifierState
pub type NotifierState = Arc<dyn Notifier>;

/// ToastQueue
///
/// Buffers toasts until the front-end drains them. The terminal shell drains it
/// after every command; tests drain it to assert on what the user would have seen.
#[derive(Clone, Default)]
pub struct ToastQueue {
    pending: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        tracing::debug!(level = ?toast.level, text = %toast.message, "Toast queued");
        self.pending.lock().push(toast);
    }
}
