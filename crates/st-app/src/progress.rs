//! Coarse progress reporting for long rebuild operations.

/// One progress tick. Callbacks run synchronously on the worker thread and
/// must not block; batch boundaries are the only suspension points the
/// engine exposes.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub current: usize,
    pub total: usize,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>, current: usize, total: usize) -> Self {
        Self {
            message: message.into(),
            current,
            total,
        }
    }
}

pub(crate) fn emit(
    progress_cb: &mut Option<&mut dyn FnMut(ProgressEvent)>,
    message: impl Into<String>,
    current: usize,
    total: usize,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(ProgressEvent::new(message, current, total));
    }
}
