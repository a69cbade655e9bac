//! Toast notifications.
//!
//! Pages and the request wrapper push [`Toast`]s; whatever renders the UI
//! (the MCP server, in this crate) drains them after each action.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Shared queue of pending toasts. Clones push to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Toaster {
    queue: Arc<Mutex<Vec<Toast>>>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, toast: Toast) {
        tracing::debug!("Toast: {} - {}", toast.title, toast.description);
        self.queue().push(toast);
    }

    pub fn toast(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Toast::info(title, description));
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue())
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    pub fn last(&self) -> Option<Toast> {
        self.queue().last().cloned()
    }
}
