//! Subscription handle
//!
//! Returned by every change-feed or cue registration. Dropping the handle
//! unsubscribes, so teardown happens on every exit path.

use std::fmt;

pub struct Subscription {
    label: String,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: impl Into<String>, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            label: label.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Explicit form of dropping the handle
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            log::debug!("unsubscribing {}", self.label);
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
