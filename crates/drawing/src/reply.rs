//! Outbound side of a command invocation.

use async_trait::async_trait;

use crate::message::image_marker;

/// A generated image that has been handed to the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredImage {
    /// Opaque reference the chat transport can render (e.g. a `file://` URI).
    pub reference: String,
}

impl DeliveredImage {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// The inline marker form, as used in message bodies.
    pub fn marker(&self) -> String {
        image_marker(&self.reference)
    }
}

/// Where a command sends its replies.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, text: &str) -> anyhow::Result<()>;
    async fn send_image(&self, image: &DeliveredImage) -> anyhow::Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Reply {
        Text(String),
        Image(String),
    }

    /// Records every reply in order.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        replies: Mutex<Vec<Reply>>,
    }

    #[allow(clippy::unwrap_used)]
    impl RecordingSink {
        pub(crate) fn replies(&self) -> Vec<Reply> {
            self.replies.lock().unwrap().clone()
        }

        pub(crate) fn texts(&self) -> Vec<String> {
            self.replies()
                .into_iter()
                .filter_map(|reply| match reply {
                    Reply::Text(text) => Some(text),
                    Reply::Image(_) => None,
                })
                .collect()
        }

        pub(crate) fn last_text(&self) -> String {
            self.texts().pop().unwrap_or_default()
        }
    }

    #[allow(clippy::unwrap_used)]
    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send_text(&self, text: &str) -> anyhow::Result<()> {
            self.replies.lock().unwrap().push(Reply::Text(text.to_string()));
            Ok(())
        }

        async fn send_image(&self, image: &DeliveredImage) -> anyhow::Result<()> {
            self.replies
                .lock()
                .unwrap()
                .push(Reply::Image(image.reference.clone()));
            Ok(())
        }
    }
}
