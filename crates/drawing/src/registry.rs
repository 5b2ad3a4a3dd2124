//! Explicit command table, built at startup and handed to the host.

use std::{collections::HashMap, sync::Arc};

use {
    async_trait::async_trait,
    tracing::{debug, warn},
};

use crate::{message::skip_leading_markers, reply::ReplySink};

/// Characters that introduce a command.
pub const COMMAND_PREFIXES: [char; 2] = ['.', '/'];

/// One invocation's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Registered name that matched.
    pub command: String,
    /// The whole message, image markers included.
    pub raw_message: String,
    /// Text after the command token, trimmed.
    pub args: String,
}

/// Exit signal reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failure,
    /// The registry replies with the handler's help text.
    ShowHelp,
}

impl CommandOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Failure)
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &str;
    fn help(&self) -> &str;
    async fn handle(&self, ctx: &CommandContext, sink: &dyn ReplySink) -> CommandOutcome;
}

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler under its own name, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Find the command in `raw_message` and split off its arguments.
    ///
    /// The token may follow inline images. The longest registered name
    /// wins, and it must end at whitespace, an image marker, or the end of
    /// the message.
    pub fn parse(&self, raw_message: &str) -> Option<CommandContext> {
        let body = skip_leading_markers(raw_message).strip_prefix(COMMAND_PREFIXES)?;

        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));

        names.into_iter().find_map(|name| {
            let rest = body.strip_prefix(name.as_str())?;
            let at_boundary = rest
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c == '[');
            at_boundary.then(|| CommandContext {
                command: name.clone(),
                raw_message: raw_message.to_string(),
                args: rest.trim().to_string(),
            })
        })
    }

    /// Run the command named in `raw_message`, if any.
    ///
    /// Returns `None` when the message is not a registered command.
    pub async fn dispatch(&self, raw_message: &str, sink: &dyn ReplySink) -> Option<CommandOutcome> {
        let ctx = self.parse(raw_message)?;
        let handler = self.handlers.get(&ctx.command)?;
        debug!(command = %ctx.command, args_len = ctx.args.len(), "dispatching command");

        let outcome = handler.handle(&ctx, sink).await;
        if outcome == CommandOutcome::ShowHelp
            && let Err(e) = sink.send_text(handler.help()).await
        {
            warn!(command = %ctx.command, error = %e, "failed to send help text");
        }
        Some(outcome)
    }
}
