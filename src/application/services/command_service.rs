use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::messaging::TriggerMatcher;
use crate::domain::entities::{
    Command, CommandRegistry, Event, Invocation, RawReply, ReplyItem, Source,
};
use crate::domain::traits::{Commander, LifecycleEvent};

/// Lifecycle hook function type
pub type EventHook = Arc<dyn Fn(&Event) -> Result<Option<RawReply>, CommandError> + Send + Sync>;

/// Service for managing and executing commands and lifecycle hooks
pub struct CommandService {
    registry: CommandRegistry,
    hooks: HashMap<LifecycleEvent, Vec<EventHook>>,
    trigger: TriggerMatcher,
    bot_name: String,
}

impl CommandService {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            hooks: HashMap::new(),
            trigger: TriggerMatcher::new(),
            bot_name: bot_name.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Register a hook for a lifecycle event. Hooks run in registration order.
    pub fn register_hook<F>(&mut self, lifecycle: LifecycleEvent, hook: F)
    where
        F: Fn(&Event) -> Result<Option<RawReply>, CommandError> + Send + Sync + 'static,
    {
        self.hooks.entry(lifecycle).or_default().push(Arc::new(hook));
    }

    pub fn register_defaults(&mut self) {
        // Help is answered by the service itself, it needs the registry
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage(">>>help [command]"));

        let version = format!("{} v{}", self.bot_name, env!("CARGO_PKG_VERSION"));
        self.register(Command::new("version")
            .with_description("Show bot version")
            .with_handler(move |_| Ok(Some(RawReply::text(version.clone())))));
    }

    pub fn get_help(&self, command: Option<&str>) -> RawReply {
        if let Some(name) = command {
            let Some(cmd) = self.registry.find(name) else {
                return RawReply::text(format!("Command <strong>{}</strong> not found", name));
            };

            let mut lines = vec![format!(
                "<strong>{}</strong> - {}",
                cmd.name,
                cmd.description.as_deref().unwrap_or("No description")
            )];
            if let Some(usage) = &cmd.usage {
                lines.push(format!("Usage: {}", usage));
            }
            return RawReply::Sequence(lines.into_iter().map(ReplyItem::PlainText).collect());
        }

        let names: Vec<&str> = self.registry.all().iter().map(|c| c.name.as_str()).collect();
        RawReply::text(format!("Available commands: <strong>{}</strong>", names.join(", ")))
    }

    fn parse(&self, command: &str, source: &Source, public: bool) -> Result<Invocation, CommandError> {
        let text = self.trigger.strip(command).unwrap_or(command);
        let mut parts = text.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CommandError::InvalidArgs("empty command".to_string()))?;

        Ok(Invocation {
            name: name.to_string(),
            args: parts.map(String::from).collect(),
            source: source.clone(),
            public,
        })
    }
}

#[async_trait]
impl Commander for CommandService {
    async fn execute(
        &self,
        command: &str,
        source: &Source,
        public: bool,
    ) -> Result<Option<RawReply>, CommandError> {
        let invocation = self.parse(command, source, public)?;

        let cmd = self.registry.find(&invocation.name)
            .ok_or_else(|| CommandError::NotFound(invocation.name.clone()))?;

        if cmd.name == "help" {
            return Ok(Some(self.get_help(invocation.args.first().map(String::as_str))));
        }

        let Some(handler) = cmd.handler.clone() else {
            return Ok(Some(RawReply::text(format!("Command {} not implemented", cmd.name))));
        };

        // Handlers are synchronous; run them off the async workers so the
        // caller's timeout can still fire
        tokio::task::spawn_blocking(move || handler(&invocation))
            .await
            .map_err(|e| CommandError::ExecutionFailed(format!("Command task failed: {}", e)))?
    }

    async fn event(
        &self,
        lifecycle: LifecycleEvent,
        event: &Event,
    ) -> Result<Option<RawReply>, CommandError> {
        let Some(hooks) = self.hooks.get(&lifecycle).cloned() else {
            return Ok(None);
        };

        let event = event.clone();
        let results = tokio::task::spawn_blocking(move || {
            hooks.iter().map(|hook| hook(&event)).collect::<Vec<_>>()
        })
        .await
        .map_err(|e| CommandError::ExecutionFailed(format!("Hook task failed: {}", e)))?;

        let mut replies = Vec::new();
        for result in results {
            match result {
                Ok(Some(reply)) => replies.push(reply),
                Ok(None) => {}
                Err(e) => tracing::warn!("Hook for \"{}\" failed: {}", lifecycle.as_str(), e),
            }
        }
        Ok(RawReply::concat(replies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EventKind;
    use std::time::{Duration, Instant};

    fn source() -> Source {
        Source::new("alice", "example.org")
    }

    fn service() -> CommandService {
        let mut service = CommandService::new("nano");
        service.register_defaults();
        service
    }

    #[tokio::test]
    async fn test_execute_strips_trigger_and_passes_args() {
        let mut service = service();
        service.register(Command::new("echo").with_handler(|inv| {
            Ok(Some(RawReply::text(format!("{}:{}", inv.source.nick, inv.args.join(" ")))))
        }));

        let reply = service.execute(">>> echo a b", &source(), true).await.expect("runs");
        assert_eq!(reply, Some(RawReply::text("alice:a b")));

        let reply = service.execute("ECHO c", &source(), false).await.expect("runs");
        assert_eq!(reply, Some(RawReply::text("alice:c")));
    }

    #[tokio::test]
    async fn test_execute_unknown_command() {
        let result = service().execute(">>>nope", &source(), true).await;
        assert!(matches!(result, Err(CommandError::NotFound(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let reply = service().execute(">>>help", &source(), true).await.expect("runs");
        assert_eq!(
            reply,
            Some(RawReply::text("Available commands: <strong>help, version</strong>"))
        );
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let reply = service().execute(">>>help help", &source(), true).await.expect("runs");
        let Some(RawReply::Sequence(items)) = reply else {
            panic!("expected a sequence");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], ReplyItem::PlainText("Usage: >>>help [command]".to_string()));
    }

    #[tokio::test]
    async fn test_event_concatenates_hook_replies() {
        let mut service = service();
        service.register_hook(LifecycleEvent::Join, |e| {
            Ok(Some(RawReply::text(format!("welcome {}", e.source.nick))))
        });
        service.register_hook(LifecycleEvent::Join, |_| {
            Err(CommandError::ExecutionFailed("broken hook".to_string()))
        });
        service.register_hook(LifecycleEvent::Join, |_| Ok(Some(RawReply::text("second"))));

        let event = Event::new(EventKind::Join, source(), "#nano");
        let reply = service.event(LifecycleEvent::Join, &event).await.expect("runs");

        assert_eq!(
            reply,
            Some(RawReply::Sequence(vec![
                ReplyItem::PlainText("welcome alice".to_string()),
                ReplyItem::PlainText("second".to_string()),
            ]))
        );
    }

    #[tokio::test]
    async fn test_blocking_handler_does_not_stall_timeout() {
        let mut service = service();
        service.register(Command::new("slow").with_handler(|_| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Some(RawReply::text("too late")))
        }));

        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            service.execute(">>>slow", &source(), true),
        )
        .await;

        assert!(result.is_err(), "execute should not finish before the timeout");
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_execution_failure() {
        let mut service = service();
        service.register(Command::new("boom").with_handler(|_| panic!("handler bug")));

        let result = service.execute(">>>boom", &source(), true).await;
        assert!(matches!(result, Err(CommandError::ExecutionFailed(_))));
    }

    #[tokio::test]
    async fn test_event_without_hooks_is_none() {
        let event = Event::new(EventKind::Quit, source(), "");
        let reply = service().event(LifecycleEvent::Quit, &event).await.expect("runs");
        assert_eq!(reply, None);
    }
}
