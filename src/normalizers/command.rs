//! CLI command normalizers.
//!
//! The command tag is applied whenever a named command starts, independent of the
//! flags; breadcrumbs are gated by `record_queue_info`.

use std::sync::Arc;

use super::{unexpected, Effect, Handler, Outcome};
use crate::breadcrumbs::{Breadcrumb, Category};
use crate::config::RecorderFlags;
use crate::events::{CommandInput, Payload};
use crate::transport::FlushReason;

pub(super) fn command_starting(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    let Payload::CommandStarting(ev) = payload else {
        return Err(unexpected(Handler::CommandStarting, "command_starting", payload));
    };
    let Some(command) = named(&ev.command) else {
        return Ok(Vec::new());
    };

    let mut effects = vec![Effect::TagCommand(Some(command.to_string()))];
    if flags.record_queue_info {
        let crumb = Breadcrumb::new(Category::Command)
            .with_message(format!("Starting command: {command}"))
            .with_data("command", command)
            .with_optional("input", rendered(&ev.input));
        effects.push(Effect::Record(crumb));
    }
    Ok(effects)
}

pub(super) fn command_finished(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    let Payload::CommandFinished(ev) = payload else {
        return Err(unexpected(Handler::CommandFinished, "command_finished", payload));
    };

    let mut effects = Vec::with_capacity(3);
    if let (Some(command), true) = (named(&ev.command), flags.record_queue_info) {
        let crumb = Breadcrumb::new(Category::Command)
            .with_message(format!("Finished command: {command}"))
            .with_data("command", command)
            .with_data("exit", ev.exit_code)
            .with_optional("input", rendered(&ev.input));
        effects.push(Effect::Record(crumb));
    }
    effects.push(Effect::TagCommand(None));
    effects.push(Effect::Flush(FlushReason::CommandFinished));
    Ok(effects)
}

fn named(command: &Option<String>) -> Option<&str> {
    command.as_deref().filter(|c| !c.is_empty())
}

fn rendered(input: &Option<Arc<dyn CommandInput>>) -> Option<String> {
    input.as_ref().and_then(|i| i.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CommandFinished, CommandStarting};

    struct Opaque;
    impl CommandInput for Opaque {}

    fn starting(command: Option<&str>, input: Option<Arc<dyn CommandInput>>) -> Payload {
        Payload::CommandStarting(CommandStarting {
            command: command.map(str::to_string),
            input,
        })
    }

    #[test]
    fn test_starting_tags_and_records() {
        let input: Arc<dyn CommandInput> = Arc::new("migrate --force".to_string());
        let effects = command_starting(&RecorderFlags::default(), &starting(Some("migrate"), Some(input)))
            .unwrap();

        assert_eq!(effects[0], Effect::TagCommand(Some("migrate".to_string())));
        let Effect::Record(crumb) = &effects[1] else {
            panic!("expected a record");
        };
        assert_eq!(crumb.category, Category::Command);
        assert_eq!(crumb.data["command"], "migrate");
        assert_eq!(crumb.data["input"], "migrate --force");
    }

    #[test]
    fn test_input_without_rendering_is_omitted() {
        let input: Arc<dyn CommandInput> = Arc::new(Opaque);
        let effects = command_starting(&RecorderFlags::default(), &starting(Some("queue:work"), Some(input)))
            .unwrap();
        let Effect::Record(crumb) = &effects[1] else {
            panic!("expected a record");
        };
        assert!(!crumb.data.contains_key("input"));
    }

    #[test]
    fn test_unnamed_command_is_ignored() {
        let flags = RecorderFlags::default();
        assert!(command_starting(&flags, &starting(None, None)).unwrap().is_empty());
        assert!(command_starting(&flags, &starting(Some(""), None)).unwrap().is_empty());
    }

    #[test]
    fn test_disabled_only_tags() {
        let flags = RecorderFlags {
            record_queue_info: false,
            ..RecorderFlags::default()
        };
        let effects = command_starting(&flags, &starting(Some("migrate"), None)).unwrap();
        assert_eq!(effects, vec![Effect::TagCommand(Some("migrate".to_string()))]);
    }

    #[test]
    fn test_finished_records_exit_and_flushes() {
        let payload = Payload::CommandFinished(CommandFinished {
            command: Some("migrate".to_string()),
            input: None,
            exit_code: 3,
        });
        let effects = command_finished(&RecorderFlags::default(), &payload).unwrap();

        assert_eq!(effects.len(), 3);
        let Effect::Record(crumb) = &effects[0] else {
            panic!("expected a record");
        };
        assert_eq!(crumb.data["exit"], 3);
        assert_eq!(crumb.message.as_deref(), Some("Finished command: migrate"));
        assert_eq!(effects[1], Effect::TagCommand(None));
        assert_eq!(effects[2], Effect::Flush(FlushReason::CommandFinished));
    }
}
