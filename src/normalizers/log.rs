//! Message-logged normalizer.

use serde_json::{Map, Value};

use super::{args, unexpected, Effect, Handler, Outcome};
use crate::breadcrumbs::{Breadcrumb, Category, Level};
use crate::config::RecorderFlags;
use crate::events::Payload;

struct LogEntry {
    level: String,
    message: String,
    context: Map<String, Value>,
}

/// Legacy shape: `[level, message, context?]`.
pub(super) fn log(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    if !flags.record_logs {
        return Ok(Vec::new());
    }
    let Payload::Args(a) = payload else {
        return Err(unexpected(Handler::Log, "args", payload));
    };

    let entry = LogEntry {
        level: args::string(Handler::Log, a, 0, "level")?,
        message: args::string(Handler::Log, a, 1, "message")?,
        context: args::object_or_empty(a.get(2)),
    };
    Ok(normalize(entry))
}

pub(super) fn message_logged(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    if !flags.record_logs {
        return Ok(Vec::new());
    }
    match payload {
        Payload::MessageLogged(ev) => Ok(normalize(LogEntry {
            level: ev.level.clone(),
            message: ev.message.clone(),
            context: args::object_or_empty(Some(&ev.context)),
        })),
        other => Err(unexpected(Handler::MessageLogged, "message_logged", other)),
    }
}

fn normalize(entry: LogEntry) -> Vec<Effect> {
    let level = entry.level.parse::<Level>().unwrap_or_default();
    let crumb = Breadcrumb::new(Category::Log)
        .with_level(level)
        .with_message(entry.message.as_str())
        .with_data("level", entry.level)
        .with_data("message", entry.message)
        .with_data("context", Value::Object(entry.context));
    vec![Effect::Record(crumb)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MessageLogged;
    use serde_json::json;

    fn only_record(effects: Vec<Effect>) -> Breadcrumb {
        match effects.as_slice() {
            [Effect::Record(c)] => c.clone(),
            other => panic!("expected one record, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_shape() {
        let payload = Payload::MessageLogged(MessageLogged {
            level: "error".to_string(),
            message: "disk full".to_string(),
            context: json!({ "disk": "/var" }),
        });
        let crumb = only_record(message_logged(&RecorderFlags::default(), &payload).unwrap());

        assert_eq!(crumb.category, Category::Log);
        assert_eq!(crumb.level, Level::Error);
        assert_eq!(crumb.message.as_deref(), Some("disk full"));
        assert_eq!(crumb.data["level"], "error");
        assert_eq!(crumb.data["context"], json!({ "disk": "/var" }));
    }

    #[test]
    fn test_context_defaults_to_empty_object() {
        let flags = RecorderFlags::default();

        let missing = only_record(log(&flags, &Payload::args(["info", "hello"])).unwrap());
        assert_eq!(missing.data["context"], json!({}));

        let scalar = only_record(
            log(&flags, &Payload::args([json!("info"), json!("hello"), json!("oops")])).unwrap(),
        );
        assert_eq!(scalar.data["context"], json!({}));
    }

    #[test]
    fn test_unknown_level_keeps_raw_label() {
        let crumb = only_record(log(&RecorderFlags::default(), &Payload::args(["verbose", "x"])).unwrap());
        assert_eq!(crumb.level, Level::Info);
        assert_eq!(crumb.data["level"], "verbose");
    }

    #[test]
    fn test_disabled_records_nothing() {
        let flags = RecorderFlags {
            record_logs: false,
            ..RecorderFlags::default()
        };
        assert!(log(&flags, &Payload::args(["info", "x"])).unwrap().is_empty());
    }
}
