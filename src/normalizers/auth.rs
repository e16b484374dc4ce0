//! Authenticated normalizer: identity capture only, no breadcrumb.

use serde_json::Value;

use super::{unexpected, Effect, Handler, Outcome};
use crate::config::RecorderFlags;
use crate::error::NormalizeError;
use crate::events::Payload;

pub(super) fn authenticated(_flags: &RecorderFlags, payload: &Payload) -> Outcome {
    let Payload::Authenticated(ev) = payload else {
        return Err(unexpected(Handler::Authenticated, "authenticated", payload));
    };

    let key = match ev.user.auth_identifier() {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(NormalizeError::MissingIdentity)
        }
        Some(other) => other.to_string(),
    };
    Ok(vec![Effect::Identify(key)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Authenticated, UserId};
    use serde_json::json;
    use std::sync::Arc;

    fn event(id: Value) -> Payload {
        Payload::Authenticated(Authenticated {
            guard: Some("web".to_string()),
            user: Arc::new(UserId(id)),
        })
    }

    #[test]
    fn test_identifier_becomes_identity() {
        let flags = RecorderFlags::default();
        assert_eq!(
            authenticated(&flags, &event(json!(17))).unwrap(),
            vec![Effect::Identify("17".to_string())]
        );
        assert_eq!(
            authenticated(&flags, &event(json!("u-9"))).unwrap(),
            vec![Effect::Identify("u-9".to_string())]
        );
    }

    #[test]
    fn test_missing_identifier_fails() {
        let err = authenticated(&RecorderFlags::default(), &event(Value::Null)).unwrap_err();
        assert_eq!(err, NormalizeError::MissingIdentity);
    }
}
