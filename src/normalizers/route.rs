//! Route-matched normalizer.
//!
//! Resolution order: route name, then action name, then the raw URI. The
//! anonymous-handler placeholder counts as "no action".

use super::{unexpected, Effect, Handler, Outcome};
use crate::breadcrumbs::{Breadcrumb, Category};
use crate::config::RecorderFlags;
use crate::events::{Payload, RouteInfo};

/// Action name the host reports for closure-based routes.
pub const ANONYMOUS_HANDLER: &str = "Closure";

pub(super) fn router_matched(_flags: &RecorderFlags, payload: &Payload) -> Outcome {
    match payload {
        Payload::Route(route) => Ok(record(route.as_ref())),
        other => Err(unexpected(Handler::RouterMatched, "route", other)),
    }
}

pub(super) fn route_matched(_flags: &RecorderFlags, payload: &Payload) -> Outcome {
    match payload {
        Payload::RouteMatched(ev) => Ok(record(ev.route.as_ref())),
        other => Err(unexpected(Handler::RouteMatched, "route_matched", other)),
    }
}

/// Picks the most descriptive name for a route.
pub(crate) fn resolve_name(route: &dyn RouteInfo) -> &str {
    let named = route
        .name()
        .filter(|n| !n.is_empty())
        .or_else(|| route.action_name().filter(|a| !a.is_empty()));

    match named {
        Some(n) if n != ANONYMOUS_HANDLER => n,
        _ => route.uri(),
    }
}

fn record(route: &dyn RouteInfo) -> Vec<Effect> {
    let name = resolve_name(route);
    let crumb = Breadcrumb::new(Category::Route)
        .with_message(name)
        .with_data("route", name)
        .with_data("uri", route.uri());
    vec![Effect::Record(crumb)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RouteMatched, SimpleRoute};
    use std::sync::Arc;

    fn record_of(effects: Vec<Effect>) -> Breadcrumb {
        match effects.into_iter().next() {
            Some(Effect::Record(c)) => c,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn test_name_wins_over_action() {
        let route = SimpleRoute::new("/users/{id}")
            .with_name("users.show")
            .with_action("UserController@show");
        assert_eq!(resolve_name(&route), "users.show");
    }

    #[test]
    fn test_action_when_unnamed() {
        let route = SimpleRoute::new("/users/{id}").with_action("UserController@show");
        assert_eq!(resolve_name(&route), "UserController@show");
    }

    #[test]
    fn test_uri_fallback() {
        assert_eq!(resolve_name(&SimpleRoute::new("/health")), "/health");

        let closure = SimpleRoute::new("/ping").with_action(ANONYMOUS_HANDLER);
        assert_eq!(resolve_name(&closure), "/ping");

        let empty_name = SimpleRoute::new("/empty").with_name("");
        assert_eq!(resolve_name(&empty_name), "/empty");
    }

    #[test]
    fn test_both_shapes_record_the_same_breadcrumb() {
        let route: Arc<dyn RouteInfo> = Arc::new(SimpleRoute::new("/a").with_name("a"));
        let flags = RecorderFlags::default();

        let legacy = record_of(router_matched(&flags, &Payload::Route(route.clone())).unwrap());
        let typed = record_of(
            route_matched(&flags, &Payload::RouteMatched(RouteMatched { route })).unwrap(),
        );

        assert_eq!(legacy.category, Category::Route);
        assert_eq!(legacy.data, typed.data);
        assert_eq!(legacy.data["route"], "a");
        assert_eq!(legacy.message.as_deref(), Some("a"));
    }

    #[test]
    fn test_rejects_other_shapes() {
        let err = route_matched(&RecorderFlags::default(), &Payload::args(["x"])).unwrap_err();
        assert_eq!(err.as_label(), "normalize_unexpected_payload");
    }
}
