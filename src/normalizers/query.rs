//! Query-executed normalizer.
//!
//! Builds `{connectionName, time?, query}` where `query` is the SQL text with
//! every `?` replaced, in order, by its binding rendered as a quoted literal.
//! With fewer bindings than placeholders the raw SQL is recorded instead.

use serde_json::Value;

use super::{args, unexpected, Effect, Handler, Outcome};
use crate::breadcrumbs::{Breadcrumb, Category};
use crate::config::RecorderFlags;
use crate::diagnostics::DIAGNOSTIC_TARGET;
use crate::error::NormalizeError;
use crate::events::{Payload, QueryExecuted};

/// Legacy shape: `[sql, bindings, time, connection_name]`.
pub(super) fn query(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    if !flags.record_sql_queries {
        return Ok(Vec::new());
    }
    let Payload::Args(a) = payload else {
        return Err(unexpected(Handler::Query, "args", payload));
    };

    let h = Handler::Query;
    let input = QueryExecuted {
        sql: args::string(h, a, 0, "query")?,
        bindings: args::list(h, a, 1, "bindings")?,
        time: args::optional_f64(h, a, 2, "time")?,
        connection_name: args::string(h, a, 3, "connection_name")?,
    };
    Ok(normalize(flags, &input))
}

pub(super) fn query_executed(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    if !flags.record_sql_queries {
        return Ok(Vec::new());
    }
    match payload {
        Payload::QueryExecuted(ev) => Ok(normalize(flags, ev)),
        other => Err(unexpected(Handler::QueryExecuted, "query_executed", other)),
    }
}

fn normalize(flags: &RecorderFlags, ev: &QueryExecuted) -> Vec<Effect> {
    let query = if flags.record_sql_bindings {
        match substitute_bindings(&ev.sql, &ev.bindings) {
            Ok(sql) => sql,
            Err(err) => {
                tracing::debug!(target: DIAGNOSTIC_TARGET, error = %err, "recording raw query text");
                ev.sql.clone()
            }
        }
    } else {
        ev.sql.clone()
    };

    let crumb = Breadcrumb::new(Category::Query)
        .with_data("connectionName", ev.connection_name.as_str())
        .with_optional("time", ev.time)
        .with_data("query", query);
    vec![Effect::Record(crumb)]
}

/// Replaces each `?` in `sql` by the matching binding as a quoted literal.
///
/// Extra bindings are ignored.
///
/// # Errors
/// [`NormalizeError::BindingMismatch`] when `sql` has more placeholders than bindings.
pub fn substitute_bindings(sql: &str, bindings: &[Value]) -> Result<String, NormalizeError> {
    let placeholders = sql.matches('?').count();
    if placeholders > bindings.len() {
        return Err(NormalizeError::BindingMismatch {
            placeholders,
            bindings: bindings.len(),
        });
    }

    let mut out = String::with_capacity(sql.len() + bindings.len() * 4);
    let mut values = bindings.iter();
    for ch in sql.chars() {
        if ch != '?' {
            out.push(ch);
            continue;
        }
        // Count checked above.
        let v = values.next().map(render_binding).unwrap_or_default();
        out.push('\'');
        out.push_str(&v.replace('\'', "''"));
        out.push('\'');
    }
    Ok(out)
}

fn render_binding(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn typed(sql: &str, bindings: Vec<Value>, time: Option<f64>) -> Payload {
        Payload::QueryExecuted(QueryExecuted {
            sql: sql.to_string(),
            bindings,
            time,
            connection_name: "mysql".to_string(),
        })
    }

    fn only_record(effects: Vec<Effect>) -> Breadcrumb {
        assert_eq!(effects.len(), 1);
        match effects.into_iter().next() {
            Some(Effect::Record(c)) => c,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn test_substitutes_bindings_in_order() {
        assert_eq!(
            substitute_bindings("SELECT * FROM users WHERE id = ?", &[json!(42)]).unwrap(),
            "SELECT * FROM users WHERE id = '42'"
        );
        assert_eq!(
            substitute_bindings("a = ? AND b = ? AND c = ?", &[json!("x"), json!(true), json!(null)])
                .unwrap(),
            "a = 'x' AND b = '1' AND c = ''"
        );
        assert_eq!(
            substitute_bindings("active = ?", &[json!(false)]).unwrap(),
            "active = ''"
        );
    }

    #[test]
    fn test_percent_signs_and_quotes_survive() {
        assert_eq!(
            substitute_bindings("name LIKE ? -- 100%", &[json!("O'Brien%")]).unwrap(),
            "name LIKE 'O''Brien%' -- 100%"
        );
    }

    #[test]
    fn test_extra_bindings_are_ignored() {
        assert_eq!(substitute_bindings("id = ?", &[json!(1), json!(2)]).unwrap(), "id = '1'");
    }

    #[test]
    fn test_missing_bindings_is_an_error() {
        let err = substitute_bindings("a = ? AND b = ?", &[json!(1)]).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::BindingMismatch {
                placeholders: 2,
                bindings: 1
            }
        );
    }

    #[test]
    fn test_mismatch_records_raw_query() {
        let sql = "SELECT * FROM t WHERE a = ? AND b = ?";
        let effects = query_executed(&RecorderFlags::default(), &typed(sql, vec![json!(1)], None))
            .unwrap();
        let crumb = only_record(effects);
        assert_eq!(crumb.data["query"], sql);
    }

    #[test]
    fn test_time_included_only_when_present() {
        let flags = RecorderFlags::default();

        let with = only_record(query_executed(&flags, &typed("SELECT 1", vec![], Some(1.5))).unwrap());
        assert_eq!(with.category, Category::Query);
        assert_eq!(with.data["time"], 1.5);
        assert_eq!(with.data["connectionName"], "mysql");

        let without = only_record(query_executed(&flags, &typed("SELECT 1", vec![], None)).unwrap());
        assert!(!without.data.contains_key("time"));
    }

    #[test]
    fn test_disabled_records_nothing() {
        let flags = RecorderFlags {
            record_sql_queries: false,
            ..RecorderFlags::default()
        };
        for _ in 0..10 {
            assert!(query_executed(&flags, &typed("SELECT ?", vec![json!(1)], None))
                .unwrap()
                .is_empty());
            assert!(query(&flags, &Payload::args([json!("SELECT 1")])).unwrap().is_empty());
        }
    }

    #[test]
    fn test_bindings_disabled_records_raw_sql() {
        let flags = RecorderFlags {
            record_sql_bindings: false,
            ..RecorderFlags::default()
        };
        let crumb = only_record(query_executed(&flags, &typed("id = ?", vec![json!(7)], None)).unwrap());
        assert_eq!(crumb.data["query"], "id = ?");
    }

    #[test]
    fn test_legacy_shape() {
        let payload = Payload::args([json!("id = ?"), json!([5]), json!(null), json!("pgsql")]);
        let crumb = only_record(query(&RecorderFlags::default(), &payload).unwrap());
        assert_eq!(crumb.data["query"], "id = '5'");
        assert_eq!(crumb.data["connectionName"], "pgsql");
        assert!(!crumb.data.contains_key("time"));
    }

    #[test]
    fn test_legacy_shape_missing_connection() {
        let err = query(&RecorderFlags::default(), &Payload::args([json!("SELECT 1")])).unwrap_err();
        assert_eq!(err.as_label(), "normalize_missing_argument");
    }
}
