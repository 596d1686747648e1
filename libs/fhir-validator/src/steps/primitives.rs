//! JSON kind and lexical format of primitive values

use super::Node;
use crate::plan::PrimitivesPlan;
use crate::validator::{IssueCode, IssueSeverity, ValidationIssue};
use loom_models::common::props::is_primitive_code;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

const YEAR: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)";
const TIME: &str = r"([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?";
const ZONE: &str = r"(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))";

fn patterns() -> &'static HashMap<&'static str, Regex> {
    static PATTERNS: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let month = r"(0[1-9]|1[0-2])";
        let day = r"(0[1-9]|[1-2][0-9]|3[0-1])";
        let sources = [
            ("code", r"^[^\s]+( [^\s]+)*$".to_string()),
            ("id", r"^[A-Za-z0-9\-\.]{1,64}$".to_string()),
            ("uri", r"^\S*$".to_string()),
            ("url", r"^\S*$".to_string()),
            ("canonical", r"^\S*$".to_string()),
            ("oid", r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$".to_string()),
            (
                "uuid",
                r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$".to_string(),
            ),
            ("base64Binary", r"^(\s*([0-9a-zA-Z\+/=]){4}\s*)+$".to_string()),
            ("date", format!(r"^{YEAR}(-{month}(-{day})?)?$")),
            (
                "dateTime",
                format!(r"^{YEAR}(-{month}(-{day}(T{TIME}{ZONE})?)?)?$"),
            ),
            ("instant", format!(r"^{YEAR}-{month}-{day}T{TIME}{ZONE}$")),
            ("time", format!(r"^{TIME}$")),
        ];
        sources
            .into_iter()
            .map(|(code, source)| {
                let regex = Regex::new(&source).expect("primitive pattern must compile");
                (code, regex)
            })
            .collect()
    })
}

pub fn check(node: &Node<'_>, plan: &PrimitivesPlan, issues: &mut Vec<ValidationIssue>) {
    for (key, value, matched) in node.declared() {
        if matched.is_shadow || !is_primitive_code(matched.type_code) {
            continue;
        }

        let path = node.child_path(key);
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if item.is_null() {
                        continue;
                    }
                    if let Some(problem) = check_value(matched.type_code, item) {
                        issues.push(issue(plan.severity, problem, format!("{path}[{index}]")));
                    }
                }
            }
            single => {
                if let Some(problem) = check_value(matched.type_code, single) {
                    issues.push(issue(plan.severity, problem, path));
                }
            }
        }
    }
}

fn issue(severity: IssueSeverity, diagnostics: String, location: String) -> ValidationIssue {
    let issue = match severity {
        IssueSeverity::Warning => ValidationIssue::warning(IssueCode::Value, diagnostics),
        _ => ValidationIssue::error(IssueCode::Value, diagnostics),
    };
    issue.with_location(location)
}

/// Returns a description of what is wrong with `value` as a `code`, if anything.
pub fn check_value(code: &str, value: &Value) -> Option<String> {
    match code {
        "boolean" => (!value.is_boolean()).then(|| format!("expected a boolean, found {value}")),
        "integer" => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => None,
            _ => Some(format!("expected a 32-bit integer, found {value}")),
        },
        "positiveInt" => match value.as_u64() {
            Some(n) if n >= 1 && n <= i32::MAX as u64 => None,
            _ => Some(format!("expected a positive integer, found {value}")),
        },
        "unsignedInt" => match value.as_u64() {
            Some(n) if n <= i32::MAX as u64 => None,
            _ => Some(format!("expected a non-negative integer, found {value}")),
        },
        "decimal" => (!value.is_number()).then(|| format!("expected a number, found {value}")),
        _ => {
            let Some(text) = value.as_str() else {
                return Some(format!("expected a string for {code}, found {value}"));
            };
            if text.is_empty() {
                return Some(format!("{code} values must not be empty"));
            }
            match patterns().get(code) {
                Some(pattern) if !pattern.is_match(text) => {
                    Some(format!("'{text}' is not a valid {code}"))
                }
                _ => None,
            }
        }
    }
}
