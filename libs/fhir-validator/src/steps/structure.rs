//! Key and shape checks: undeclared keys, array vs. single values, nulls

use super::Node;
use crate::plan::StructurePlan;
use crate::validator::{IssueCode, ValidationIssue};
use loom_models::common::props::{is_primitive_code, shadow_key, KeyMatch};
use serde_json::Value;

pub fn check(node: &Node<'_>, plan: &StructurePlan, issues: &mut Vec<ValidationIssue>) {
    for (key, value) in node.object {
        let path = node.child_path(key);

        let Some(matched) = node.type_info.property_for_key(key) else {
            let diagnostics = format!("Unrecognized element '{key}' in {}", node.type_info.name);
            let issue = if plan.allow_unknown_elements {
                ValidationIssue::warning(IssueCode::Structure, diagnostics)
            } else {
                ValidationIssue::error(IssueCode::Structure, diagnostics)
            };
            issues.push(issue.with_location(path));
            continue;
        };

        if matched.is_shadow && !matched.property.allows_shadow(matched.type_code) {
            let diagnostics = if is_primitive_code(matched.type_code) {
                format!(
                    "'{key}' is a primitive extension but '{}' cannot carry an id or extensions",
                    matched.property.name
                )
            } else {
                format!(
                    "'{key}' is a primitive extension but {} is not a primitive type",
                    matched.type_code
                )
            };
            issues.push(
                ValidationIssue::error(IssueCode::Structure, diagnostics).with_location(path),
            );
            continue;
        }

        match value {
            Value::Null => issues.push(
                ValidationIssue::error(
                    IssueCode::Structure,
                    format!("'{key}' is null; absent elements must be omitted"),
                )
                .with_location(path),
            ),
            Value::Array(items) => {
                if !matched.property.repeating {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::Structure,
                            format!("'{key}' must be a single value, not an array"),
                        )
                        .with_location(path),
                    );
                } else if items.is_empty() {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::Structure,
                            format!("'{key}' is an empty array; empty arrays must be omitted"),
                        )
                        .with_location(path),
                    );
                } else {
                    check_items(node, key, matched, items, issues);
                }
            }
            single => {
                if matched.property.repeating {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::Structure,
                            format!("'{key}' repeats and must be an array"),
                        )
                        .with_location(path),
                    );
                } else {
                    check_item(key, matched, single, &path, issues);
                }
            }
        }
    }
}

fn check_items(
    node: &Node<'_>,
    key: &str,
    matched: KeyMatch,
    items: &[Value],
    issues: &mut Vec<ValidationIssue>,
) {
    // `line` and `_line` are parallel arrays; a null in one needs a value in the other
    let partner_key = match key.strip_prefix('_') {
        Some(bare) => bare.to_string(),
        None => shadow_key(key),
    };
    let partner = node.object.get(&partner_key).and_then(Value::as_array);

    if let Some(partner) = partner {
        if partner.len() != items.len() && !matched.is_shadow {
            issues.push(
                ValidationIssue::error(
                    IssueCode::Structure,
                    format!("'{key}' and '{partner_key}' must have the same length"),
                )
                .with_location(node.child_path(key)),
            );
        }
    }

    for (index, item) in items.iter().enumerate() {
        let path = format!("{}[{index}]", node.child_path(key));
        if item.is_null() {
            let covered = is_primitive_code(matched.type_code)
                && partner
                    .and_then(|p| p.get(index))
                    .is_some_and(|other| !other.is_null());
            if !covered {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::Structure,
                        format!("'{key}' has a null entry with nothing to pair it with"),
                    )
                    .with_location(path),
                );
            }
            continue;
        }
        check_item(key, matched, item, &path, issues);
    }
}

fn check_item(key: &str, matched: KeyMatch, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let expects_object = matched.is_shadow || !is_primitive_code(matched.type_code);
    if !expects_object {
        return;
    }

    let Some(object) = value.as_object() else {
        issues.push(
            ValidationIssue::error(
                IssueCode::Structure,
                format!("'{key}' must be a JSON object"),
            )
            .with_location(path.to_string()),
        );
        return;
    };

    if matched.type_code == "Resource" && !matched.is_shadow && !object.contains_key("resourceType") {
        issues.push(
            ValidationIssue::error(
                IssueCode::Required,
                format!("'{key}' entry has no resourceType"),
            )
            .with_location(path.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_models::registry;
    use serde_json::json;

    fn run(type_name: &str, value: Value, allow_unknown_elements: bool) -> Vec<ValidationIssue> {
        let plan = StructurePlan {
            allow_unknown_elements,
        };
        let mut issues = Vec::new();
        super::super::walk(
            registry::lookup(type_name).unwrap(),
            &value,
            type_name,
            &mut |node| check(node, &plan, &mut issues),
        );
        issues
    }

    #[test]
    fn unknown_elements_follow_plan_severity() {
        let value = json!({"resourceType": "Patient", "nickname": "Sherlock"});

        let strict = run("Patient", value.clone(), false);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].severity, crate::IssueSeverity::Error);
        assert_eq!(strict[0].location.as_deref(), Some("Patient.nickname"));

        let lenient = run("Patient", value, true);
        assert_eq!(lenient[0].severity, crate::IssueSeverity::Warning);
    }

    #[test]
    fn repeating_shape_is_enforced() {
        let issues = run(
            "Patient",
            json!({
                "resourceType": "Patient",
                "name": {"family": "Holmes"},
                "gender": ["male"],
                "telecom": []
            }),
            false,
        );
        let messages: Vec<&str> = issues.iter().map(|i| i.diagnostics.as_str()).collect();
        assert_eq!(issues.len(), 3, "{messages:?}");
    }

    #[test]
    fn parallel_line_arrays_may_hold_nulls() {
        let issues = run(
            "Address",
            json!({
                "line": ["1 Main St", null],
                "_line": [null, {"extension": [{"url": "http://example.org/x", "valueString": "y"}]}]
            }),
            false,
        );
        assert!(issues.is_empty(), "{issues:?}");

        let issues = run("Address", json!({"line": ["1 Main St", null]}), false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.as_deref(), Some("Address.line[1]"));
    }

    #[test]
    fn shadow_on_complex_element_is_rejected() {
        let issues = run(
            "Observation",
            json!({"resourceType": "Observation", "code": {"text": "x"}, "_code": {"id": "c"}}),
            false,
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].diagnostics.contains("not a primitive type"));
    }

    #[test]
    fn shadow_on_system_typed_element_is_rejected() {
        let issues = run(
            "Extension",
            json!({"url": "http://example.org/x", "_url": {"id": "u"}, "valueString": "y"}),
            false,
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].diagnostics.contains("cannot carry"));
    }

    #[test]
    fn contained_entries_need_resource_type() {
        let issues = run(
            "Medication",
            json!({"resourceType": "Medication", "contained": [{"id": "x"}]}),
            false,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Required);
    }
}
