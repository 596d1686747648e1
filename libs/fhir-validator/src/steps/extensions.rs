//! Extension content rules and modifier extension policy

use super::Node;
use crate::plan::ExtensionsPlan;
use crate::validator::{IssueCode, ValidationIssue};
use serde_json::Value;

pub fn check(node: &Node<'_>, plan: &ExtensionsPlan, issues: &mut Vec<ValidationIssue>) {
    if !plan.allow_modifier_extensions && node.object.contains_key("modifierExtension") {
        issues.push(
            ValidationIssue::error(
                IssueCode::Extension,
                format!("Modifier extensions are not allowed on {}", node.type_info.name),
            )
            .with_location(node.child_path("modifierExtension")),
        );
    }

    if node.type_info.name != "Extension" {
        return;
    }

    let has_value = node
        .declared()
        .any(|(_, _, matched)| matched.property.name == "value");
    let has_nested = node
        .object
        .get("extension")
        .and_then(Value::as_array)
        .is_some_and(|nested| !nested.is_empty());

    if has_value == has_nested {
        let url = node
            .object
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("(no url)");
        issues.push(
            ValidationIssue::error(
                IssueCode::Extension,
                format!("Extension {url} must have either nested extensions or a value[x], not both"),
            )
            .with_location(node.path.clone()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_models::registry;
    use serde_json::json;

    fn run(value: Value, allow_modifier_extensions: bool) -> Vec<ValidationIssue> {
        let plan = ExtensionsPlan {
            allow_modifier_extensions,
        };
        let mut issues = Vec::new();
        super::super::walk(
            registry::lookup("Patient").unwrap(),
            &value,
            "Patient",
            &mut |node| check(node, &plan, &mut issues),
        );
        issues
    }

    #[test]
    fn value_and_nested_are_exclusive() {
        let issues = run(
            json!({
                "resourceType": "Patient",
                "extension": [
                    {"url": "http://example.org/a", "valueString": "x", "extension": [{"url": "b", "valueCode": "c"}]},
                    {"url": "http://example.org/empty"},
                    {"url": "http://example.org/ok", "valueBoolean": true}
                ]
            }),
            true,
        );
        let locations: Vec<&str> = issues.iter().filter_map(|i| i.location.as_deref()).collect();
        assert_eq!(locations, vec!["Patient.extension[0]", "Patient.extension[1]"]);
    }

    #[test]
    fn modifier_extensions_can_be_forbidden() {
        let value = json!({
            "resourceType": "Patient",
            "modifierExtension": [{"url": "http://example.org/m", "valueBoolean": true}],
            "contact": [{"modifierExtension": [{"url": "http://example.org/m", "valueBoolean": true}]}]
        });

        assert!(run(value.clone(), true).is_empty());

        let issues = run(value, false);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[1].location.as_deref(),
            Some("Patient.contact[0].modifierExtension")
        );
    }
}
