//! Required elements

use super::Node;
use crate::plan::CardinalityPlan;
use crate::validator::{IssueCode, ValidationIssue};

pub fn check(node: &Node<'_>, _plan: &CardinalityPlan, issues: &mut Vec<ValidationIssue>) {
    for property in node.type_info.properties().filter(|p| p.is_required()) {
        // A primitive that only carries an extension still counts as present
        let present = property
            .candidate_keys()
            .iter()
            .any(|key| node.object.get(key).is_some_and(|value| !value.is_null()));

        if !present {
            issues.push(
                ValidationIssue::error(
                    IssueCode::Required,
                    format!(
                        "{}.{} is required but missing",
                        node.type_info.name,
                        property.display_name()
                    ),
                )
                .with_location(node.child_path(&property.display_name())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_models::registry;
    use serde_json::{json, Value};

    fn run(type_name: &str, value: Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        super::super::walk(
            registry::lookup(type_name).unwrap(),
            &value,
            type_name,
            &mut |node| check(node, &CardinalityPlan {}, &mut issues),
        );
        issues
    }

    #[test]
    fn observation_requires_status_and_code() {
        let issues = run("Observation", json!({"resourceType": "Observation"}));
        let messages: Vec<&str> = issues.iter().map(|i| i.diagnostics.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Observation.status is required but missing",
                "Observation.code is required but missing"
            ]
        );
    }

    #[test]
    fn shadow_satisfies_requirement() {
        let issues = run(
            "Observation",
            json!({
                "resourceType": "Observation",
                "_status": {"extension": [{"url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason", "valueCode": "unknown"}]},
                "code": {"text": "x"}
            }),
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn choice_requirement_uses_display_name() {
        let issues = run(
            "Medication",
            json!({"resourceType": "Medication", "ingredient": [{"isActive": true}]}),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].diagnostics,
            "MedicationIngredient.item[x] is required but missing"
        );
        assert_eq!(
            issues[0].location.as_deref(),
            Some("Medication.ingredient[0].item[x]")
        );
    }

    #[test]
    fn nested_extension_without_url_is_reported() {
        let issues = run(
            "Patient",
            json!({"resourceType": "Patient", "extension": [{"valueString": "x"}]}),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].diagnostics, "Extension.url is required but missing");
    }
}
