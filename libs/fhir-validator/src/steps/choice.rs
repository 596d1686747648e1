//! Choice element checks: one sibling at most, matching shadows, release gating

use super::Node;
use crate::plan::ChoicePlan;
use crate::validator::{IssueCode, ValidationIssue};
use loom_models::common::props::{KeyMatch, PropertyKind};

pub fn check(node: &Node<'_>, plan: &ChoicePlan, issues: &mut Vec<ValidationIssue>) {
    for property in node.type_info.properties() {
        let PropertyKind::Choice(types) = property.kind else {
            continue;
        };

        let mut values: Vec<(&str, KeyMatch)> = Vec::new();
        let mut shadows: Vec<(&str, KeyMatch)> = Vec::new();
        for (key, value) in node.object {
            if value.is_null() {
                continue;
            }
            if let Some(matched) = property.match_key(key) {
                if matched.is_shadow {
                    shadows.push((key.as_str(), matched));
                } else {
                    values.push((key.as_str(), matched));
                }
            }
        }

        if values.len() > 1 {
            let keys: Vec<&str> = values.iter().map(|(key, _)| *key).collect();
            issues.push(
                ValidationIssue::error(
                    IssueCode::Invalid,
                    format!(
                        "{} allows a single type, found {}",
                        property.display_name(),
                        keys.join(", ")
                    ),
                )
                .with_location(node.child_path(&property.display_name())),
            );
        }

        if let Some((value_key, value_match)) = values.first() {
            for (shadow_key, shadow_match) in &shadows {
                if shadow_match.type_code != value_match.type_code {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::Invalid,
                            format!("'{shadow_key}' does not belong to '{value_key}'"),
                        )
                        .with_location(node.child_path(shadow_key)),
                    );
                }
            }
        } else if shadows.len() > 1 {
            issues.push(
                ValidationIssue::error(
                    IssueCode::Invalid,
                    format!(
                        "{} has primitive extensions for more than one type",
                        property.display_name()
                    ),
                )
                .with_location(node.child_path(&property.display_name())),
            );
        }

        for (key, matched) in values.iter().chain(shadows.iter()) {
            let Some(type_ref) = types.iter().find(|t| t.code == matched.type_code) else {
                continue;
            };
            if !type_ref.available_in(plan.fhir_version) {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::NotSupported,
                        format!(
                            "'{key}' requires FHIR {} or later, validating against {}",
                            type_ref.since, plan.fhir_version
                        ),
                    )
                    .with_location(node.child_path(key)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_models::{registry, FhirVersion};
    use serde_json::{json, Value};

    fn run(value: Value, fhir_version: FhirVersion) -> Vec<ValidationIssue> {
        let plan = ChoicePlan { fhir_version };
        let mut issues = Vec::new();
        super::super::walk(
            registry::lookup("Observation").unwrap(),
            &value,
            "Observation",
            &mut |node| check(node, &plan, &mut issues),
        );
        issues
    }

    #[test]
    fn two_siblings_are_one_issue() {
        let issues = run(
            json!({"resourceType": "Observation", "valueString": "a", "valueBoolean": true}),
            FhirVersion::R4,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].diagnostics,
            "value[x] allows a single type, found valueString, valueBoolean"
        );
    }

    #[test]
    fn shadow_must_match_value_type() {
        let issues = run(
            json!({"resourceType": "Observation", "valueBoolean": true, "_valueString": {"id": "x"}}),
            FhirVersion::R4,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.as_deref(), Some("Observation._valueString"));
    }

    #[test]
    fn r5_types_are_gated_by_version() {
        let value = json!({
            "resourceType": "Observation",
            "valueReference": {"reference": "MolecularSequence/1"}
        });

        let issues = run(value.clone(), FhirVersion::R4B);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::NotSupported);
        assert_eq!(
            issues[0].diagnostics,
            "'valueReference' requires FHIR R5 or later, validating against R4B"
        );

        assert!(run(value, FhirVersion::R5).is_empty());
    }

    #[test]
    fn components_are_checked_too() {
        let issues = run(
            json!({
                "resourceType": "Observation",
                "component": [{"code": {"text": "c"}, "valueInteger": 1, "valueTime": "10:00:00"}]
            }),
            FhirVersion::R4,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].location.as_deref(),
            Some("Observation.component[0].value[x]")
        );
    }
}
