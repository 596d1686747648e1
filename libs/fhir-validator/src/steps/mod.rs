//! Validation steps
//!
//! Each step is a check over a single object node. [`walk`] visits every
//! object in an instance, resolving the type of each child through the model
//! registry, and hands the nodes to the step.

pub mod cardinality;
pub mod choice;
pub mod extensions;
pub mod primitives;
pub mod structure;

use loom_models::common::props::{is_primitive_code, KeyMatch};
use loom_models::registry::{self, TypeInfo};
use serde_json::{Map, Value};

/// An object in the instance tree together with its resolved type.
pub struct Node<'a> {
    pub type_info: TypeInfo,
    pub object: &'a Map<String, Value>,
    pub path: String,
}

impl Node<'_> {
    pub fn child_path(&self, key: &str) -> String {
        format!("{}.{}", self.path, key)
    }

    /// Non-null entries that match a declared property.
    pub fn declared(&self) -> impl Iterator<Item = (&String, &Value, KeyMatch)> + '_ {
        self.object.iter().filter_map(move |(key, value)| {
            if value.is_null() {
                return None;
            }
            self.type_info
                .property_for_key(key)
                .map(|matched| (key, value, matched))
        })
    }
}

/// Visits `value` and every object nested under it, depth first.
pub fn walk(type_info: TypeInfo, value: &Value, path: &str, visit: &mut dyn FnMut(&Node<'_>)) {
    let Some(object) = value.as_object() else {
        return;
    };
    let node = Node {
        type_info,
        object,
        path: path.to_string(),
    };
    visit(&node);

    for (key, child) in object {
        let Some(matched) = type_info.property_for_key(key) else {
            continue;
        };
        let child_path = node.child_path(key);
        match child {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    descend(matched, item, &format!("{child_path}[{index}]"), visit);
                }
            }
            item => descend(matched, item, &child_path, visit),
        }
    }
}

fn descend(matched: KeyMatch, value: &Value, path: &str, visit: &mut dyn FnMut(&Node<'_>)) {
    let type_name = if matched.is_shadow {
        "Element"
    } else if is_primitive_code(matched.type_code) {
        return;
    } else if matched.type_code == "Resource" {
        match value.get("resourceType").and_then(Value::as_str) {
            Some(resource_type) => resource_type,
            None => return,
        }
    } else {
        matched.type_code
    };

    match registry::lookup(type_name) {
        Some(type_info) => walk(type_info, value, path, visit),
        None => tracing::debug!(type_name, path, "no model registered, skipping subtree"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walk_resolves_nested_types() {
        let observation = json!({
            "resourceType": "Observation",
            "status": "final",
            "_status": {"id": "s"},
            "code": {"coding": [{"system": "http://loinc.org", "code": "1"}]},
            "valueQuantity": {"value": 1},
            "component": [{"code": {"text": "c"}}],
            "contained": [{"resourceType": "Basic"}, {"resourceType": "Patient", "id": "p"}]
        });

        let mut seen = Vec::new();
        walk(
            registry::lookup("Observation").unwrap(),
            &observation,
            "Observation",
            &mut |node| seen.push((node.path.clone(), node.type_info.name)),
        );

        assert_eq!(
            seen,
            vec![
                ("Observation".to_string(), "Observation"),
                ("Observation._status".to_string(), "Element"),
                ("Observation.code".to_string(), "CodeableConcept"),
                ("Observation.code.coding[0]".to_string(), "Coding"),
                ("Observation.valueQuantity".to_string(), "Quantity"),
                ("Observation.component[0]".to_string(), "ObservationComponent"),
                ("Observation.component[0].code".to_string(), "CodeableConcept"),
                ("Observation.contained[1]".to_string(), "Patient"),
            ]
        );
    }
}
