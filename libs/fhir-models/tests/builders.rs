use async_trait::async_trait;
use loom_models::builder::{DomainResourceBuilder, ModelBuilder, ModelValidator};
use loom_models::common::{
    Address, CodeableConcept, Coding, Element, Error, Extension, ExtensionValue, FhirModel,
    HumanName, Quantity, Reference, ValidationFailure,
};
use loom_models::resources::{
    IngredientItem, MedicationIngredient, Observation, ObservationValue, Patient,
};
use serde_json::{json, Value};

/// Rejects instances that lack any of the listed keys.
struct RequireKeys(&'static [&'static str]);

#[async_trait]
impl ModelValidator for RequireKeys {
    async fn validate(&self, type_name: &str, instance: &Value) -> Result<(), ValidationFailure> {
        let missing: Vec<String> = self
            .0
            .iter()
            .filter(|key| instance.get(**key).is_none())
            .map(|key| format!("{key} is required"))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(type_name, missing))
        }
    }
}

#[test]
fn item_choice_keeps_last_assignment() {
    let ingredient = MedicationIngredient::builder()
        .set_item(IngredientItem::CodeableConcept(CodeableConcept::from_text("Aspirin")))
        .set_item(IngredientItem::Reference(Reference::to("Medication/123")))
        .build();

    let json = ingredient.to_json().unwrap();
    assert_eq!(json["itemReference"], json!({"reference": "Medication/123"}));
    assert!(json.get("itemCodeableConcept").is_none());
}

#[test]
fn address_lines_keep_call_order() {
    let address = Address::builder()
        .add_line("221B Baker St")
        .add_line("Flat 2")
        .build();

    assert_eq!(
        address.line,
        Some(vec![Some("221B Baker St".to_string()), Some("Flat 2".to_string())])
    );
    assert_eq!(
        address.to_json().unwrap()["line"],
        json!(["221B Baker St", "Flat 2"])
    );
}

#[test]
fn build_is_isolated_from_later_builder_changes() {
    let builder = Patient::builder().add_name(
        HumanName::builder()
            .set_family("Holmes")
            .add_given("Sherlock")
            .build(),
    );

    let first = builder.snapshot();
    let second = builder.add_name(HumanName::builder().set_family("Watson").build()).build();

    assert_eq!(first.name.as_ref().map(Vec::len), Some(1));
    assert_eq!(second.name.as_ref().map(Vec::len), Some(2));
}

#[test]
fn clone_is_deep() {
    let original = Patient::builder()
        .add_address(Address::builder().add_line("1 Main St").build())
        .build();
    let mut copy = original.clone();
    if let Some(addresses) = copy.address.as_mut() {
        addresses[0].line = Some(vec![Some("changed".into())]);
    }

    assert_eq!(
        original.address.as_ref().unwrap()[0].line,
        Some(vec![Some("1 Main St".to_string())])
    );
}

#[test]
fn build_never_validates() {
    let observation = Observation::builder()
        .set_value(ObservationValue::Integer(3))
        .build();
    assert!(observation.status.is_none());
    assert!(observation.code.is_none());
}

#[test]
fn shadow_is_dropped_when_variant_changes() {
    let observation = Observation::builder()
        .set_value_with_extension(
            ObservationValue::Boolean(true),
            Element::with_extension(Extension::with_value(
                "http://example.org/certainty",
                ExtensionValue::Code("low".into()),
            )),
        )
        .set_value(ObservationValue::Quantity(Quantity::ucum(5, "mg")))
        .build();

    let json = observation.to_json().unwrap();
    assert!(json.get("_valueBoolean").is_none());
    assert!(json.get("valueBoolean").is_none());
    assert_eq!(json["valueQuantity"]["code"], "mg");
}

#[test]
fn with_preserves_declared_order() {
    let observation = Observation::builder()
        .set_status("preliminary")
        .set_code(CodeableConcept::from_coding(Coding::new("http://loinc.org", "29463-7")))
        .build();

    let updated = observation
        .with(&json!({
            "valueQuantity": {"value": 72.5, "unit": "kg"},
            "subject": {"reference": "Patient/1"},
            "status": "final"
        }))
        .unwrap();

    let json = updated.to_json().unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["resourceType", "status", "code", "subject", "valueQuantity"]);
    assert_eq!(observation.status.as_deref(), Some("preliminary"));
}

#[tokio::test]
async fn build_or_err_returns_model_when_valid() {
    let validator = RequireKeys(&["status", "code"]);
    let observation = Observation::builder()
        .set_status("final")
        .set_code(CodeableConcept::from_text("weight"))
        .build_or_err(&validator)
        .await
        .unwrap();

    assert_eq!(observation.status.as_deref(), Some("final"));
}

#[tokio::test]
async fn build_or_err_surfaces_every_message() {
    let validator = RequireKeys(&["status", "code"]);
    let err = Observation::builder()
        .set_id("obs-1")
        .build_or_err(&validator)
        .await
        .unwrap_err();

    match err {
        Error::Validation(failure) => {
            assert_eq!(failure.type_name, "Observation");
            assert_eq!(failure.messages.len(), 2);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
