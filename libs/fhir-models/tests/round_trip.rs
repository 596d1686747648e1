use loom_models::common::{
    Address, Annotation, Attachment, CodeableConcept, CodeableReference, Coding, ContactPoint,
    Extension, ExtensionValue, FhirDecimal, FhirModel, HumanName, Identifier, Meta, ModelKind,
    Narrative, Period, Quantity, Range, Ratio, Reference,
};
use loom_models::registry::types;
use loom_models::resources::{
    IngredientItem, Medication, MedicationIngredient, Observation, ObservationComponent,
    ObservationValue, Patient, PatientContact,
};
use loom_models::Resource;
use serde_json::{json, Map, Value};
use std::{fs::File, path::PathBuf};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(relative: &str) -> Value {
    let path = fixtures_root().join(relative);
    assert!(path.exists(), "fixture missing at {:?}", path);

    let file = File::open(&path).expect("failed to open fixture");
    serde_json::from_reader(file).expect("failed to parse fixture")
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn patient_example_round_trips_exactly() {
    let input = load_fixture("patient-example.json");
    let patient = Patient::from_json(&input).expect("patient should parse");

    assert_eq!(patient.base.id.as_deref(), Some("example"));
    assert_eq!(patient.birth_date.as_deref(), Some("1974-12-25"));
    let birth_time = patient
        .birth_date_ext
        .as_ref()
        .and_then(|e| e.extension.as_ref())
        .and_then(|exts| exts.first())
        .and_then(|ext| ext.value.value());
    assert_eq!(
        birth_time,
        Some(&ExtensionValue::DateTime("1974-12-25T14:35:45-05:00".into()))
    );

    let output = patient.to_json().expect("patient should serialize");
    assert_eq!(output, input);
    assert_eq!(keys(&output), keys(&input));
    assert_eq!(keys(&output["address"][0]), keys(&input["address"][0]));
}

#[test]
fn observation_bp_round_trips_exactly() {
    let input = load_fixture("observation-bp.json");
    let first = Observation::from_json(&input).expect("observation should parse");
    let output = first.to_json().expect("serialize");

    assert_eq!(output, input);
    assert_eq!(keys(&output), keys(&input));
    assert_eq!(
        serde_json::to_string(&output).expect("text"),
        serde_json::to_string(&input).expect("text")
    );

    let second = Observation::from_json(&output).expect("reparse");
    assert_eq!(first, second);

    let components = first.component.as_ref().expect("components");
    assert_eq!(components.len(), 2);
    match components[1].value.value() {
        Some(ObservationValue::Quantity(q)) => {
            let value = q.value.expect("diastolic value");
            assert_eq!(value.to_string(), "60.0");
            assert_eq!(value, FhirDecimal::from(60));
        }
        other => panic!("unexpected diastolic value {:?}", other),
    }
    assert!(first.issued_ext.is_some());
}

#[test]
fn every_primitive_shadow_survives_a_round_trip() {
    fn check<M: FhirModel>() {
        for property in M::properties() {
            for key in property.candidate_keys() {
                if !key.starts_with('_') {
                    continue;
                }
                let shadow = if property.repeating {
                    json!([{"id": "s"}])
                } else {
                    json!({"id": "s"})
                };
                let mut input = Map::new();
                if M::KIND == ModelKind::Resource {
                    input.insert("resourceType".into(), Value::String(M::TYPE_NAME.into()));
                }
                input.insert(key.clone(), shadow.clone());

                let output = M::from_json(&Value::Object(input))
                    .unwrap_or_else(|e| panic!("{}.{key}: {e}", M::TYPE_NAME))
                    .to_json()
                    .unwrap_or_else(|e| panic!("{}.{key}: {e}", M::TYPE_NAME));
                assert_eq!(output.get(&key), Some(&shadow), "{}.{key}", M::TYPE_NAME);
            }
        }
    }

    check::<Extension>();
    check::<Coding>();
    check::<CodeableConcept>();
    check::<Reference>();
    check::<CodeableReference>();
    check::<Identifier>();
    check::<Quantity>();
    check::<Period>();
    check::<Range>();
    check::<Ratio>();
    check::<HumanName>();
    check::<Address>();
    check::<ContactPoint>();
    check::<Annotation>();
    check::<Attachment>();
    check::<Meta>();
    check::<Narrative>();
    check::<Patient>();
    check::<PatientContact>();
    check::<Observation>();
    check::<ObservationComponent>();
    check::<Medication>();
    check::<MedicationIngredient>();
}

#[test]
fn shadow_check_covers_every_registered_model() {
    let mut registered: Vec<&str> = types()
        .iter()
        .map(|t| t.name)
        .filter(|name| *name != "Element")
        .collect();
    registered.sort_unstable();

    let mut checked = vec![
        "Extension",
        "Coding",
        "CodeableConcept",
        "Reference",
        "CodeableReference",
        "Identifier",
        "Quantity",
        "Period",
        "Range",
        "Ratio",
        "HumanName",
        "Address",
        "ContactPoint",
        "Annotation",
        "Attachment",
        "Meta",
        "Narrative",
        "Patient",
        "PatientContact",
        "Observation",
        "ObservationComponent",
        "Medication",
        "MedicationIngredient",
    ];
    checked.sort_unstable();

    assert_eq!(registered, checked);
}

#[test]
fn medication_keeps_unmodelled_contained_resource() {
    let input = load_fixture("medication-aspirin.json");
    let medication = Medication::from_json(&input).expect("medication should parse");

    let contained = medication
        .base
        .find_contained("org1")
        .expect("contained organization");
    assert_eq!(contained.resource_type(), "Organization");
    assert!(matches!(contained, Resource::Other(_)));

    let ingredient = &medication.ingredient.as_ref().expect("ingredients")[0];
    assert!(matches!(
        ingredient.item.value(),
        Some(IngredientItem::CodeableConcept(_))
    ));

    let output = medication.to_json().expect("serialize");
    assert_eq!(output["contained"], input["contained"]);
    assert_eq!(keys(&output), keys(&input));
}

#[test]
fn resource_enum_dispatches_fixtures() {
    for (fixture, expected) in [
        ("patient-example.json", "Patient"),
        ("observation-bp.json", "Observation"),
        ("medication-aspirin.json", "Medication"),
    ] {
        let resource = Resource::from_json(&load_fixture(fixture)).expect("resource should parse");
        assert_eq!(resource.resource_type(), expected);
    }
}

#[test]
fn undeclared_keys_are_dropped_on_parse() {
    let mut input = load_fixture("patient-example.json");
    input
        .as_object_mut()
        .expect("object")
        .insert("favouriteColour".into(), Value::String("teal".into()));

    let output = Patient::from_json(&input)
        .expect("patient should parse")
        .to_json()
        .expect("serialize");
    assert!(output.get("favouriteColour").is_none());
}
