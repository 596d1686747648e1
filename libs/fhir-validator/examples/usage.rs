use loom_models::builder::{DomainResourceBuilder, ModelBuilder};
use loom_models::common::{CodeableConcept, Coding, FhirModel, Quantity, Reference};
use loom_models::resources::{Observation, ObservationEffective, ObservationValue};
use loom_validator::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: Using presets
    let ingestion_cfg = ValidatorConfig::preset(Preset::Ingestion);
    let plan = ingestion_cfg.compile()?;
    println!("Ingestion plan has {} steps", plan.steps.len());

    // Example 2: Builder pattern
    let custom_cfg = ValidatorConfig::builder()
        .preset(Preset::Authoring)
        .fhir_version(FhirVersion::R5)
        .primitives_mode(PrimitiveMode::Warn)
        .fail_fast(true)
        .max_issues(500)
        .build();

    let plan = custom_cfg.compile()?;
    println!("Custom plan has {} steps", plan.steps.len());

    // Example 3: YAML configuration
    let yaml = r#"
preset: Authoring
fhir:
  version: R4
structure:
  allow_unknown_elements: true
exec:
  fail_fast: false
  max_issues: 1000
"#;

    let cfg = ValidatorConfig::from_yaml(yaml)?;
    let validator = Validator::from_config(&cfg)?;

    // Example 4: Validating a built model
    let observation = Observation::builder()
        .set_id("heart-rate")
        .set_status("final")
        .set_code(CodeableConcept::from_coding(
            Coding::new("http://loinc.org", "8867-4").with_display("Heart rate"),
        ))
        .set_subject(Reference::to("Patient/example"))
        .set_effective(ObservationEffective::DateTime("2024-05-01T09:30:00Z".into()))
        .set_value(ObservationValue::Quantity(Quantity::ucum(72, "/min")))
        .build_or_err(&validator)
        .await?;
    println!("Built {}", serde_json::to_string_pretty(&observation.to_json()?)?);

    // Example 5: Error handling
    let rejected = Observation::builder()
        .set_value(ObservationValue::Boolean(true))
        .build_or_err(&validator)
        .await;
    if let Err(e) = rejected {
        println!("Caught expected error: {}", e);
    }

    // Example 6: Export to YAML
    let cfg = ValidatorConfig::preset(Preset::Publication);
    println!("\nPublication preset as YAML:\n{}", cfg.to_yaml()?);

    Ok(())
}
