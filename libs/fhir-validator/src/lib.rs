//! Structural validation for loom FHIR models
//!
//! A [`Validator`] runs a compiled [`ValidationPlan`] over FHIR JSON. The
//! plan is produced from a [`ValidatorConfig`] (preset, builder or YAML) and
//! lists the enabled steps:
//!
//! - **structure**: undeclared keys, array shape, `null` values
//! - **cardinality**: required elements
//! - **choice**: `foo[x]` sibling exclusivity and release gating
//! - **primitives**: JSON kind and lexical format of primitive values
//! - **extensions**: value/nested exclusivity, modifier extension policy
//!
//! Types are resolved through [`loom_models::registry`], so every modelled
//! datatype, backbone element and contained resource is checked.
//!
//! `Validator` implements [`loom_models::builder::ModelValidator`] and can be
//! passed to `build_or_err` on any model builder.
//!
//! ```rust
//! use loom_validator::{Preset, Validator, ValidatorConfig};
//! use serde_json::json;
//!
//! let validator = Validator::from_config(&ValidatorConfig::preset(Preset::Authoring)).unwrap();
//! let outcome = validator.validate(&json!({"resourceType": "Observation", "status": "final"}));
//! assert!(!outcome.valid);
//! assert_eq!(outcome.error_count(), 1);
//! ```

mod config;
mod error;
mod plan;
pub mod steps;
mod validator;

pub use config::*;
pub use error::ConfigError;
pub use loom_models::FhirVersion;
pub use plan::*;
pub use validator::*;
