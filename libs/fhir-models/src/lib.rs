//! FHIR data models
//!
//! Strongly-typed FHIR resources and datatypes that read and write standard
//! FHIR JSON, with fluent builders for constructing them.
//!
//! # Module Organization
//!
//! - `common`: element bases, datatypes and the model machinery
//! - `resources`: Patient, Observation, Medication and the [`Resource`] enum
//! - `builder`: builder traits shared by every model builder
//! - `registry`: runtime lookup of property tables by type name
//!
//! # Design
//!
//! - **Declared order**: every model carries a property table in FHIR element
//!   order; [`FhirModel::to_json`] emits keys in that order
//! - **Typed choices**: a `value[x]` element is one enum-valued field, so two
//!   sibling types can never be populated at once
//! - **Owned data**: `clone()` is a deep copy and [`FhirModel::with`] returns
//!   a new instance
//!
//! # Example
//!
//! ```rust
//! use loom_models::builder::ModelBuilder;
//! use loom_models::common::{CodeableConcept, FhirModel};
//! use loom_models::resources::{IngredientItem, MedicationIngredient};
//! use loom_models::common::Reference;
//!
//! let ingredient = MedicationIngredient::builder()
//!     .set_item(IngredientItem::CodeableConcept(CodeableConcept::from_text("Aspirin")))
//!     .set_item(IngredientItem::Reference(Reference::to("Medication/123")))
//!     .build();
//!
//! let json = ingredient.to_json().unwrap();
//! assert_eq!(json["itemReference"]["reference"], "Medication/123");
//! assert!(json.get("itemCodeableConcept").is_none());
//! ```

pub mod builder;
pub mod common;
pub mod registry;
pub mod resources;

// Re-export commonly used types
pub use common::*;
pub use resources::Resource;

#[doc(hidden)]
pub use serde_json as __serde_json;
