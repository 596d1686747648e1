//! Version-agnostic FHIR building blocks
//!
//! Element bases, datatypes and the machinery every model is built on:
//! property tables, choice elements and the [`FhirModel`] trait.

pub mod choice;
pub mod complex;
pub mod decimal;
pub mod element;
pub mod error;
pub mod model;
pub mod props;
pub mod resource;
pub mod version;

// Re-export commonly used types
pub use choice::{Choice, ChoiceValue};
pub use complex::*;
pub use decimal::FhirDecimal;
pub use element::*;
pub use error::{Error, Result, ValidationFailure};
pub use model::{FhirModel, ModelKind};
pub use props::{PropertyDef, PropertyKind, TypeRef};
pub use resource::DomainResource;
pub use version::FhirVersion;
