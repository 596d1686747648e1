//! FHIR resources
//!
//! Modelled resources plus [`Resource`], which dispatches on `resourceType`
//! and keeps resources without a model as raw JSON.

pub mod medication;
pub mod observation;
pub mod patient;

pub use medication::*;
pub use observation::*;
pub use patient::*;

use crate::common::{Error, FhirModel, Result};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Any resource, as found in `contained` or read from a file.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Patient(Box<Patient>),
    Observation(Box<Observation>),
    Medication(Box<Medication>),
    /// A resource type without a model, kept verbatim
    Other(Value),
}

impl Resource {
    /// Parses `value`, dispatching on its `resourceType`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or(Error::ExpectedObject("Resource"))?;
        let resource_type = object
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or(Error::MissingResourceType("Resource"))?;

        Ok(match resource_type {
            "Patient" => Self::Patient(Box::new(Patient::from_json(value)?)),
            "Observation" => Self::Observation(Box::new(Observation::from_json(value)?)),
            "Medication" => Self::Medication(Box::new(Medication::from_json(value)?)),
            other => {
                tracing::debug!(resource_type = other, "keeping unmodelled resource as JSON");
                Self::Other(value.clone())
            }
        })
    }

    /// Like [`from_json`](Self::from_json) but rejects resource types without a model.
    pub fn from_json_modelled(value: &Value) -> Result<Self> {
        match Self::from_json(value)? {
            Self::Other(other) => Err(Error::UnknownResourceType(
                other
                    .get("resourceType")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            )),
            resource => Ok(resource),
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        match self {
            Self::Patient(patient) => patient.to_json(),
            Self::Observation(observation) => observation.to_json(),
            Self::Medication(medication) => medication.to_json(),
            Self::Other(value) => Ok(value.clone()),
        }
    }

    pub fn resource_type(&self) -> &str {
        match self {
            Self::Patient(_) => Patient::TYPE_NAME,
            Self::Observation(_) => Observation::TYPE_NAME,
            Self::Medication(_) => Medication::TYPE_NAME,
            Self::Other(value) => value
                .get("resourceType")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Patient(patient) => patient.base.id.as_deref(),
            Self::Observation(observation) => observation.base.id.as_deref(),
            Self::Medication(medication) => medication.base.id.as_deref(),
            Self::Other(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// Returns the typed model when this resource is an `M`.
    pub fn downcast<M: FhirModel>(&self) -> Option<M> {
        if self.resource_type() != M::TYPE_NAME {
            return None;
        }
        self.to_json().and_then(|json| M::from_json(&json)).ok()
    }
}

impl From<Patient> for Resource {
    fn from(patient: Patient) -> Self {
        Self::Patient(Box::new(patient))
    }
}

impl From<Observation> for Resource {
    fn from(observation: Observation) -> Self {
        Self::Observation(Box::new(observation))
    }
}

impl From<Medication> for Resource {
    fn from(medication: Medication) -> Self {
        Self::Medication(Box::new(medication))
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(de::Error::custom)
    }
}
