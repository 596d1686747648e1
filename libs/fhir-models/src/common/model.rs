//! The `FhirModel` trait: JSON conversion and copy-on-write updates

use super::error::{Error, Result};
use super::props::{assign_props, merge_props, serialize_props_to, PropertyDef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::iter::Chain;
use std::slice::Iter;

/// Base a model inherits its leading properties from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Element: `id`, `extension`
    Datatype,
    /// BackboneElement: adds `modifierExtension`
    Backbone,
    /// DomainResource: `resourceType`, `id`, `meta`, ... `modifierExtension`
    Resource,
}

pub const ELEMENT_PROPERTIES: &[PropertyDef] = &[
    PropertyDef::new("id", "string").without_extensions(),
    PropertyDef::new("extension", "Extension").repeating(),
];

pub const BACKBONE_ELEMENT_PROPERTIES: &[PropertyDef] = &[
    PropertyDef::new("id", "string").without_extensions(),
    PropertyDef::new("extension", "Extension").repeating(),
    PropertyDef::new("modifierExtension", "Extension").repeating(),
];

pub const DOMAIN_RESOURCE_PROPERTIES: &[PropertyDef] = &[
    PropertyDef::new("resourceType", "code").required().without_extensions(),
    PropertyDef::new("id", "id").without_extensions(),
    PropertyDef::new("meta", "Meta"),
    PropertyDef::new("implicitRules", "uri"),
    PropertyDef::new("language", "code"),
    PropertyDef::new("text", "Narrative"),
    PropertyDef::new("contained", "Resource").repeating(),
    PropertyDef::new("extension", "Extension").repeating(),
    PropertyDef::new("modifierExtension", "Extension").repeating(),
];

impl ModelKind {
    pub fn base_properties(&self) -> &'static [PropertyDef] {
        match self {
            Self::Datatype => ELEMENT_PROPERTIES,
            Self::Backbone => BACKBONE_ELEMENT_PROPERTIES,
            Self::Resource => DOMAIN_RESOURCE_PROPERTIES,
        }
    }
}

/// Inherited properties followed by a model's own, in FHIR element order.
pub type Properties = Chain<Iter<'static, PropertyDef>, Iter<'static, PropertyDef>>;

/// A FHIR resource, backbone element or datatype with a declared property table.
///
/// `Clone` is a structural deep copy: models own all their data, so a clone
/// shares nothing with the original.
pub trait FhirModel: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// FHIR type name (`Patient`, `Quantity`, `PatientContact`, ...)
    const TYPE_NAME: &'static str;
    const KIND: ModelKind;
    /// Own properties, in FHIR element order
    const PROPERTIES: &'static [PropertyDef];

    fn properties() -> Properties {
        Self::KIND
            .base_properties()
            .iter()
            .chain(Self::PROPERTIES.iter())
    }

    /// Serializes to FHIR JSON with keys in declared element order.
    fn to_json(&self) -> Result<Value> {
        let Value::Object(serialized) = serde_json::to_value(self)? else {
            return Err(Error::ExpectedObject(Self::TYPE_NAME));
        };
        let mut out = Map::new();
        serialize_props_to(&mut out, &serialized, Self::properties());
        Ok(Value::Object(out))
    }

    /// Parses FHIR JSON. Undeclared keys are ignored; resources must carry a
    /// matching `resourceType`.
    fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or(Error::ExpectedObject(Self::TYPE_NAME))?;

        if Self::KIND == ModelKind::Resource {
            check_resource_type(object, Self::TYPE_NAME)?;
        }

        let declared = assign_props(object, Self::properties());
        Ok(serde_json::from_value(Value::Object(declared))?)
    }

    /// Returns a new instance with `patch` overlaid on this one.
    ///
    /// `null` removes a field; patching a choice element replaces whichever
    /// type it held.
    fn with(&self, patch: &Value) -> Result<Self> {
        let patch = patch
            .as_object()
            .ok_or(Error::ExpectedObject(Self::TYPE_NAME))?;
        let Value::Object(mut current) = self.to_json()? else {
            return Err(Error::ExpectedObject(Self::TYPE_NAME));
        };

        merge_props(&mut current, patch, Self::properties());
        Self::from_json(&Value::Object(current))
    }

    /// [`with`](Self::with) applied to the patch computed by `transform`.
    fn apply_transform<F>(&self, transform: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Value,
    {
        let patch = transform(self);
        self.with(&patch)
    }
}

pub(crate) fn check_resource_type(object: &Map<String, Value>, expected: &'static str) -> Result<()> {
    match object.get("resourceType").and_then(Value::as_str) {
        None => Err(Error::MissingResourceType(expected)),
        Some(found) if found != expected => Err(Error::ResourceTypeMismatch {
            expected,
            found: found.to_string(),
        }),
        Some(_) => Ok(()),
    }
}
