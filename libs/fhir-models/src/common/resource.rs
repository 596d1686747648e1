//! DomainResource base
//!
//! Resource structs embed a [`DomainResource`] as their first flattened field
//! and tag themselves with `#[serde(tag = "resourceType")]`, so the inherited
//! keys always lead the serialized object.

use super::complex::{Meta, Narrative};
use super::element::{Element, Extension};
use crate::resources::Resource;
use serde::{Deserialize, Serialize};

/// Fields every domain resource carries ahead of its own elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResource {
    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Metadata about the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// A set of rules under which this content was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,

    #[serde(rename = "_implicitRules", skip_serializing_if = "Option::is_none")]
    pub implicit_rules_ext: Option<Element>,

    /// Language of the resource content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "_language", skip_serializing_if = "Option::is_none")]
    pub language_ext: Option<Element>,

    /// Text summary of the resource, for human interpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    /// Contained, inline Resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Resource>>,

    /// Additional content defined by implementations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Extensions that cannot be ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,
}

impl DomainResource {
    /// Looks up a contained resource by its local id (without the leading `#`).
    pub fn find_contained(&self, id: &str) -> Option<&Resource> {
        self.contained
            .as_ref()?
            .iter()
            .find(|resource| resource.id() == Some(id))
    }
}
