//! Element bases shared by every model
//!
//! FHIR's Element → BackboneElement hierarchy is expressed by composition:
//! each datatype embeds an [`Element`] and each backbone element embeds a
//! [`BackboneElement`] as its first, flattened field, which also puts the
//! inherited keys first in the JSON output.

use super::choice::{Choice, ChoiceValue};
use super::complex::*;
use super::decimal::FhirDecimal;
use super::model::{FhirModel, ModelKind};
use super::props::PropertyDef;
use crate::builder::{add_to_array, set_choice, ElementBuilder, ModelBuilder};
use serde::{Deserialize, Serialize};

/// Base of all elements: an id plus extensions.
///
/// Also the shape of a primitive-extension shadow (`_birthDate`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique id for inter-element referencing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Additional content defined by implementations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,
}

impl Element {
    /// Element carrying a single extension, the usual primitive shadow.
    pub fn with_extension(extension: Extension) -> Self {
        Self {
            id: None,
            extension: Some(vec![extension]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Base for elements defined inline within a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackboneElement {
    #[serde(flatten)]
    pub element: Element,

    /// Extensions that cannot be ignored even if unrecognized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,
}

crate::choice_type! {
    /// Extension.value[x]
    pub enum ExtensionValue["value"] {
        Base64Binary(String) = "base64Binary",
        Boolean(bool) = "boolean",
        Canonical(String) = "canonical",
        Code(String) = "code",
        Date(String) = "date",
        DateTime(String) = "dateTime",
        Decimal(FhirDecimal) = "decimal",
        Id(String) = "id",
        Instant(String) = "instant",
        Integer(i32) = "integer",
        Markdown(String) = "markdown",
        Oid(String) = "oid",
        PositiveInt(u32) = "positiveInt",
        String(String) = "string",
        Time(String) = "time",
        UnsignedInt(u32) = "unsignedInt",
        Uri(String) = "uri",
        Url(String) = "url",
        Uuid(String) = "uuid",
        Address(Address) = "Address",
        Annotation(Annotation) = "Annotation",
        Attachment(Attachment) = "Attachment",
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        CodeableReference(CodeableReference) = "CodeableReference" since R5,
        Coding(Coding) = "Coding",
        ContactPoint(ContactPoint) = "ContactPoint",
        HumanName(HumanName) = "HumanName",
        Identifier(Identifier) = "Identifier",
        Period(Period) = "Period",
        Quantity(Quantity) = "Quantity",
        Range(Range) = "Range",
        Ratio(Ratio) = "Ratio",
        Reference(Reference) = "Reference",
    }
}

/// Optional extension element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(flatten)]
    pub element: Element,

    /// Identifies the meaning of the extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Value of extension
    #[serde(flatten)]
    pub value: Choice<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_value(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: Some(url.into()),
            value: Choice::of(value),
            ..Default::default()
        }
    }

    pub fn builder(url: impl Into<String>) -> ExtensionBuilder {
        ExtensionBuilder::new(url)
    }
}

impl FhirModel for Extension {
    const TYPE_NAME: &'static str = "Extension";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("url", "uri").required().without_extensions(),
        PropertyDef::choice("value", <ExtensionValue as ChoiceValue>::TYPES),
    ];
}

/// Builder for [`Extension`]
#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    draft: Extension,
}

impl ExtensionBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            draft: Extension::new(url),
        }
    }

    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.draft.url = Some(url.into());
        self
    }

    pub fn set_value(mut self, value: ExtensionValue) -> Self {
        set_choice(&mut self.draft.value, value);
        self
    }

    /// Adds a nested extension (complex extensions carry no value).
    pub fn add_nested(mut self, extension: Extension) -> Self {
        add_to_array(&mut self.draft.element.extension, extension);
        self
    }
}

impl ModelBuilder for ExtensionBuilder {
    type Model = Extension;

    fn draft(&self) -> &Extension {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Extension {
        &mut self.draft
    }

    fn build(self) -> Extension {
        self.draft
    }
}

impl ElementBuilder for ExtensionBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.element
    }
}
