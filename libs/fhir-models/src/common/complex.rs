//! General-purpose FHIR datatypes
//!
//! Shapes are the ones shared by R4, R4B and R5. Every datatype embeds an
//! [`Element`] first and declares its own properties in FHIR element order.

use super::choice::{Choice, ChoiceValue};
use super::decimal::FhirDecimal;
use super::element::Element;
use super::model::{FhirModel, ModelKind};
use super::props::PropertyDef;
use crate::builder::{add_primitive_to_array, ElementBuilder, ModelBuilder};
use serde::{Deserialize, Serialize};

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(flatten)]
    pub element: Element,

    /// Identity of the terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// Version of the system - if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version_ext: Option<Element>,

    /// Symbol in syntax defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "_code", skip_serializing_if = "Option::is_none")]
    pub code_ext: Option<Element>,

    /// Representation defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(rename = "_display", skip_serializing_if = "Option::is_none")]
    pub display_ext: Option<Element>,

    /// If this coding was chosen directly by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,

    #[serde(rename = "_userSelected", skip_serializing_if = "Option::is_none")]
    pub user_selected_ext: Option<Element>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

impl FhirModel for Coding {
    const TYPE_NAME: &'static str = "Coding";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("system", "uri"),
        PropertyDef::new("version", "string"),
        PropertyDef::new("code", "code"),
        PropertyDef::new("display", "string"),
        PropertyDef::new("userSelected", "boolean"),
    ];
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(flatten)]
    pub element: Element,

    /// Code defined by a terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,

    /// Plain text representation of the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: Some(vec![coding]),
            ..Default::default()
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

impl FhirModel for CodeableConcept {
    const TYPE_NAME: &'static str = "CodeableConcept";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("coding", "Coding").repeating(),
        PropertyDef::new("text", "string"),
    ];
}

/// A reference from one resource to another
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(flatten)]
    pub element: Element,

    /// Literal reference, Relative, internal or absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "_reference", skip_serializing_if = "Option::is_none")]
    pub reference_ext: Option<Element>,

    /// Type the reference refers to (e.g. "Patient")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub type_ext: Option<Element>,

    /// Logical reference, when literal reference is not known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Box<Identifier>>,

    /// Text alternative for the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(rename = "_display", skip_serializing_if = "Option::is_none")]
    pub display_ext: Option<Element>,
}

impl Reference {
    /// Literal reference such as `Patient/123`.
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }
}

impl FhirModel for Reference {
    const TYPE_NAME: &'static str = "Reference";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("reference", "string"),
        PropertyDef::new("type", "uri"),
        PropertyDef::new("identifier", "Identifier"),
        PropertyDef::new("display", "string"),
    ];
}

/// Reference to a resource or a concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableReference {
    #[serde(flatten)]
    pub element: Element,

    /// Reference to a concept (by class)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<CodeableConcept>,

    /// Reference to a resource (by instance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl FhirModel for CodeableReference {
    const TYPE_NAME: &'static str = "CodeableReference";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("concept", "CodeableConcept"),
        PropertyDef::new("reference", "Reference"),
    ];
}

/// An identifier intended for computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub element: Element,

    /// usual | official | temp | secondary | old
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Description of identifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// The namespace for the identifier value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// The value that is unique
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// Time period when id is/was valid for use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Organization that issued id (may be just text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigner: Option<Reference>,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

impl FhirModel for Identifier {
    const TYPE_NAME: &'static str = "Identifier";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("use", "code"),
        PropertyDef::new("type", "CodeableConcept"),
        PropertyDef::new("system", "uri"),
        PropertyDef::new("value", "string"),
        PropertyDef::new("period", "Period"),
        PropertyDef::new("assigner", "Reference"),
    ];
}

/// A measured or measurable amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(flatten)]
    pub element: Element,

    /// Numerical value (with implicit precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FhirDecimal>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// < | <= | >= | > - how to understand the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,

    #[serde(rename = "_comparator", skip_serializing_if = "Option::is_none")]
    pub comparator_ext: Option<Element>,

    /// Unit representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(rename = "_unit", skip_serializing_if = "Option::is_none")]
    pub unit_ext: Option<Element>,

    /// System that defines coded unit form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// Coded form of the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "_code", skip_serializing_if = "Option::is_none")]
    pub code_ext: Option<Element>,
}

impl Quantity {
    /// UCUM quantity where the unit doubles as its code.
    pub fn ucum(value: impl Into<FhirDecimal>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            value: Some(value.into()),
            unit: Some(unit.clone()),
            system: Some("http://unitsofmeasure.org".to_string()),
            code: Some(unit),
            ..Default::default()
        }
    }
}

impl FhirModel for Quantity {
    const TYPE_NAME: &'static str = "Quantity";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("value", "decimal"),
        PropertyDef::new("comparator", "code"),
        PropertyDef::new("unit", "string"),
        PropertyDef::new("system", "uri"),
        PropertyDef::new("code", "code"),
    ];
}

/// Time range defined by start and end date/time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(flatten)]
    pub element: Element,

    /// Starting time with inclusive boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(rename = "_start", skip_serializing_if = "Option::is_none")]
    pub start_ext: Option<Element>,

    /// End time with inclusive boundary, if not ongoing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(rename = "_end", skip_serializing_if = "Option::is_none")]
    pub end_ext: Option<Element>,
}

impl FhirModel for Period {
    const TYPE_NAME: &'static str = "Period";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("start", "dateTime"),
        PropertyDef::new("end", "dateTime"),
    ];
}

/// Set of values bounded by low and high
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(flatten)]
    pub element: Element,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
}

impl FhirModel for Range {
    const TYPE_NAME: &'static str = "Range";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("low", "Quantity"),
        PropertyDef::new("high", "Quantity"),
    ];
}

/// A ratio of two Quantity values - a numerator and a denominator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    #[serde(flatten)]
    pub element: Element,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerator: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominator: Option<Quantity>,
}

impl FhirModel for Ratio {
    const TYPE_NAME: &'static str = "Ratio";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("numerator", "Quantity"),
        PropertyDef::new("denominator", "Quantity"),
    ];
}

/// Name of a human - parts and usage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(flatten)]
    pub element: Element,

    /// usual | official | temp | nickname | anonymous | old | maiden
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Text representation of the full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    /// Family name (often called 'Surname')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(rename = "_family", skip_serializing_if = "Option::is_none")]
    pub family_ext: Option<Element>,

    /// Given names (not always 'first'). Includes middle names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<Vec<Option<String>>>,

    #[serde(rename = "_given", skip_serializing_if = "Option::is_none")]
    pub given_ext: Option<Vec<Option<Element>>>,

    /// Parts that come before the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<Option<String>>>,

    #[serde(rename = "_prefix", skip_serializing_if = "Option::is_none")]
    pub prefix_ext: Option<Vec<Option<Element>>>,

    /// Parts that come after the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Vec<Option<String>>>,

    #[serde(rename = "_suffix", skip_serializing_if = "Option::is_none")]
    pub suffix_ext: Option<Vec<Option<Element>>>,

    /// Time period when name was/is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl FhirModel for HumanName {
    const TYPE_NAME: &'static str = "HumanName";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("use", "code"),
        PropertyDef::new("text", "string"),
        PropertyDef::new("family", "string"),
        PropertyDef::new("given", "string").repeating(),
        PropertyDef::new("prefix", "string").repeating(),
        PropertyDef::new("suffix", "string").repeating(),
        PropertyDef::new("period", "Period"),
    ];
}

/// An address expressed using postal conventions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(flatten)]
    pub element: Element,

    /// home | work | temp | old | billing - purpose of this address
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// postal | physical | both
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub type_ext: Option<Element>,

    /// Text representation of the address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    /// Street name, number, direction & P.O. Box etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<Option<String>>>,

    /// Extensions on individual lines, aligned by index with `line`
    #[serde(rename = "_line", skip_serializing_if = "Option::is_none")]
    pub line_ext: Option<Vec<Option<Element>>>,

    /// Name of city, town etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(rename = "_city", skip_serializing_if = "Option::is_none")]
    pub city_ext: Option<Element>,

    /// District name (aka county)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(rename = "_district", skip_serializing_if = "Option::is_none")]
    pub district_ext: Option<Element>,

    /// Sub-unit of country (abbreviations ok)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(rename = "_state", skip_serializing_if = "Option::is_none")]
    pub state_ext: Option<Element>,

    /// Postal code for area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(rename = "_postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code_ext: Option<Element>,

    /// Country (e.g. may be ISO 3166 2 or 3 letter code)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(rename = "_country", skip_serializing_if = "Option::is_none")]
    pub country_ext: Option<Element>,

    /// Time period when address was/is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl FhirModel for Address {
    const TYPE_NAME: &'static str = "Address";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("use", "code"),
        PropertyDef::new("type", "code"),
        PropertyDef::new("text", "string"),
        PropertyDef::new("line", "string").repeating(),
        PropertyDef::new("city", "string"),
        PropertyDef::new("district", "string"),
        PropertyDef::new("state", "string"),
        PropertyDef::new("postalCode", "string"),
        PropertyDef::new("country", "string"),
        PropertyDef::new("period", "Period"),
    ];
}

/// Details of a technology mediated contact point (phone, fax, email, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(flatten)]
    pub element: Element,

    /// phone | fax | email | pager | url | sms | other
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// The actual contact point details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// home | work | temp | old | mobile - purpose of this contact point
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Specify preferred order of use (1 = highest)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(rename = "_rank", skip_serializing_if = "Option::is_none")]
    pub rank_ext: Option<Element>,

    /// Time period when the contact point was/is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl FhirModel for ContactPoint {
    const TYPE_NAME: &'static str = "ContactPoint";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("system", "code"),
        PropertyDef::new("value", "string"),
        PropertyDef::new("use", "code"),
        PropertyDef::new("rank", "positiveInt"),
        PropertyDef::new("period", "Period"),
    ];
}

crate::choice_type! {
    /// Annotation.author[x]
    pub enum AnnotationAuthor["author"] {
        Reference(Reference) = "Reference",
        String(String) = "string",
    }
}

/// Text node with attribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(flatten)]
    pub element: Element,

    /// Individual responsible for the annotation
    #[serde(flatten)]
    pub author: Choice<AnnotationAuthor>,

    /// When the annotation was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(rename = "_time", skip_serializing_if = "Option::is_none")]
    pub time_ext: Option<Element>,

    /// The annotation - text content (as markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

impl FhirModel for Annotation {
    const TYPE_NAME: &'static str = "Annotation";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::choice("author", <AnnotationAuthor as ChoiceValue>::TYPES),
        PropertyDef::new("time", "dateTime"),
        PropertyDef::new("text", "markdown").required(),
    ];
}

/// Content in a format defined elsewhere
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(flatten)]
    pub element: Element,

    /// Mime type of the content, with charset etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(rename = "_contentType", skip_serializing_if = "Option::is_none")]
    pub content_type_ext: Option<Element>,

    /// Human language of the content (BCP-47)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "_language", skip_serializing_if = "Option::is_none")]
    pub language_ext: Option<Element>,

    /// Data inline, base64ed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "_data", skip_serializing_if = "Option::is_none")]
    pub data_ext: Option<Element>,

    /// Uri where the data can be found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "_url", skip_serializing_if = "Option::is_none")]
    pub url_ext: Option<Element>,

    /// Hash of the data (sha-1, base64ed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(rename = "_hash", skip_serializing_if = "Option::is_none")]
    pub hash_ext: Option<Element>,

    /// Label to display in place of the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "_title", skip_serializing_if = "Option::is_none")]
    pub title_ext: Option<Element>,

    /// Date attachment was first created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation: Option<String>,

    #[serde(rename = "_creation", skip_serializing_if = "Option::is_none")]
    pub creation_ext: Option<Element>,
}

impl FhirModel for Attachment {
    const TYPE_NAME: &'static str = "Attachment";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("contentType", "code"),
        PropertyDef::new("language", "code"),
        PropertyDef::new("data", "base64Binary"),
        PropertyDef::new("url", "url"),
        PropertyDef::new("hash", "base64Binary"),
        PropertyDef::new("title", "string"),
        PropertyDef::new("creation", "dateTime"),
    ];
}

/// Metadata about a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(flatten)]
    pub element: Element,

    /// Version specific identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(rename = "_versionId", skip_serializing_if = "Option::is_none")]
    pub version_id_ext: Option<Element>,

    /// When the resource version last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    #[serde(rename = "_lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated_ext: Option<Element>,

    /// Identifies where the resource comes from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source_ext: Option<Element>,

    /// Profiles this resource claims to conform to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Vec<Option<String>>>,

    #[serde(rename = "_profile", skip_serializing_if = "Option::is_none")]
    pub profile_ext: Option<Vec<Option<Element>>>,

    /// Security Labels applied to this resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Coding>>,

    /// Tags applied to this resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<Coding>>,
}

impl FhirModel for Meta {
    const TYPE_NAME: &'static str = "Meta";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("versionId", "id"),
        PropertyDef::new("lastUpdated", "instant"),
        PropertyDef::new("source", "uri"),
        PropertyDef::new("profile", "canonical").repeating(),
        PropertyDef::new("security", "Coding").repeating(),
        PropertyDef::new("tag", "Coding").repeating(),
    ];
}

/// Human-readable summary of the resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(flatten)]
    pub element: Element,

    /// generated | extensions | additional | empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Limited xhtml content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,
}

impl FhirModel for Narrative {
    const TYPE_NAME: &'static str = "Narrative";
    const KIND: ModelKind = ModelKind::Datatype;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("status", "code").required(),
        PropertyDef::new("div", "xhtml").required(),
    ];
}

/// Builder for [`Address`]
#[derive(Debug, Clone, Default)]
pub struct AddressBuilder {
    draft: Address,
}

impl Address {
    pub fn builder() -> AddressBuilder {
        AddressBuilder::default()
    }
}

impl AddressBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_use(mut self, use_: impl Into<String>) -> Self {
        self.draft.use_ = Some(use_.into());
        self
    }

    pub fn set_type(mut self, type_: impl Into<String>) -> Self {
        self.draft.type_ = Some(type_.into());
        self
    }

    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.draft.text = Some(text.into());
        self
    }

    pub fn add_line(mut self, line: impl Into<String>) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.line, &mut draft.line_ext, line.into(), None);
        self
    }

    /// Adds a line together with its entry in `_line`.
    pub fn add_line_with_extension(mut self, line: impl Into<String>, extension: Element) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.line, &mut draft.line_ext, line.into(), Some(extension));
        self
    }

    pub fn set_city(mut self, city: impl Into<String>) -> Self {
        self.draft.city = Some(city.into());
        self
    }

    pub fn set_district(mut self, district: impl Into<String>) -> Self {
        self.draft.district = Some(district.into());
        self
    }

    pub fn set_state(mut self, state: impl Into<String>) -> Self {
        self.draft.state = Some(state.into());
        self
    }

    pub fn set_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.draft.postal_code = Some(postal_code.into());
        self
    }

    pub fn set_country(mut self, country: impl Into<String>) -> Self {
        self.draft.country = Some(country.into());
        self
    }

    pub fn set_period(mut self, period: Period) -> Self {
        self.draft.period = Some(period);
        self
    }
}

impl ModelBuilder for AddressBuilder {
    type Model = Address;

    fn draft(&self) -> &Address {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Address {
        &mut self.draft
    }

    fn build(self) -> Address {
        self.draft
    }
}

impl ElementBuilder for AddressBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.element
    }
}

/// Builder for [`HumanName`]
#[derive(Debug, Clone, Default)]
pub struct HumanNameBuilder {
    draft: HumanName,
}

impl HumanName {
    pub fn builder() -> HumanNameBuilder {
        HumanNameBuilder::default()
    }
}

impl HumanNameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_use(mut self, use_: impl Into<String>) -> Self {
        self.draft.use_ = Some(use_.into());
        self
    }

    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.draft.text = Some(text.into());
        self
    }

    pub fn set_family(mut self, family: impl Into<String>) -> Self {
        self.draft.family = Some(family.into());
        self
    }

    pub fn set_family_extension(mut self, extension: Element) -> Self {
        self.draft.family_ext = Some(extension);
        self
    }

    pub fn add_given(mut self, given: impl Into<String>) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.given, &mut draft.given_ext, given.into(), None);
        self
    }

    /// Adds a given name together with its entry in `_given`.
    pub fn add_given_with_extension(mut self, given: impl Into<String>, extension: Element) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.given, &mut draft.given_ext, given.into(), Some(extension));
        self
    }

    pub fn add_prefix(mut self, prefix: impl Into<String>) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.prefix, &mut draft.prefix_ext, prefix.into(), None);
        self
    }

    pub fn add_suffix(mut self, suffix: impl Into<String>) -> Self {
        let draft = &mut self.draft;
        add_primitive_to_array(&mut draft.suffix, &mut draft.suffix_ext, suffix.into(), None);
        self
    }

    pub fn set_period(mut self, period: Period) -> Self {
        self.draft.period = Some(period);
        self
    }
}

impl ModelBuilder for HumanNameBuilder {
    type Model = HumanName;

    fn draft(&self) -> &HumanName {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut HumanName {
        &mut self.draft
    }

    fn build(self) -> HumanName {
        self.draft
    }
}

impl ElementBuilder for HumanNameBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_lines_accumulate_in_call_order() {
        let address = Address::builder()
            .add_line("221B Baker St")
            .add_line("Flat 2")
            .build();

        assert_eq!(
            address.to_json().unwrap(),
            json!({"line": ["221B Baker St", "Flat 2"]})
        );
    }

    #[test]
    fn address_output_follows_declared_order() {
        let address = Address::builder()
            .set_country("UK")
            .set_city("London")
            .add_line("221B Baker St")
            .set_use("home")
            .set_id("addr-1")
            .build();

        let json = address.to_json().unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "use", "line", "city", "country"]);
    }

    #[test]
    fn address_line_may_be_null_when_its_shadow_is_not() {
        let input = json!({"line": [null, "Flat 2"], "_line": [{"id": "l0"}, null]});

        let address = Address::from_json(&input).unwrap();
        assert_eq!(address.line, Some(vec![None, Some("Flat 2".to_string())]));
        assert_eq!(address.to_json().unwrap(), input);
    }

    #[test]
    fn line_extensions_align_with_lines() {
        let address = Address::builder()
            .add_line("1 Main St")
            .add_line_with_extension(
                "Unit 4",
                Element {
                    id: Some("unit".into()),
                    ..Default::default()
                },
            )
            .build();

        assert_eq!(
            address.to_json().unwrap(),
            json!({"line": ["1 Main St", "Unit 4"], "_line": [null, {"id": "unit"}]})
        );
    }

    #[test]
    fn address_line_shadow_round_trips() {
        let input = json!({
            "line": ["1 Main St", "Unit 4"],
            "_line": [null, {"extension": [{"url": "http://example.org/unit", "valueString": "4"}]}]
        });

        let address = Address::from_json(&input).unwrap();
        let shadows = address.line_ext.as_ref().unwrap();
        assert!(shadows[0].is_none());
        assert!(shadows[1].is_some());
        assert_eq!(address.to_json().unwrap(), input);
    }

    #[test]
    fn reference_and_identifier_nest() {
        let reference = Reference {
            identifier: Some(Box::new(Identifier::new("urn:oid:1.2.3", "A-1"))),
            display: Some("Org".into()),
            ..Default::default()
        };

        assert_eq!(
            reference.to_json().unwrap(),
            json!({
                "identifier": {"system": "urn:oid:1.2.3", "value": "A-1"},
                "display": "Org"
            })
        );
    }

    #[test]
    fn annotation_author_is_a_choice() {
        let annotation = Annotation::from_json(&json!({
            "authorString": "Dr. Watson",
            "text": "Patient feels better"
        }))
        .unwrap();
        assert_eq!(
            annotation.author.value(),
            Some(&AnnotationAuthor::String("Dr. Watson".into()))
        );

        let switched = annotation
            .with(&json!({"authorReference": {"reference": "Practitioner/1"}}))
            .unwrap();
        assert_eq!(
            switched.to_json().unwrap(),
            json!({
                "authorReference": {"reference": "Practitioner/1"},
                "text": "Patient feels better"
            })
        );
    }

    #[test]
    fn human_name_builder() {
        let name = HumanName::builder()
            .set_family("Holmes")
            .add_given("Sherlock")
            .add_given("Scott")
            .set_use("official")
            .build();

        assert_eq!(
            name.to_json().unwrap(),
            json!({"use": "official", "family": "Holmes", "given": ["Sherlock", "Scott"]})
        );
    }

    #[test]
    fn human_name_shadows_round_trip() {
        let input = json!({
            "family": "Holmes",
            "_family": {"id": "f1"},
            "given": ["S"],
            "_given": [{"id": "g"}]
        });

        let name = HumanName::from_json(&input).unwrap();
        assert_eq!(name.family_ext.as_ref().and_then(|e| e.id.as_deref()), Some("f1"));
        assert_eq!(name.to_json().unwrap(), input);
    }

    #[test]
    fn coding_and_quantity_shadows_round_trip() {
        let coding = json!({
            "system": "http://loinc.org",
            "_system": {"id": "s"},
            "code": "8867-4",
            "_code": {"extension": [{"url": "http://example.org/origin", "valueCode": "lab"}]}
        });
        assert_eq!(Coding::from_json(&coding).unwrap().to_json().unwrap(), coding);

        let quantity = json!({"value": 72, "_value": {"id": "v"}, "unit": "kg", "_unit": {"id": "u"}});
        assert_eq!(Quantity::from_json(&quantity).unwrap().to_json().unwrap(), quantity);
    }

    #[test]
    fn quantity_keeps_written_precision() {
        let input: serde_json::Value =
            serde_json::from_str(r#"{"value":1.50,"unit":"mg"}"#).unwrap();
        let quantity = Quantity::from_json(&input).unwrap();
        assert_eq!(quantity.value.map(|v| v.scale()), Some(2));
        assert_eq!(
            serde_json::to_string(&quantity.to_json().unwrap()).unwrap(),
            r#"{"value":1.50,"unit":"mg"}"#
        );
    }

    #[test]
    fn ucum_quantity() {
        let q = Quantity::ucum(72, "kg");
        assert_eq!(q.value, Some(FhirDecimal::from(72)));
        assert_eq!(q.code.as_deref(), Some("kg"));
        assert_eq!(q.system.as_deref(), Some("http://unitsofmeasure.org"));
    }

    #[test]
    fn clone_shares_no_nested_data() {
        let original = CodeableConcept::from_coding(Coding::new("http://loinc.org", "8867-4"));
        let mut copy = original.clone();
        if let Some(codings) = copy.coding.as_mut() {
            codings[0].code = Some("changed".into());
            codings.push(Coding::new("http://snomed.info/sct", "364075005"));
        }

        let codings = original.coding.as_ref().unwrap();
        assert_eq!(codings.len(), 1);
        assert_eq!(codings[0].code.as_deref(), Some("8867-4"));
    }
}
