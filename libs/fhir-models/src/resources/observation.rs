//! Observation resource

use crate::builder::{
    add_to_array, set_choice, BackboneElementBuilder, DomainResourceBuilder, ElementBuilder,
    ModelBuilder,
};
use crate::common::{
    Annotation, Attachment, BackboneElement, Choice, ChoiceValue, CodeableConcept, DomainResource,
    Element, FhirModel, Identifier, ModelKind, Period, PropertyDef, Quantity, Range, Ratio,
    Reference,
};
use serde::{Deserialize, Serialize};

crate::choice_type! {
    /// Observation.effective[x]
    pub enum ObservationEffective["effective"] {
        DateTime(String) = "dateTime",
        Period(Period) = "Period",
        Instant(String) = "instant",
    }
}

crate::choice_type! {
    /// Observation.value[x] and Observation.component.value[x]
    pub enum ObservationValue["value"] {
        Quantity(Quantity) = "Quantity",
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        String(String) = "string",
        Boolean(bool) = "boolean",
        Integer(i32) = "integer",
        Range(Range) = "Range",
        Ratio(Ratio) = "Ratio",
        Time(String) = "time",
        DateTime(String) = "dateTime",
        Period(Period) = "Period",
        Attachment(Attachment) = "Attachment" since R5,
        Reference(Reference) = "Reference" since R5,
    }
}

/// Measurements and simple assertions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct Observation {
    #[serde(flatten)]
    pub base: DomainResource,

    /// Business Identifier for observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Fulfills plan, proposal or order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    /// registered | preliminary | final | amended +
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Classification of type of observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Type of observation (code / type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// Who and/or what the observation is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    /// Healthcare event during which this observation is made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    /// Clinically relevant time/time-period for observation
    #[serde(flatten)]
    pub effective: Choice<ObservationEffective>,

    /// Date/Time this version was made available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    #[serde(rename = "_issued", skip_serializing_if = "Option::is_none")]
    pub issued_ext: Option<Element>,

    /// Who is responsible for the observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    /// Actual result
    #[serde(flatten)]
    pub value: Choice<ObservationValue>,

    /// Why the result is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,

    /// High, low, normal, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,

    /// Comments about the observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    /// Observed body part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<CodeableConcept>,

    /// How it was done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CodeableConcept>,

    /// Related resource that belongs to the Observation group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_member: Option<Vec<Reference>>,

    /// Component results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Vec<ObservationComponent>>,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }
}

impl FhirModel for Observation {
    const TYPE_NAME: &'static str = "Observation";
    const KIND: ModelKind = ModelKind::Resource;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("identifier", "Identifier").repeating(),
        PropertyDef::new("basedOn", "Reference").repeating(),
        PropertyDef::new("status", "code").required(),
        PropertyDef::new("category", "CodeableConcept").repeating(),
        PropertyDef::new("code", "CodeableConcept").required(),
        PropertyDef::new("subject", "Reference"),
        PropertyDef::new("encounter", "Reference"),
        PropertyDef::choice("effective", <ObservationEffective as ChoiceValue>::TYPES),
        PropertyDef::new("issued", "instant"),
        PropertyDef::new("performer", "Reference").repeating(),
        PropertyDef::choice("value", <ObservationValue as ChoiceValue>::TYPES),
        PropertyDef::new("dataAbsentReason", "CodeableConcept"),
        PropertyDef::new("interpretation", "CodeableConcept").repeating(),
        PropertyDef::new("note", "Annotation").repeating(),
        PropertyDef::new("bodySite", "CodeableConcept"),
        PropertyDef::new("method", "CodeableConcept"),
        PropertyDef::new("hasMember", "Reference").repeating(),
        PropertyDef::new("component", "ObservationComponent").repeating(),
    ];
}

/// Component results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(flatten)]
    pub base: BackboneElement,

    /// Type of component observation (code / type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// Actual component result
    #[serde(flatten)]
    pub value: Choice<ObservationValue>,

    /// Why the component result is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,

    /// High, low, normal, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,
}

impl ObservationComponent {
    pub fn builder() -> ObservationComponentBuilder {
        ObservationComponentBuilder::default()
    }
}

impl FhirModel for ObservationComponent {
    const TYPE_NAME: &'static str = "ObservationComponent";
    const KIND: ModelKind = ModelKind::Backbone;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("code", "CodeableConcept").required(),
        PropertyDef::choice("value", <ObservationValue as ChoiceValue>::TYPES),
        PropertyDef::new("dataAbsentReason", "CodeableConcept"),
        PropertyDef::new("interpretation", "CodeableConcept").repeating(),
    ];
}

/// Builder for [`Observation`]
#[derive(Debug, Clone, Default)]
pub struct ObservationBuilder {
    draft: Observation,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_identifier(mut self, identifier: Identifier) -> Self {
        add_to_array(&mut self.draft.identifier, identifier);
        self
    }

    pub fn add_based_on(mut self, based_on: Reference) -> Self {
        add_to_array(&mut self.draft.based_on, based_on);
        self
    }

    pub fn set_status(mut self, status: impl Into<String>) -> Self {
        self.draft.status = Some(status.into());
        self
    }

    pub fn set_status_extension(mut self, extension: Element) -> Self {
        self.draft.status_ext = Some(extension);
        self
    }

    pub fn add_category(mut self, category: CodeableConcept) -> Self {
        add_to_array(&mut self.draft.category, category);
        self
    }

    pub fn set_code(mut self, code: CodeableConcept) -> Self {
        self.draft.code = Some(code);
        self
    }

    pub fn set_subject(mut self, subject: Reference) -> Self {
        self.draft.subject = Some(subject);
        self
    }

    pub fn set_encounter(mut self, encounter: Reference) -> Self {
        self.draft.encounter = Some(encounter);
        self
    }

    pub fn set_effective(mut self, effective: ObservationEffective) -> Self {
        set_choice(&mut self.draft.effective, effective);
        self
    }

    pub fn set_issued(mut self, issued: impl Into<String>) -> Self {
        self.draft.issued = Some(issued.into());
        self
    }

    pub fn set_issued_extension(mut self, extension: Element) -> Self {
        self.draft.issued_ext = Some(extension);
        self
    }

    pub fn add_performer(mut self, performer: Reference) -> Self {
        add_to_array(&mut self.draft.performer, performer);
        self
    }

    pub fn set_value(mut self, value: ObservationValue) -> Self {
        set_choice(&mut self.draft.value, value);
        self
    }

    /// Sets a primitive value together with its `_value<Type>` extension.
    pub fn set_value_with_extension(mut self, value: ObservationValue, extension: Element) -> Self {
        self.draft.value.set_with_extension(value, extension);
        self
    }

    pub fn set_data_absent_reason(mut self, reason: CodeableConcept) -> Self {
        self.draft.data_absent_reason = Some(reason);
        self
    }

    pub fn add_interpretation(mut self, interpretation: CodeableConcept) -> Self {
        add_to_array(&mut self.draft.interpretation, interpretation);
        self
    }

    pub fn add_note(mut self, note: Annotation) -> Self {
        add_to_array(&mut self.draft.note, note);
        self
    }

    pub fn set_body_site(mut self, body_site: CodeableConcept) -> Self {
        self.draft.body_site = Some(body_site);
        self
    }

    pub fn set_method(mut self, method: CodeableConcept) -> Self {
        self.draft.method = Some(method);
        self
    }

    pub fn add_has_member(mut self, member: Reference) -> Self {
        add_to_array(&mut self.draft.has_member, member);
        self
    }

    pub fn add_component(mut self, component: ObservationComponent) -> Self {
        add_to_array(&mut self.draft.component, component);
        self
    }
}

impl ModelBuilder for ObservationBuilder {
    type Model = Observation;

    fn draft(&self) -> &Observation {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Observation {
        &mut self.draft
    }

    fn build(self) -> Observation {
        self.draft
    }
}

impl DomainResourceBuilder for ObservationBuilder {
    fn resource_mut(&mut self) -> &mut DomainResource {
        &mut self.draft.base
    }
}

/// Builder for [`ObservationComponent`]
#[derive(Debug, Clone, Default)]
pub struct ObservationComponentBuilder {
    draft: ObservationComponent,
}

impl ObservationComponentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_code(mut self, code: CodeableConcept) -> Self {
        self.draft.code = Some(code);
        self
    }

    pub fn set_value(mut self, value: ObservationValue) -> Self {
        set_choice(&mut self.draft.value, value);
        self
    }

    pub fn set_data_absent_reason(mut self, reason: CodeableConcept) -> Self {
        self.draft.data_absent_reason = Some(reason);
        self
    }

    pub fn add_interpretation(mut self, interpretation: CodeableConcept) -> Self {
        add_to_array(&mut self.draft.interpretation, interpretation);
        self
    }
}

impl ModelBuilder for ObservationComponentBuilder {
    type Model = ObservationComponent;

    fn draft(&self) -> &ObservationComponent {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut ObservationComponent {
        &mut self.draft
    }

    fn build(self) -> ObservationComponent {
        self.draft
    }
}

impl ElementBuilder for ObservationComponentBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.base.element
    }
}

impl BackboneElementBuilder for ObservationComponentBuilder {
    fn backbone_mut(&mut self) -> &mut BackboneElement {
        &mut self.draft.base
    }
}
