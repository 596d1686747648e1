//! Patient resource

use crate::builder::{
    add_to_array, set_choice, BackboneElementBuilder, DomainResourceBuilder, ElementBuilder,
    ModelBuilder,
};
use crate::common::{
    Address, BackboneElement, Choice, ChoiceValue, CodeableConcept, ContactPoint, DomainResource,
    Element, FhirModel, HumanName, Identifier, ModelKind, Period, PropertyDef, Reference,
};
use serde::{Deserialize, Serialize};

crate::choice_type! {
    /// Patient.deceased[x]
    pub enum PatientDeceased["deceased"] {
        Boolean(bool) = "boolean",
        DateTime(String) = "dateTime",
    }
}

crate::choice_type! {
    /// Patient.multipleBirth[x]
    pub enum PatientMultipleBirth["multipleBirth"] {
        Boolean(bool) = "boolean",
        Integer(i32) = "integer",
    }
}

/// Information about an individual receiving health care services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct Patient {
    #[serde(flatten)]
    pub base: DomainResource,

    /// An identifier for this patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Whether this patient's record is in active use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(rename = "_active", skip_serializing_if = "Option::is_none")]
    pub active_ext: Option<Element>,

    /// A name associated with the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,

    /// A contact detail for the individual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(rename = "_gender", skip_serializing_if = "Option::is_none")]
    pub gender_ext: Option<Element>,

    /// The date of birth for the individual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "_birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date_ext: Option<Element>,

    /// Indicates if the individual is deceased or not
    #[serde(flatten)]
    pub deceased: Choice<PatientDeceased>,

    /// An address for the individual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    /// Marital (civil) status of a patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,

    /// Whether patient is part of a multiple birth
    #[serde(flatten)]
    pub multiple_birth: Choice<PatientMultipleBirth>,

    /// A contact party (e.g. guardian, partner, friend) for the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Vec<PatientContact>>,

    /// Patient's nominated primary care provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_practitioner: Option<Vec<Reference>>,

    /// Organization that is the custodian of the patient record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
}

impl Patient {
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }
}

impl FhirModel for Patient {
    const TYPE_NAME: &'static str = "Patient";
    const KIND: ModelKind = ModelKind::Resource;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("identifier", "Identifier").repeating(),
        PropertyDef::new("active", "boolean"),
        PropertyDef::new("name", "HumanName").repeating(),
        PropertyDef::new("telecom", "ContactPoint").repeating(),
        PropertyDef::new("gender", "code"),
        PropertyDef::new("birthDate", "date"),
        PropertyDef::choice("deceased", <PatientDeceased as ChoiceValue>::TYPES),
        PropertyDef::new("address", "Address").repeating(),
        PropertyDef::new("maritalStatus", "CodeableConcept"),
        PropertyDef::choice("multipleBirth", <PatientMultipleBirth as ChoiceValue>::TYPES),
        PropertyDef::new("contact", "PatientContact").repeating(),
        PropertyDef::new("generalPractitioner", "Reference").repeating(),
        PropertyDef::new("managingOrganization", "Reference"),
    ];
}

/// A contact party (e.g. guardian, partner, friend) for the patient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientContact {
    #[serde(flatten)]
    pub base: BackboneElement,

    /// The kind of relationship
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Vec<CodeableConcept>>,

    /// A name associated with the contact person
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,

    /// A contact detail for the person
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    /// Address for the contact person
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(rename = "_gender", skip_serializing_if = "Option::is_none")]
    pub gender_ext: Option<Element>,

    /// Organization that is associated with the contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Reference>,

    /// The period during which this contact person or organization is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl PatientContact {
    pub fn builder() -> PatientContactBuilder {
        PatientContactBuilder::default()
    }
}

impl FhirModel for PatientContact {
    const TYPE_NAME: &'static str = "PatientContact";
    const KIND: ModelKind = ModelKind::Backbone;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("relationship", "CodeableConcept").repeating(),
        PropertyDef::new("name", "HumanName"),
        PropertyDef::new("telecom", "ContactPoint").repeating(),
        PropertyDef::new("address", "Address"),
        PropertyDef::new("gender", "code"),
        PropertyDef::new("organization", "Reference"),
        PropertyDef::new("period", "Period"),
    ];
}

/// Builder for [`Patient`]
#[derive(Debug, Clone, Default)]
pub struct PatientBuilder {
    draft: Patient,
}

impl PatientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_identifier(mut self, identifier: Identifier) -> Self {
        add_to_array(&mut self.draft.identifier, identifier);
        self
    }

    pub fn set_active(mut self, active: bool) -> Self {
        self.draft.active = Some(active);
        self
    }

    pub fn set_active_extension(mut self, extension: Element) -> Self {
        self.draft.active_ext = Some(extension);
        self
    }

    pub fn add_name(mut self, name: HumanName) -> Self {
        add_to_array(&mut self.draft.name, name);
        self
    }

    pub fn add_telecom(mut self, telecom: ContactPoint) -> Self {
        add_to_array(&mut self.draft.telecom, telecom);
        self
    }

    pub fn set_gender(mut self, gender: impl Into<String>) -> Self {
        self.draft.gender = Some(gender.into());
        self
    }

    pub fn set_gender_extension(mut self, extension: Element) -> Self {
        self.draft.gender_ext = Some(extension);
        self
    }

    pub fn set_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.draft.birth_date = Some(birth_date.into());
        self
    }

    pub fn set_birth_date_extension(mut self, extension: Element) -> Self {
        self.draft.birth_date_ext = Some(extension);
        self
    }

    pub fn set_deceased(mut self, deceased: PatientDeceased) -> Self {
        set_choice(&mut self.draft.deceased, deceased);
        self
    }

    pub fn add_address(mut self, address: Address) -> Self {
        add_to_array(&mut self.draft.address, address);
        self
    }

    pub fn set_marital_status(mut self, marital_status: CodeableConcept) -> Self {
        self.draft.marital_status = Some(marital_status);
        self
    }

    pub fn set_multiple_birth(mut self, multiple_birth: PatientMultipleBirth) -> Self {
        set_choice(&mut self.draft.multiple_birth, multiple_birth);
        self
    }

    pub fn add_contact(mut self, contact: PatientContact) -> Self {
        add_to_array(&mut self.draft.contact, contact);
        self
    }

    pub fn add_general_practitioner(mut self, practitioner: Reference) -> Self {
        add_to_array(&mut self.draft.general_practitioner, practitioner);
        self
    }

    pub fn set_managing_organization(mut self, organization: Reference) -> Self {
        self.draft.managing_organization = Some(organization);
        self
    }
}

impl ModelBuilder for PatientBuilder {
    type Model = Patient;

    fn draft(&self) -> &Patient {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Patient {
        &mut self.draft
    }

    fn build(self) -> Patient {
        self.draft
    }
}

impl DomainResourceBuilder for PatientBuilder {
    fn resource_mut(&mut self) -> &mut DomainResource {
        &mut self.draft.base
    }
}

/// Builder for [`PatientContact`]
#[derive(Debug, Clone, Default)]
pub struct PatientContactBuilder {
    draft: PatientContact,
}

impl PatientContactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_relationship(mut self, relationship: CodeableConcept) -> Self {
        add_to_array(&mut self.draft.relationship, relationship);
        self
    }

    pub fn set_name(mut self, name: HumanName) -> Self {
        self.draft.name = Some(name);
        self
    }

    pub fn add_telecom(mut self, telecom: ContactPoint) -> Self {
        add_to_array(&mut self.draft.telecom, telecom);
        self
    }

    pub fn set_address(mut self, address: Address) -> Self {
        self.draft.address = Some(address);
        self
    }

    pub fn set_gender(mut self, gender: impl Into<String>) -> Self {
        self.draft.gender = Some(gender.into());
        self
    }

    pub fn set_organization(mut self, organization: Reference) -> Self {
        self.draft.organization = Some(organization);
        self
    }

    pub fn set_period(mut self, period: Period) -> Self {
        self.draft.period = Some(period);
        self
    }
}

impl ModelBuilder for PatientContactBuilder {
    type Model = PatientContact;

    fn draft(&self) -> &PatientContact {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut PatientContact {
        &mut self.draft
    }

    fn build(self) -> PatientContact {
        self.draft
    }
}

impl ElementBuilder for PatientContactBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.base.element
    }
}

impl BackboneElementBuilder for PatientContactBuilder {
    fn backbone_mut(&mut self) -> &mut BackboneElement {
        &mut self.draft.base
    }
}
