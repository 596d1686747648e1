//! Runtime lookup of model property tables by FHIR type name

use crate::common::props::KeyMatch;
use crate::common::*;
use crate::resources::*;

/// Property table of one modelled type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: &'static str,
    pub kind: ModelKind,
    own: &'static [PropertyDef],
}

impl TypeInfo {
    pub const fn of<M: FhirModel>() -> Self {
        Self {
            name: M::TYPE_NAME,
            kind: M::KIND,
            own: M::PROPERTIES,
        }
    }

    /// Inherited and own properties, in element order.
    pub fn properties(&self) -> impl Iterator<Item = &'static PropertyDef> {
        self.kind.base_properties().iter().chain(self.own.iter())
    }

    pub fn property(&self, name: &str) -> Option<&'static PropertyDef> {
        self.properties().find(|p| p.name == name)
    }

    /// Classifies a JSON key as the value or shadow of a declared property.
    pub fn property_for_key(&self, key: &str) -> Option<KeyMatch> {
        self.properties().find_map(|p| p.match_key(key))
    }

    pub fn is_resource(&self) -> bool {
        self.kind == ModelKind::Resource
    }
}

/// The shape of a primitive shadow (`_birthDate`): just `id` and `extension`.
const ELEMENT: TypeInfo = TypeInfo {
    name: "Element",
    kind: ModelKind::Datatype,
    own: &[],
};

static TYPES: &[TypeInfo] = &[
    ELEMENT,
    TypeInfo::of::<Extension>(),
    TypeInfo::of::<Coding>(),
    TypeInfo::of::<CodeableConcept>(),
    TypeInfo::of::<CodeableReference>(),
    TypeInfo::of::<Reference>(),
    TypeInfo::of::<Identifier>(),
    TypeInfo::of::<Quantity>(),
    TypeInfo::of::<Period>(),
    TypeInfo::of::<Range>(),
    TypeInfo::of::<Ratio>(),
    TypeInfo::of::<HumanName>(),
    TypeInfo::of::<Address>(),
    TypeInfo::of::<ContactPoint>(),
    TypeInfo::of::<Annotation>(),
    TypeInfo::of::<Attachment>(),
    TypeInfo::of::<Meta>(),
    TypeInfo::of::<Narrative>(),
    TypeInfo::of::<Patient>(),
    TypeInfo::of::<PatientContact>(),
    TypeInfo::of::<Observation>(),
    TypeInfo::of::<ObservationComponent>(),
    TypeInfo::of::<Medication>(),
    TypeInfo::of::<MedicationIngredient>(),
];

/// Looks up a modelled type by its FHIR name.
pub fn lookup(type_name: &str) -> Option<TypeInfo> {
    TYPES.iter().find(|t| t.name == type_name).copied()
}

/// Every modelled type.
pub fn types() -> &'static [TypeInfo] {
    TYPES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_resources_and_backbones() {
        let patient = lookup("Patient").unwrap();
        assert!(patient.is_resource());
        assert_eq!(patient.properties().next().map(|p| p.name), Some("resourceType"));

        let contact = lookup("PatientContact").unwrap();
        assert_eq!(contact.kind, ModelKind::Backbone);
        assert!(contact.property("modifierExtension").is_some());

        assert!(lookup("Practitioner").is_none());
    }

    #[test]
    fn property_for_key_resolves_choice_siblings() {
        let observation = lookup("Observation").unwrap();

        let m = observation.property_for_key("valueCodeableConcept").unwrap();
        assert_eq!(m.property.name, "value");
        assert_eq!(m.type_code, "CodeableConcept");
        assert!(!m.is_shadow);

        let m = observation.property_for_key("_status").unwrap();
        assert!(m.is_shadow);
        assert_eq!(m.type_code, "code");

        assert!(observation.property_for_key("valueFoo").is_none());
    }

    #[test]
    fn type_names_are_unique() {
        let mut names: Vec<&str> = types().iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), types().len());
    }
}
