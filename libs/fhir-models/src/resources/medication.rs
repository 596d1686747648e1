//! Medication resource

use crate::builder::{
    add_to_array, set_choice, BackboneElementBuilder, DomainResourceBuilder, ElementBuilder,
    ModelBuilder,
};
use crate::common::{
    BackboneElement, Choice, ChoiceValue, CodeableConcept, DomainResource, Element, FhirModel,
    Identifier, ModelKind, PropertyDef, Ratio, Reference,
};
use serde::{Deserialize, Serialize};

crate::choice_type! {
    /// Medication.ingredient.item[x]
    pub enum IngredientItem["item"] {
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        Reference(Reference) = "Reference",
    }
}

/// Definition of a Medication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct Medication {
    #[serde(flatten)]
    pub base: DomainResource,

    /// Business identifier for this medication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Codes that identify this medication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// active | inactive | entered-in-error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Manufacturer of the item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Reference>,

    /// powder | tablets | capsule +
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<CodeableConcept>,

    /// Amount of drug in package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Ratio>,

    /// Active or inactive ingredient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<Vec<MedicationIngredient>>,
}

impl Medication {
    pub fn builder() -> MedicationBuilder {
        MedicationBuilder::default()
    }
}

impl FhirModel for Medication {
    const TYPE_NAME: &'static str = "Medication";
    const KIND: ModelKind = ModelKind::Resource;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("identifier", "Identifier").repeating(),
        PropertyDef::new("code", "CodeableConcept"),
        PropertyDef::new("status", "code"),
        PropertyDef::new("manufacturer", "Reference"),
        PropertyDef::new("form", "CodeableConcept"),
        PropertyDef::new("amount", "Ratio"),
        PropertyDef::new("ingredient", "MedicationIngredient").repeating(),
    ];
}

/// Active or inactive ingredient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationIngredient {
    #[serde(flatten)]
    pub base: BackboneElement,

    /// The actual ingredient or content
    #[serde(flatten)]
    pub item: Choice<IngredientItem>,

    /// Active ingredient indicator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(rename = "_isActive", skip_serializing_if = "Option::is_none")]
    pub is_active_ext: Option<Element>,

    /// Quantity of ingredient present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<Ratio>,
}

impl MedicationIngredient {
    pub fn builder() -> MedicationIngredientBuilder {
        MedicationIngredientBuilder::default()
    }
}

impl FhirModel for MedicationIngredient {
    const TYPE_NAME: &'static str = "MedicationIngredient";
    const KIND: ModelKind = ModelKind::Backbone;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::choice("item", <IngredientItem as ChoiceValue>::TYPES).required(),
        PropertyDef::new("isActive", "boolean"),
        PropertyDef::new("strength", "Ratio"),
    ];
}

/// Builder for [`Medication`]
#[derive(Debug, Clone, Default)]
pub struct MedicationBuilder {
    draft: Medication,
}

impl MedicationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_identifier(mut self, identifier: Identifier) -> Self {
        add_to_array(&mut self.draft.identifier, identifier);
        self
    }

    pub fn set_code(mut self, code: CodeableConcept) -> Self {
        self.draft.code = Some(code);
        self
    }

    pub fn set_status(mut self, status: impl Into<String>) -> Self {
        self.draft.status = Some(status.into());
        self
    }

    pub fn set_manufacturer(mut self, manufacturer: Reference) -> Self {
        self.draft.manufacturer = Some(manufacturer);
        self
    }

    pub fn set_form(mut self, form: CodeableConcept) -> Self {
        self.draft.form = Some(form);
        self
    }

    pub fn set_amount(mut self, amount: Ratio) -> Self {
        self.draft.amount = Some(amount);
        self
    }

    pub fn add_ingredient(mut self, ingredient: MedicationIngredient) -> Self {
        add_to_array(&mut self.draft.ingredient, ingredient);
        self
    }
}

impl ModelBuilder for MedicationBuilder {
    type Model = Medication;

    fn draft(&self) -> &Medication {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Medication {
        &mut self.draft
    }

    fn build(self) -> Medication {
        self.draft
    }
}

impl DomainResourceBuilder for MedicationBuilder {
    fn resource_mut(&mut self) -> &mut DomainResource {
        &mut self.draft.base
    }
}

/// Builder for [`MedicationIngredient`]
#[derive(Debug, Clone, Default)]
pub struct MedicationIngredientBuilder {
    draft: MedicationIngredient,
}

impl MedicationIngredientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(mut self, item: IngredientItem) -> Self {
        set_choice(&mut self.draft.item, item);
        self
    }

    pub fn set_is_active(mut self, is_active: bool) -> Self {
        self.draft.is_active = Some(is_active);
        self
    }

    pub fn set_strength(mut self, strength: Ratio) -> Self {
        self.draft.strength = Some(strength);
        self
    }
}

impl ModelBuilder for MedicationIngredientBuilder {
    type Model = MedicationIngredient;

    fn draft(&self) -> &MedicationIngredient {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut MedicationIngredient {
        &mut self.draft
    }

    fn build(self) -> MedicationIngredient {
        self.draft
    }
}

impl ElementBuilder for MedicationIngredientBuilder {
    fn element_mut(&mut self) -> &mut Element {
        &mut self.draft.base.element
    }
}

impl BackboneElementBuilder for MedicationIngredientBuilder {
    fn backbone_mut(&mut self) -> &mut BackboneElement {
        &mut self.draft.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Quantity;
    use serde_json::json;

    #[test]
    fn aspirin_then_reference_keeps_only_reference() {
        let ingredient = MedicationIngredient::builder()
            .set_item(IngredientItem::CodeableConcept(CodeableConcept::from_text("Aspirin")))
            .set_item(IngredientItem::Reference(Reference::to("Medication/123")))
            .build();

        assert_eq!(
            ingredient.to_json().unwrap(),
            json!({"itemReference": {"reference": "Medication/123"}})
        );
    }

    #[test]
    fn medication_with_ingredients_in_order() {
        let medication = Medication::builder()
            .set_status("active")
            .add_ingredient(
                MedicationIngredient::builder()
                    .set_item(IngredientItem::CodeableConcept(CodeableConcept::from_text(
                        "Acetylsalicylic acid",
                    )))
                    .set_is_active(true)
                    .set_strength(Ratio {
                        numerator: Some(Quantity::ucum(500, "mg")),
                        denominator: Some(Quantity {
                            value: Some(1.into()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    })
                    .build(),
            )
            .add_ingredient(
                MedicationIngredient::builder()
                    .set_item(IngredientItem::Reference(Reference::to("Substance/starch")))
                    .set_is_active(false)
                    .build(),
            )
            .set_id("aspirin-500")
            .build();

        let json = medication.to_json().unwrap();
        assert_eq!(json["resourceType"], "Medication");
        assert_eq!(json["ingredient"][0]["isActive"], true);
        assert_eq!(
            json["ingredient"][1]["itemReference"]["reference"],
            "Substance/starch"
        );
    }

    #[test]
    fn ingredient_parses_from_json() {
        let ingredient = MedicationIngredient::from_json(&json!({
            "itemCodeableConcept": {"text": "Aspirin"},
            "isActive": true
        }))
        .unwrap();
        assert!(matches!(
            ingredient.item.value(),
            Some(IngredientItem::CodeableConcept(_))
        ));
    }
}
