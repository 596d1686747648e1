//! Fluent builders
//!
//! Every model has a builder that owns a draft instance and exposes one
//! by-value setter per field (`set_*` for single fields, `add_*` for
//! repeating ones, one `set_*` per choice element taking the choice enum).
//! The traits here supply the setters inherited from the base types, so a
//! resource builder gets `set_meta` and a backbone builder gets
//! `add_modifier_extension` without repeating them.
//!
//! [`ModelBuilder::build`] never fails; required fields are checked by a
//! [`ModelValidator`] through [`ModelBuilder::build_or_err`].

use crate::common::choice::{Choice, ChoiceValue};
use crate::common::element::{BackboneElement, Element, Extension};
use crate::common::error::{Result, ValidationFailure};
use crate::common::model::FhirModel;
use crate::common::resource::DomainResource;
use crate::common::{Meta, Narrative};
use crate::resources::Resource;
use async_trait::async_trait;
use serde_json::Value;

/// Checks a finished model before [`ModelBuilder::build_or_err`] hands it out.
#[async_trait]
pub trait ModelValidator: Send + Sync {
    /// `instance` is the model's FHIR JSON form.
    async fn validate(
        &self,
        type_name: &str,
        instance: &Value,
    ) -> std::result::Result<(), ValidationFailure>;
}

/// Owns a draft model and produces finished instances from it.
#[async_trait]
pub trait ModelBuilder: Sized + Send {
    type Model: FhirModel + Send;

    fn draft(&self) -> &Self::Model;

    fn draft_mut(&mut self) -> &mut Self::Model;

    /// Consumes the builder and returns the model without validation.
    fn build(self) -> Self::Model;

    /// Copy of the current draft; the builder stays usable.
    fn snapshot(&self) -> Self::Model {
        self.draft().clone()
    }

    /// Builds the model and runs `validator` over it.
    async fn build_or_err(self, validator: &dyn ModelValidator) -> Result<Self::Model> {
        let model = self.build();
        let json = model.to_json()?;
        tracing::debug!(type_name = Self::Model::TYPE_NAME, "validating built model");
        validator.validate(Self::Model::TYPE_NAME, &json).await?;
        Ok(model)
    }
}

/// Setters inherited from Element.
pub trait ElementBuilder: ModelBuilder {
    fn element_mut(&mut self) -> &mut Element;

    fn set_id(mut self, id: impl Into<String>) -> Self {
        self.element_mut().id = Some(id.into());
        self
    }

    fn add_extension(mut self, extension: Extension) -> Self {
        add_to_array(&mut self.element_mut().extension, extension);
        self
    }
}

/// Setters inherited from BackboneElement.
pub trait BackboneElementBuilder: ElementBuilder {
    fn backbone_mut(&mut self) -> &mut BackboneElement;

    fn add_modifier_extension(mut self, extension: Extension) -> Self {
        add_to_array(&mut self.backbone_mut().modifier_extension, extension);
        self
    }
}

/// Setters inherited from Resource and DomainResource.
pub trait DomainResourceBuilder: ModelBuilder {
    fn resource_mut(&mut self) -> &mut DomainResource;

    fn set_id(mut self, id: impl Into<String>) -> Self {
        self.resource_mut().id = Some(id.into());
        self
    }

    fn set_meta(mut self, meta: Meta) -> Self {
        self.resource_mut().meta = Some(meta);
        self
    }

    fn set_implicit_rules(mut self, implicit_rules: impl Into<String>) -> Self {
        self.resource_mut().implicit_rules = Some(implicit_rules.into());
        self
    }

    fn set_language(mut self, language: impl Into<String>) -> Self {
        self.resource_mut().language = Some(language.into());
        self
    }

    fn set_text(mut self, text: Narrative) -> Self {
        self.resource_mut().text = Some(text);
        self
    }

    fn add_contained(mut self, resource: impl Into<Resource>) -> Self {
        add_to_array(&mut self.resource_mut().contained, resource.into());
        self
    }

    fn add_extension(mut self, extension: Extension) -> Self {
        add_to_array(&mut self.resource_mut().extension, extension);
        self
    }

    fn add_modifier_extension(mut self, extension: Extension) -> Self {
        add_to_array(&mut self.resource_mut().modifier_extension, extension);
        self
    }
}

/// Appends `item`, creating the array on first use.
pub fn add_to_array<T>(array: &mut Option<Vec<T>>, item: T) {
    array.get_or_insert_with(Vec::new).push(item);
}

/// Appends to a repeating primitive and its `_name` shadow array.
///
/// The shadow array is created only once some entry has a shadow, and is kept
/// the same length as the values from then on.
pub fn add_primitive_to_array<T>(
    values: &mut Option<Vec<Option<T>>>,
    shadows: &mut Option<Vec<Option<Element>>>,
    value: T,
    shadow: Option<Element>,
) {
    let values = values.get_or_insert_with(Vec::new);
    values.push(Some(value));
    let before = values.len() - 1;
    match shadows {
        Some(existing) => {
            existing.resize(before, None);
            existing.push(shadow);
        }
        None => {
            if let Some(shadow) = shadow {
                let mut created = vec![None; before];
                created.push(Some(shadow));
                *shadows = Some(created);
            }
        }
    }
}

/// Stores `value` in a choice element, replacing any other type it held.
pub fn set_choice<V: ChoiceValue>(choice: &mut Choice<V>, value: V) {
    choice.set(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_to_array_creates_then_appends() {
        let mut lines: Option<Vec<&str>> = None;
        add_to_array(&mut lines, "a");
        add_to_array(&mut lines, "b");
        assert_eq!(lines, Some(vec!["a", "b"]));
    }

    #[test]
    fn add_to_array_keeps_existing_items() {
        let mut given = Some(vec!["Sherlock".to_string()]);
        add_to_array(&mut given, "Scott".to_string());
        assert_eq!(given.map(|g| g.len()), Some(2));
    }

    #[test]
    fn primitive_shadows_stay_aligned() {
        let mut lines: Option<Vec<Option<String>>> = None;
        let mut shadows = None;
        add_primitive_to_array(&mut lines, &mut shadows, "1 Main St".to_string(), None);
        assert!(shadows.is_none());

        let unit = Element {
            id: Some("unit".into()),
            ..Default::default()
        };
        add_primitive_to_array(&mut lines, &mut shadows, "Unit 4".to_string(), Some(unit.clone()));
        add_primitive_to_array(&mut lines, &mut shadows, "Rear".to_string(), None);

        assert_eq!(lines.map(|l| l.len()), Some(3));
        assert_eq!(shadows, Some(vec![None, Some(unit), None]));
    }
}
