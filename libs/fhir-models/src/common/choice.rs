//! Choice elements (`foo[x]`)
//!
//! A choice element is one logical field that FHIR JSON spreads over
//! type-suffixed sibling keys (`valueQuantity`, `valueString`, ...), each
//! primitive sibling with an optional `_` shadow carrying its extensions.
//!
//! The permitted types of a field are an enum implementing [`ChoiceValue`],
//! normally generated with [`choice_type!`](crate::choice_type). A model
//! stores the field as a [`Choice`], which holds at most one populated slot:
//! setting a variant replaces the slot, so no stale sibling or shadow can
//! survive a switch between types.

use super::element::Element;
use super::props::{choice_key, shadow_key, TypeRef};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// The permitted types of one choice element.
pub trait ChoiceValue: Clone + fmt::Debug + PartialEq + Sized {
    /// Element name without the `[x]` marker
    const ELEMENT: &'static str;
    /// Permitted types in declared order
    const TYPES: &'static [TypeRef];

    /// FHIR type code of the populated variant.
    fn type_code(&self) -> &'static str;

    fn to_value(&self) -> serde_json::Result<Value>;

    /// Parses `value` as the variant for `code`; `Ok(None)` if `code` is not
    /// one of [`Self::TYPES`].
    fn from_value(code: &str, value: Value) -> serde_json::Result<Option<Self>>;

    fn is_primitive(&self) -> bool {
        super::props::is_primitive_code(self.type_code())
    }

    /// JSON key of the populated variant, e.g. `valueQuantity`.
    fn json_key(&self) -> String {
        choice_key(Self::ELEMENT, self.type_code())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot<V> {
    type_code: &'static str,
    value: Option<V>,
    extension: Option<Element>,
}

/// Storage for a choice element with at most one populated type.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<V> {
    slot: Option<Slot<V>>,
}

impl<V> Default for Choice<V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<V: ChoiceValue> From<V> for Choice<V> {
    fn from(value: V) -> Self {
        Self::of(value)
    }
}

impl<V: ChoiceValue> Choice<V> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(value: V) -> Self {
        let mut choice = Self::empty();
        choice.set(value);
        choice
    }

    /// Replaces whatever the element held with `value`.
    pub fn set(&mut self, value: V) {
        self.slot = Some(Slot {
            type_code: value.type_code(),
            value: Some(value),
            extension: None,
        });
    }

    /// Replaces the element with `value` and its primitive extension.
    ///
    /// Only primitive types carry a shadow; for a complex variant the
    /// extension is discarded.
    pub fn set_with_extension(&mut self, value: V, extension: Element) {
        let extension = if value.is_primitive() {
            Some(extension)
        } else {
            tracing::warn!(
                key = %value.json_key(),
                "discarding primitive extension on complex choice type"
            );
            None
        };
        self.slot = Some(Slot {
            type_code: value.type_code(),
            value: Some(value),
            extension,
        });
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn take(&mut self) -> Option<V> {
        self.slot.take().and_then(|slot| slot.value)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn value(&self) -> Option<&V> {
        self.slot.as_ref().and_then(|slot| slot.value.as_ref())
    }

    pub fn primitive_extension(&self) -> Option<&Element> {
        self.slot.as_ref().and_then(|slot| slot.extension.as_ref())
    }

    /// Type code of the populated slot, including extension-only slots.
    pub fn type_code(&self) -> Option<&'static str> {
        self.slot.as_ref().map(|slot| slot.type_code)
    }

    pub fn json_key(&self) -> Option<String> {
        self.type_code().map(|code| choice_key(V::ELEMENT, code))
    }
}

impl<V: ChoiceValue> Serialize for Choice<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(slot) = &self.slot {
            let key = choice_key(V::ELEMENT, slot.type_code);
            if let Some(value) = &slot.value {
                let json = value.to_value().map_err(ser::Error::custom)?;
                map.serialize_entry(&key, &json)?;
            }
            if let Some(extension) = &slot.extension {
                map.serialize_entry(&shadow_key(&key), extension)?;
            }
        }
        map.end()
    }
}

impl<'de, V: ChoiceValue> Deserialize<'de> for Choice<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ChoiceVisitor(PhantomData))
    }
}

struct ChoiceVisitor<V>(PhantomData<V>);

impl<'de, V: ChoiceValue> Visitor<'de> for ChoiceVisitor<V> {
    type Value = Choice<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object holding at most one {}[x] value", V::ELEMENT)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut found: Option<V> = None;
        let mut extension: Option<(&'static str, Element)> = None;

        while let Some(key) = map.next_key::<String>()? {
            let Some((type_ref, is_shadow)) = classify::<V>(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if is_shadow {
                let Some(element) = map.next_value::<Option<Element>>()? else {
                    continue;
                };
                if let Some((existing, _)) = &extension {
                    return Err(de::Error::custom(format!(
                        "multiple primitive extensions for {}[x]: {} and {}",
                        V::ELEMENT,
                        shadow_key(&choice_key(V::ELEMENT, existing)),
                        key
                    )));
                }
                extension = Some((type_ref.code, element));
                continue;
            }

            let raw = map.next_value::<Value>()?;
            if raw.is_null() {
                continue;
            }
            if let Some(existing) = &found {
                return Err(de::Error::custom(format!(
                    "multiple values for {}[x]: {} and {}",
                    V::ELEMENT,
                    existing.json_key(),
                    key
                )));
            }
            let parsed = V::from_value(type_ref.code, raw)
                .map_err(de::Error::custom)?
                .ok_or_else(|| de::Error::custom(format!("unsupported choice key {key}")))?;
            found = Some(parsed);
        }

        let slot = match (found, extension) {
            (None, None) => None,
            (Some(value), None) => Some(Slot {
                type_code: value.type_code(),
                value: Some(value),
                extension: None,
            }),
            (Some(value), Some((code, element))) => {
                if value.type_code() != code {
                    return Err(de::Error::custom(format!(
                        "primitive extension {} does not belong to {}",
                        shadow_key(&choice_key(V::ELEMENT, code)),
                        value.json_key()
                    )));
                }
                Some(Slot {
                    type_code: code,
                    value: Some(value),
                    extension: Some(element),
                })
            }
            (None, Some((code, element))) => Some(Slot {
                type_code: code,
                value: None,
                extension: Some(element),
            }),
        };

        Ok(Choice { slot })
    }
}

/// Matches `key` to one of `V`'s types; shadows only match primitive types.
fn classify<V: ChoiceValue>(key: &str) -> Option<(&'static TypeRef, bool)> {
    let (is_shadow, bare) = match key.strip_prefix('_') {
        Some(rest) => (true, rest),
        None => (false, key),
    };
    let suffix = bare.strip_prefix(V::ELEMENT)?;
    let type_ref = V::TYPES.iter().find(|t| t.matches_suffix(suffix))?;
    if is_shadow && !type_ref.is_primitive() {
        return None;
    }
    Some((type_ref, is_shadow))
}

/// Declares a choice-element enum and its [`ChoiceValue`] impl.
///
/// ```
/// use loom_models::choice_type;
/// use loom_models::common::{CodeableConcept, Reference};
///
/// choice_type! {
///     /// Medication.ingredient.item[x]
///     pub enum IngredientItem["item"] {
///         CodeableConcept(CodeableConcept) = "CodeableConcept",
///         Reference(Reference) = "Reference",
///     }
/// }
/// ```
#[macro_export]
macro_rules! choice_type {
    (@type_ref $code:literal) => {
        $crate::common::props::TypeRef::new($code)
    };
    (@type_ref $code:literal, $since:ident) => {
        $crate::common::props::TypeRef::since($code, $crate::common::version::FhirVersion::$since)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident[$element:literal] {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) = $code:literal $(since $since:ident)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::common::choice::ChoiceValue for $name {
            const ELEMENT: &'static str = $element;
            const TYPES: &'static [$crate::common::props::TypeRef] = &[
                $( $crate::choice_type!(@type_ref $code $(, $since)?), )+
            ];

            fn type_code(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => $code, )+
                }
            }

            fn to_value(&self) -> $crate::__serde_json::Result<$crate::__serde_json::Value> {
                match self {
                    $( Self::$variant(inner) => $crate::__serde_json::to_value(inner), )+
                }
            }

            fn from_value(
                code: &str,
                value: $crate::__serde_json::Value,
            ) -> $crate::__serde_json::Result<::std::option::Option<Self>> {
                match code {
                    $( $code => $crate::__serde_json::from_value::<$ty>(value).map(|v| Some(Self::$variant(v))), )+
                    _ => Ok(None),
                }
            }
        }
    };
}
