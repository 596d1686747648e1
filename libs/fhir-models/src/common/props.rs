//! Field-descriptor tables and the property-copy helpers built on them
//!
//! Every model declares its properties as a `&'static [PropertyDef]` in FHIR
//! element order. The helpers here copy, emit and merge JSON keys by walking
//! that table, so key order never depends on the order fields were assigned.

use super::version::FhirVersion;
use serde_json::{Map, Value};

/// A permitted type of an element, with the first release that allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRef {
    /// FHIR type code (`string`, `dateTime`, `Quantity`, ...)
    pub code: &'static str,
    pub since: FhirVersion,
}

impl TypeRef {
    pub const fn new(code: &'static str) -> Self {
        Self {
            code,
            since: FhirVersion::R4,
        }
    }

    pub const fn since(code: &'static str, since: FhirVersion) -> Self {
        Self { code, since }
    }

    /// Primitive type codes start with a lower-case letter.
    pub fn is_primitive(&self) -> bool {
        is_primitive_code(self.code)
    }

    pub fn available_in(&self, version: FhirVersion) -> bool {
        self.since <= version
    }

    /// JSON key of this type within the choice element `element`.
    pub fn json_key(&self, element: &str) -> String {
        choice_key(element, self.code)
    }

    /// Whether `suffix` is this type's code with its first letter capitalized.
    pub fn matches_suffix(&self, suffix: &str) -> bool {
        let mut expected = self.code.chars();
        let mut actual = suffix.chars();
        match (expected.next(), actual.next()) {
            (Some(e), Some(a)) => {
                a.is_ascii_uppercase()
                    && e.to_ascii_uppercase() == a
                    && expected.as_str() == actual.as_str()
            }
            _ => false,
        }
    }
}

/// Shape of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Single-typed element carrying the FHIR type code
    Single(&'static str),
    /// `name[x]` element with its permitted types in declared order
    Choice(&'static [TypeRef]),
}

/// One entry of a model's field-descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// JSON name, without `[x]` for choice elements
    pub name: &'static str,
    pub kind: PropertyKind,
    pub min: u32,
    pub repeating: bool,
    /// Whether primitive values may carry an `_name` id/extension shadow
    pub extensible: bool,
}

impl PropertyDef {
    pub const fn new(name: &'static str, type_code: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Single(type_code),
            min: 0,
            repeating: false,
            extensible: true,
        }
    }

    pub const fn choice(name: &'static str, types: &'static [TypeRef]) -> Self {
        Self {
            name,
            kind: PropertyKind::Choice(types),
            min: 0,
            repeating: false,
            extensible: true,
        }
    }

    pub const fn required(mut self) -> Self {
        self.min = 1;
        self
    }

    pub const fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    /// Marks a system-typed element (`Element.id`, `Extension.url`) that
    /// never has a shadow.
    pub const fn without_extensions(mut self) -> Self {
        self.extensible = false;
        self
    }

    /// Whether a value of type `type_code` in this property may have a shadow.
    pub fn allows_shadow(&self, type_code: &str) -> bool {
        self.extensible && is_primitive_code(type_code) && type_code != "xhtml"
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, PropertyKind::Choice(_))
    }

    /// Name as written in the FHIR specification (`value[x]` for choices).
    pub fn display_name(&self) -> String {
        match self.kind {
            PropertyKind::Single(_) => self.name.to_string(),
            PropertyKind::Choice(_) => format!("{}[x]", self.name),
        }
    }

    /// Every JSON key a model can hold for this property, value key before
    /// shadow key, choice siblings in declared type order.
    ///
    /// Shadows are listed only for types that [allow](Self::allows_shadow) them.
    pub fn candidate_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut push = |key: String, type_code: &str| {
            if self.allows_shadow(type_code) {
                let shadow = shadow_key(&key);
                keys.push(key);
                keys.push(shadow);
            } else {
                keys.push(key);
            }
        };
        match self.kind {
            PropertyKind::Single(code) => push(self.name.to_string(), code),
            PropertyKind::Choice(types) => {
                for t in types {
                    push(t.json_key(self.name), t.code);
                }
            }
        }
        keys
    }

    /// Classifies `key` against this property.
    ///
    /// Recognizes every `_name` key, including ones
    /// [`allows_shadow`](Self::allows_shadow) rejects.
    pub fn match_key(&self, key: &str) -> Option<KeyMatch> {
        let (is_shadow, bare) = match key.strip_prefix('_') {
            Some(rest) => (true, rest),
            None => (false, key),
        };

        let type_code = match self.kind {
            PropertyKind::Single(code) => (bare == self.name).then_some(code)?,
            PropertyKind::Choice(types) => {
                let suffix = bare.strip_prefix(self.name)?;
                types.iter().find(|t| t.matches_suffix(suffix))?.code
            }
        };

        Some(KeyMatch {
            property: *self,
            type_code,
            is_shadow,
        })
    }
}

/// Result of matching a JSON key against a [`PropertyDef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch {
    pub property: PropertyDef,
    pub type_code: &'static str,
    pub is_shadow: bool,
}

pub fn is_primitive_code(code: &str) -> bool {
    code.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// `value` + `dateTime` → `valueDateTime`
pub fn choice_key(element: &str, code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => format!("{element}{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => element.to_string(),
    }
}

/// `birthDate` → `_birthDate`
pub fn shadow_key(key: &str) -> String {
    format!("_{key}")
}

/// Copies the declared keys of `source` into a fresh map, in declared order.
///
/// Keys that are absent or `null` are skipped, and keys no property declares
/// are dropped.
pub fn assign_props<'a, I>(source: &Map<String, Value>, props: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a PropertyDef>,
{
    let mut target = Map::new();
    copy_declared(source, &mut target, props);
    target
}

/// Writes the declared keys of `source` into `target`, in declared order.
pub fn serialize_props_to<'a, I>(target: &mut Map<String, Value>, source: &Map<String, Value>, props: I)
where
    I: IntoIterator<Item = &'a PropertyDef>,
{
    copy_declared(source, target, props);
}

fn copy_declared<'a, I>(source: &Map<String, Value>, target: &mut Map<String, Value>, props: I)
where
    I: IntoIterator<Item = &'a PropertyDef>,
{
    for prop in props {
        for key in prop.candidate_keys() {
            match source.get(&key) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    target.insert(key, value.clone());
                }
            }
        }
    }
}

/// Overlays `patch` onto `target`.
///
/// A `null` in the patch removes the key. When the patch touches a choice
/// element, every sibling type it does not touch is cleared together with
/// its shadow, so the result never holds two populated siblings. Undeclared
/// patch keys are ignored.
pub fn merge_props<'a, I>(target: &mut Map<String, Value>, patch: &Map<String, Value>, props: I)
where
    I: IntoIterator<Item = &'a PropertyDef>,
{
    for prop in props {
        let touched: Vec<KeyMatch> = patch
            .keys()
            .filter_map(|key| prop.match_key(key))
            .collect();
        if touched.is_empty() {
            continue;
        }

        if let PropertyKind::Choice(types) = prop.kind {
            for sibling in types {
                if touched.iter().any(|m| m.type_code == sibling.code) {
                    continue;
                }
                let key = sibling.json_key(prop.name);
                target.remove(&shadow_key(&key));
                target.remove(&key);
            }
        }

        for key in prop.candidate_keys() {
            match patch.get(&key) {
                None => {}
                Some(Value::Null) => {
                    target.remove(&key);
                }
                Some(value) => {
                    target.insert(key, value.clone());
                }
            }
        }
    }
}
