//! Validator configuration
//!
//! A [`ValidatorConfig`] starts from a [`Preset`] and can be adjusted through
//! the fluent [`ValidatorConfigBuilder`] or loaded from YAML. YAML keys
//! override the chosen preset, so a file only needs the settings it changes.

use crate::error::ConfigError;
use crate::plan::{
    CardinalityPlan, ChoicePlan, ExtensionsPlan, PrimitivesPlan, Step, StructurePlan,
    ValidationPlan,
};
use loom_models::FhirVersion;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as Yaml};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    /// Accept what can be parsed; report oddities as warnings
    Ingestion,
    /// Strict structure, everything reported
    #[default]
    Authoring,
    /// Authoring plus no modifier extensions
    Publication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveMode {
    Off,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub preset: Preset,
    pub fhir: FhirConfig,
    pub structure: StructureConfig,
    pub cardinality: CardinalityConfig,
    pub choice: ChoiceConfig,
    pub primitives: PrimitivesConfig,
    pub extensions: ExtensionsConfig,
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FhirConfig {
    pub version: FhirVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    pub enabled: bool,
    /// Report undeclared keys as warnings instead of errors
    pub allow_unknown_elements: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardinalityConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitivesConfig {
    pub mode: PrimitiveMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    pub enabled: bool,
    pub allow_modifier_extensions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecConfig {
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl ValidatorConfig {
    pub fn preset(preset: Preset) -> Self {
        let strict = preset != Preset::Ingestion;
        Self {
            preset,
            fhir: FhirConfig {
                version: FhirVersion::default(),
            },
            structure: StructureConfig {
                enabled: true,
                allow_unknown_elements: !strict,
            },
            cardinality: CardinalityConfig { enabled: true },
            choice: ChoiceConfig { enabled: true },
            primitives: PrimitivesConfig {
                mode: if strict {
                    PrimitiveMode::Error
                } else {
                    PrimitiveMode::Warn
                },
            },
            extensions: ExtensionsConfig {
                enabled: true,
                allow_modifier_extensions: preset != Preset::Publication,
            },
            exec: ExecConfig {
                fail_fast: false,
                max_issues: 1000,
            },
        }
    }

    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Parses YAML, applying its keys on top of the preset it names.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let overrides: Yaml = serde_yaml::from_str(yaml)?;
        let preset = match overrides.get("preset") {
            Some(value) => serde_yaml::from_value(value.clone())?,
            None => Preset::default(),
        };

        let mut merged = serde_yaml::to_value(Self::preset(preset))?;
        if let Yaml::Mapping(overrides) = overrides {
            merge_mapping(&mut merged, overrides);
        }
        Ok(serde_yaml::from_value(merged)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn compile(&self) -> Result<ValidationPlan, ConfigError> {
        if self.exec.max_issues == 0 {
            return Err(ConfigError::InvalidConfig(
                "exec.max_issues must be greater than zero".to_string(),
            ));
        }

        let mut steps = Vec::new();
        if self.structure.enabled {
            steps.push(Step::Structure(StructurePlan::from(&self.structure)));
        }
        if self.cardinality.enabled {
            steps.push(Step::Cardinality(CardinalityPlan::from(&self.cardinality)));
        }
        if self.choice.enabled {
            steps.push(Step::Choice(ChoicePlan {
                fhir_version: self.fhir.version,
            }));
        }
        if self.primitives.mode != PrimitiveMode::Off {
            steps.push(Step::Primitives(PrimitivesPlan::from(&self.primitives)));
        }
        if self.extensions.enabled {
            steps.push(Step::Extensions(ExtensionsPlan::from(&self.extensions)));
        }

        Ok(ValidationPlan {
            steps,
            fail_fast: self.exec.fail_fast,
            max_issues: self.exec.max_issues,
            fhir_version: self.fhir.version,
        })
    }
}

fn merge_mapping(base: &mut Yaml, overrides: Mapping) {
    let Yaml::Mapping(base) = base else {
        return;
    };
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(existing), Yaml::Mapping(nested)) if existing.is_mapping() => {
                merge_mapping(existing, nested)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Resets every setting to the preset's values.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = ValidatorConfig::preset(preset);
        self
    }

    pub fn fhir_version(mut self, version: FhirVersion) -> Self {
        self.config.fhir.version = version;
        self
    }

    pub fn structure(mut self, enabled: bool) -> Self {
        self.config.structure.enabled = enabled;
        self
    }

    pub fn allow_unknown_elements(mut self, allow: bool) -> Self {
        self.config.structure.allow_unknown_elements = allow;
        self
    }

    pub fn cardinality(mut self, enabled: bool) -> Self {
        self.config.cardinality.enabled = enabled;
        self
    }

    pub fn choice(mut self, enabled: bool) -> Self {
        self.config.choice.enabled = enabled;
        self
    }

    pub fn primitives_mode(mut self, mode: PrimitiveMode) -> Self {
        self.config.primitives.mode = mode;
        self
    }

    pub fn extensions(mut self, enabled: bool) -> Self {
        self.config.extensions.enabled = enabled;
        self
    }

    pub fn allow_modifier_extensions(mut self, allow: bool) -> Self {
        self.config.extensions.allow_modifier_extensions = allow;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.exec.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.config.exec.max_issues = max_issues;
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_compile() {
        for preset in [Preset::Ingestion, Preset::Authoring, Preset::Publication] {
            let plan = ValidatorConfig::preset(preset).compile().unwrap();
            assert_eq!(plan.steps.len(), 5, "{preset:?}");
        }
    }

    #[test]
    fn builder_overrides_preset() {
        let cfg = ValidatorConfig::builder()
            .preset(Preset::Publication)
            .primitives_mode(PrimitiveMode::Off)
            .fhir_version(FhirVersion::R5)
            .fail_fast(true)
            .build();

        assert!(!cfg.extensions.allow_modifier_extensions);
        let plan = cfg.compile().unwrap();
        assert_eq!(plan.steps.len(), 4);
        assert!(plan.fail_fast);
        assert_eq!(plan.fhir_version, FhirVersion::R5);
    }

    #[test]
    fn yaml_overrides_only_named_keys() {
        let yaml = r#"
preset: Ingestion
fhir:
  version: R5
exec:
  max_issues: 50
"#;
        let cfg = ValidatorConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.preset, Preset::Ingestion);
        assert_eq!(cfg.fhir.version, FhirVersion::R5);
        assert_eq!(cfg.exec.max_issues, 50);
        assert!(!cfg.exec.fail_fast);
        assert!(cfg.structure.allow_unknown_elements);
        assert_eq!(cfg.primitives.mode, PrimitiveMode::Warn);
    }

    #[test]
    fn yaml_round_trips() {
        let cfg = ValidatorConfig::builder()
            .preset(Preset::Ingestion)
            .allow_modifier_extensions(false)
            .max_issues(10)
            .build();
        let yaml = cfg.to_yaml().unwrap();
        assert_eq!(ValidatorConfig::from_yaml(&yaml).unwrap(), cfg);
    }

    #[test]
    fn zero_max_issues_is_rejected() {
        let err = ValidatorConfig::builder().max_issues(0).build().compile().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = ValidatorConfig::from_yaml("preset: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));

        let err = ValidatorConfig::from_yaml("preset: Lenient").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
