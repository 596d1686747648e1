use crate::config::{
    CardinalityConfig, ExtensionsConfig, PrimitiveMode, PrimitivesConfig, StructureConfig,
};
use crate::validator::IssueSeverity;
use loom_models::FhirVersion;

/// Compiled validation plan - list of steps to execute
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub steps: Vec<Step>,
    pub fail_fast: bool,
    pub max_issues: usize,
    pub fhir_version: FhirVersion,
}

#[derive(Debug, Clone)]
pub enum Step {
    Structure(StructurePlan),
    Cardinality(CardinalityPlan),
    Choice(ChoicePlan),
    Primitives(PrimitivesPlan),
    Extensions(ExtensionsPlan),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Structure(_) => "structure",
            Self::Cardinality(_) => "cardinality",
            Self::Choice(_) => "choice",
            Self::Primitives(_) => "primitives",
            Self::Extensions(_) => "extensions",
        }
    }
}

// ============================================================================
// Step Plans
// ============================================================================

#[derive(Debug, Clone)]
pub struct StructurePlan {
    pub allow_unknown_elements: bool,
}

impl From<&StructureConfig> for StructurePlan {
    fn from(cfg: &StructureConfig) -> Self {
        Self {
            allow_unknown_elements: cfg.allow_unknown_elements,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardinalityPlan {}

impl From<&CardinalityConfig> for CardinalityPlan {
    fn from(_cfg: &CardinalityConfig) -> Self {
        Self {}
    }
}

#[derive(Debug, Clone)]
pub struct ChoicePlan {
    /// Choice types introduced after this release are rejected
    pub fhir_version: FhirVersion,
}

#[derive(Debug, Clone)]
pub struct PrimitivesPlan {
    pub severity: IssueSeverity,
}

impl From<&PrimitivesConfig> for PrimitivesPlan {
    fn from(cfg: &PrimitivesConfig) -> Self {
        Self {
            severity: match cfg.mode {
                PrimitiveMode::Warn => IssueSeverity::Warning,
                PrimitiveMode::Off | PrimitiveMode::Error => IssueSeverity::Error,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtensionsPlan {
    pub allow_modifier_extensions: bool,
}

impl From<&ExtensionsConfig> for ExtensionsPlan {
    fn from(cfg: &ExtensionsConfig) -> Self {
        Self {
            allow_modifier_extensions: cfg.allow_modifier_extensions,
        }
    }
}
