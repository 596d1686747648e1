use crate::plan::{Step, ValidationPlan};
use crate::steps::{self, Node};
use crate::{ConfigError, ValidatorConfig};
use async_trait::async_trait;
use loom_models::builder::ModelValidator;
use loom_models::registry::{self, TypeInfo};
use loom_models::{FhirModel, ValidationFailure};
use serde_json::Value;

/// Reusable validator - owns the compiled plan
#[derive(Debug, Clone)]
pub struct Validator {
    plan: ValidationPlan,
}

impl Validator {
    pub fn new(plan: ValidationPlan) -> Self {
        Self { plan }
    }

    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let plan = config.compile()?;
        Ok(Self::new(plan))
    }

    /// Validates a resource, resolving its type from `resourceType`.
    pub fn validate(&self, resource: &Value) -> ValidationOutcome {
        let resource_type = resource.get("resourceType").and_then(Value::as_str);
        let root = match resource_type {
            None => Err(ValidationIssue::error(
                IssueCode::Required,
                "resource has no resourceType".to_string(),
            )),
            Some(name) => match registry::lookup(name) {
                Some(info) if info.is_resource() => Ok(info),
                _ => Err(ValidationIssue::error(
                    IssueCode::NotSupported,
                    format!("resource type '{name}' is not supported"),
                )
                .with_location(name.to_string())),
            },
        };

        match root {
            Ok(type_info) => ValidationRun::new(&self.plan, type_info, resource).execute(),
            Err(issue) => ValidationOutcome {
                resource_type: resource_type.map(str::to_string),
                valid: false,
                issues: vec![issue],
            },
        }
    }

    /// Validates an instance of any modelled type (datatype, backbone or resource).
    pub fn validate_as(&self, type_name: &str, instance: &Value) -> ValidationOutcome {
        match registry::lookup(type_name) {
            Some(type_info) => ValidationRun::new(&self.plan, type_info, instance).execute(),
            None => ValidationOutcome {
                resource_type: Some(type_name.to_string()),
                valid: false,
                issues: vec![ValidationIssue::error(
                    IssueCode::NotSupported,
                    format!("type '{type_name}' is not supported"),
                )],
            },
        }
    }

    pub fn validate_model<M: FhirModel>(&self, model: &M) -> ValidationOutcome {
        match model.to_json() {
            Ok(json) => self.validate_as(M::TYPE_NAME, &json),
            Err(err) => ValidationOutcome {
                resource_type: Some(M::TYPE_NAME.to_string()),
                valid: false,
                issues: vec![ValidationIssue::error(IssueCode::Exception, err.to_string())],
            },
        }
    }

    pub fn validate_batch(&self, resources: &[Value]) -> Vec<ValidationOutcome> {
        resources.iter().map(|r| self.validate(r)).collect()
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }
}

#[async_trait]
impl ModelValidator for Validator {
    async fn validate(&self, type_name: &str, instance: &Value) -> Result<(), ValidationFailure> {
        let outcome = self.validate_as(type_name, instance);
        if outcome.valid {
            return Ok(());
        }

        let messages = outcome
            .issues
            .iter()
            .filter(|issue| issue.is_error())
            .map(ValidationIssue::summary)
            .collect();
        Err(ValidationFailure::new(type_name, messages))
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    root: TypeInfo,
    instance: &'a Value,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(plan: &'a ValidationPlan, root: TypeInfo, instance: &'a Value) -> Self {
        Self {
            plan,
            root,
            instance,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        tracing::debug!(
            type_name = self.root.name,
            steps = self.plan.steps.len(),
            "validating instance"
        );

        if !self.instance.is_object() {
            self.issues.push(ValidationIssue::error(
                IssueCode::Structure,
                format!("{} must be a JSON object", self.root.name),
            ));
        }

        for step in &self.plan.steps {
            if self.plan.fail_fast && self.has_errors() {
                break;
            }

            if self.issues.len() >= self.plan.max_issues {
                break;
            }

            self.execute_step(step);
        }
        self.issues.truncate(self.plan.max_issues);

        tracing::debug!(
            type_name = self.root.name,
            issues = self.issues.len(),
            "validation finished"
        );

        ValidationOutcome {
            resource_type: Some(self.root.name.to_string()),
            valid: !self.has_errors(),
            issues: self.issues,
        }
    }

    fn execute_step(&mut self, step: &Step) {
        let issues = &mut self.issues;
        let mut visit = |node: &Node<'_>| match step {
            Step::Structure(plan) => steps::structure::check(node, plan, issues),
            Step::Cardinality(plan) => steps::cardinality::check(node, plan, issues),
            Step::Choice(plan) => steps::choice::check(node, plan, issues),
            Step::Primitives(plan) => steps::primitives::check(node, plan, issues),
            Step::Extensions(plan) => steps::extensions::check(node, plan, issues),
        };
        steps::walk(self.root, self.instance, self.root.name, &mut visit);
    }

    fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }
}

/// Validation result for a single instance
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn success(resource_type: Option<String>) -> Self {
        Self {
            resource_type,
            valid: true,
            issues: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn to_operation_outcome(&self) -> Value {
        let issues: Vec<Value> = if self.issues.is_empty() {
            vec![serde_json::json!({
                "severity": "information",
                "code": IssueCode::Informational.to_string(),
                "diagnostics": "No issues detected"
            })]
        } else {
            self.issues.iter().map(|i| i.to_json()).collect()
        };

        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": issues
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            diagnostics,
            location: None,
        }
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            diagnostics,
            location: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, IssueSeverity::Error | IssueSeverity::Fatal)
    }

    /// One-line form, `location: diagnostics`.
    pub fn summary(&self) -> String {
        match &self.location {
            Some(location) => format!("{location}: {}", self.diagnostics),
            None => self.diagnostics.clone(),
        }
    }

    fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string().to_lowercase(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["location"] = serde_json::json!([loc]);
            issue["expression"] = serde_json::json!([loc]);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}

/// OperationOutcome issue types raised by the validation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Invalid,
    Structure,
    Required,
    Value,
    NotSupported,
    Extension,
    Exception,
    Informational,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::NotSupported => "not-supported",
            Self::Extension => "extension",
            Self::Exception => "exception",
            Self::Informational => "informational",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Preset;
    use serde_json::json;

    fn authoring() -> Validator {
        Validator::from_config(&ValidatorConfig::preset(Preset::Authoring)).unwrap()
    }

    #[test]
    fn test_validation_outcome_operations() {
        let outcome = ValidationOutcome {
            resource_type: Some("Patient".to_string()),
            valid: false,
            issues: vec![
                ValidationIssue::error(IssueCode::Required, "Missing required field".to_string()),
                ValidationIssue::warning(IssueCode::Value, "Odd value".to_string()),
            ],
        };

        assert!(!outcome.valid);
        assert!(outcome.has_errors());
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.warning_count(), 1);
    }

    #[test]
    fn test_operation_outcome_conversion() {
        let outcome = ValidationOutcome {
            resource_type: Some("Observation".to_string()),
            valid: false,
            issues: vec![ValidationIssue::error(
                IssueCode::Required,
                "Observation.status is required but missing".to_string(),
            )
            .with_location("Observation.status".to_string())],
        };

        let op_outcome = outcome.to_operation_outcome();
        assert_eq!(op_outcome["resourceType"], "OperationOutcome");
        assert_eq!(op_outcome["issue"][0]["severity"], "error");
        assert_eq!(op_outcome["issue"][0]["code"], "required");
        assert_eq!(op_outcome["issue"][0]["location"][0], "Observation.status");
    }

    #[test]
    fn clean_outcome_reports_information() {
        let op_outcome = ValidationOutcome::success(Some("Patient".into())).to_operation_outcome();
        assert_eq!(op_outcome["issue"][0]["severity"], "information");
    }

    #[test]
    fn unsupported_and_untyped_resources() {
        let validator = authoring();

        let outcome = validator.validate(&json!({"id": "x"}));
        assert!(!outcome.valid);
        assert_eq!(outcome.issues[0].code, IssueCode::Required);

        let outcome = validator.validate(&json!({"resourceType": "Basic"}));
        assert_eq!(outcome.issues[0].code, IssueCode::NotSupported);

        let outcome = validator.validate(&json!({"resourceType": "Quantity"}));
        assert_eq!(outcome.issues[0].code, IssueCode::NotSupported);
    }

    #[test]
    fn fail_fast_stops_after_first_failing_step() {
        let config = ValidatorConfig::builder().fail_fast(true).build();
        let validator = Validator::from_config(&config).unwrap();

        let outcome = validator.validate(&json!({
            "resourceType": "Observation",
            "mood": "good"
        }));
        // structure reports `mood`; cardinality (status, code) never runs
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].code, IssueCode::Structure);
    }

    #[test]
    fn max_issues_caps_output() {
        let config = ValidatorConfig::builder().max_issues(2).build();
        let validator = Validator::from_config(&config).unwrap();

        let outcome = validator.validate(&json!({
            "resourceType": "Patient",
            "a": 1, "b": 2, "c": 3, "d": 4
        }));
        assert_eq!(outcome.issues.len(), 2);
    }

    #[test]
    fn validate_as_accepts_datatypes() {
        let outcome = authoring().validate_as("Annotation", &json!({"authorString": "me"}));
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(
            outcome.issues[0].diagnostics,
            "Annotation.text is required but missing"
        );
    }
}
