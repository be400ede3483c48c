use super::error::EvaluationError;
use crate::aspic::{
    ArgumentationTheory, ConstructionParams, DefeatCriterion, OrderingPolicy, DEFAULT_MAX_ARGUMENTS,
    DEFAULT_MAX_DEPTH,
};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The accepted values of the maximal construction depth.
pub const MAX_DEPTH_RANGE: RangeInclusive<usize> = 1..=10;

/// The accepted values of the maximal number of arguments.
pub const MAX_ARGUMENTS_RANGE: RangeInclusive<usize> = 10..=5000;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_arguments() -> usize {
    DEFAULT_MAX_ARGUMENTS
}

fn default_true() -> bool {
    true
}

/// An evaluation request: a theory and the parameters of its evaluation.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::OrderingPolicy;
/// # use crustaspic::evaluation::EvaluationRequest;
/// let request = EvaluationRequest::from_json(
///     r#"{"theory": {"knowledgeBase": {"axioms": ["p"]}}, "ordering": "weakest-link"}"#,
/// )
/// .unwrap();
/// assert_eq!(OrderingPolicy::WeakestLink, request.ordering);
/// assert_eq!(5, request.max_depth);
/// assert!(EvaluationRequest::from_json(r#"{"theory": {}, "maxDepth": 11}"#).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EvaluationRequest {
    /// The theory to evaluate.
    pub theory: ArgumentationTheory,
    /// The policy used to compare arguments.
    #[serde(default)]
    pub ordering: OrderingPolicy,
    /// The condition preference-dependent attacks must meet to be defeats.
    #[serde(default)]
    pub defeat_criterion: DefeatCriterion,
    /// The maximal number of construction rounds.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// The maximal number of arguments.
    #[serde(default = "default_max_arguments")]
    pub max_arguments: usize,
    /// Whether equivalent arguments with a strict top rule are collapsed.
    #[serde(default = "default_true")]
    pub dedupe_strict_rules: bool,
    /// Whether rule applications with inconsistent premises are skipped.
    #[serde(default)]
    pub require_consistency: bool,
    /// Whether the preferences are completed by transitivity before the evaluation.
    #[serde(default)]
    pub compute_transitive_closure: bool,
    /// Whether cycles among the preferences are reported.
    #[serde(default = "default_true")]
    pub detect_cycles: bool,
    /// Whether the cache must be ignored.
    #[serde(default)]
    pub bypass_cache: bool,
}

impl EvaluationRequest {
    /// Builds a request with the default parameters.
    pub fn new(theory: ArgumentationTheory) -> Self {
        EvaluationRequest {
            theory,
            ordering: OrderingPolicy::default(),
            defeat_criterion: DefeatCriterion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_arguments: DEFAULT_MAX_ARGUMENTS,
            dedupe_strict_rules: true,
            require_consistency: false,
            compute_transitive_closure: false,
            detect_cycles: true,
            bypass_cache: false,
        }
    }

    /// Reads and validates a request from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, EvaluationError> {
        let request: EvaluationRequest =
            serde_json::from_str(json).map_err(|e| EvaluationError::invalid(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Checks the bounds are in their ranges and the theory is well built.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if !MAX_DEPTH_RANGE.contains(&self.max_depth) {
            return Err(EvaluationError::invalid(format!(
                "maxDepth must be between {} and {}, got {}",
                MAX_DEPTH_RANGE.start(),
                MAX_DEPTH_RANGE.end(),
                self.max_depth
            )));
        }
        if !MAX_ARGUMENTS_RANGE.contains(&self.max_arguments) {
            return Err(EvaluationError::invalid(format!(
                "maxArguments must be between {} and {}, got {}",
                MAX_ARGUMENTS_RANGE.start(),
                MAX_ARGUMENTS_RANGE.end(),
                self.max_arguments
            )));
        }
        self.theory
            .check()
            .map_err(|e| EvaluationError::invalid(format!("{:#}", e)))
    }

    /// Returns the construction parameters of this request.
    pub fn construction_params(&self) -> ConstructionParams {
        ConstructionParams {
            max_depth: self.max_depth,
            max_arguments: self.max_arguments,
            dedupe_strict_rules: self.dedupe_strict_rules,
            require_consistency: self.require_consistency,
        }
    }
}
