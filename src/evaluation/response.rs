use super::limits::Truncation;
use crate::aspic::{
    ArgumentSet, ArgumentationTheory, Attack, AttackKind, ConstructionLimit, ConstructionParams, Defeat, Literal,
    OrderingPolicy, PremiseKind,
};
use crate::rationality::{PostulateReport, RationalityReport, WellFormednessReport};
use crate::semantics::{DefeatGraphStats, Justification, LabellingSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An argument, as returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentView {
    /// The argument label.
    pub id: String,
    /// The conclusion.
    pub conclusion: Literal,
    /// The knowledge base elements the argument uses.
    pub premises: Vec<Literal>,
    /// The kind of the element, for atomic arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premise_kind: Option<PremiseKind>,
    /// The identifier of the top rule, for composite arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_rule: Option<String>,
    /// The identifiers of the defeasible rules the argument uses.
    pub defeasible_rules: Vec<String>,
    /// The labels of the immediate sub-arguments.
    pub sub_arguments: Vec<String>,
    /// Whether the argument uses no defeasible rule.
    pub strict: bool,
    /// Whether the argument only uses axioms.
    pub firm: bool,
    /// The construction round the argument was built in.
    pub depth: usize,
    /// A textual description of the structure of the argument.
    pub structure: String,
}

impl ArgumentView {
    pub(crate) fn new(id: usize, arguments: &ArgumentSet, theory: &ArgumentationTheory) -> Self {
        let arg = arguments.get_argument_by_id(id);
        let rule_id = |r: usize| theory.rules()[r].id().to_string();
        ArgumentView {
            id: arg.label(),
            conclusion: arg.conclusion().to_string(),
            premises: arg.premises().iter().cloned().collect(),
            premise_kind: arg.premise_kind(),
            top_rule: arg.top_rule().map(rule_id),
            defeasible_rules: arg.defeasible_rules().iter().map(|r| rule_id(*r)).collect(),
            sub_arguments: arg
                .sub_arguments()
                .iter()
                .map(|s| arguments.get_argument_by_id(*s).label())
                .collect(),
            strict: arg.is_strict(),
            firm: arg.is_firm(),
            depth: arg.depth(),
            structure: arguments.describe(id, theory),
        }
    }
}

/// An attack, as returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackView {
    /// The label of the attacker.
    pub attacker: String,
    /// The label of the attacked argument.
    pub attacked: String,
    /// The kind of attack.
    pub kind: AttackKind,
    /// The label of the targeted sub-argument.
    pub target: String,
    /// The contradicted literal.
    pub target_literal: Literal,
}

impl AttackView {
    pub(crate) fn new(attack: &Attack, arguments: &ArgumentSet) -> Self {
        let label = |a: usize| arguments.get_argument_by_id(a).label();
        let target = attack.primary_target();
        AttackView {
            attacker: label(attack.attacker()),
            attacked: label(attack.attacked()),
            kind: attack.kind(),
            target: label(target.sub_argument()),
            target_literal: target.literal().to_string(),
        }
    }
}

/// A defeat, as returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatView {
    /// The label of the defeater.
    pub defeater: String,
    /// The label of the defeated argument.
    pub defeated: String,
    /// The kind of the underlying attack.
    pub kind: AttackKind,
    /// The label of the targeted sub-argument.
    pub target: String,
    /// Whether the argument ordering was consulted.
    pub preference_applied: bool,
}

impl DefeatView {
    pub(crate) fn new(defeat: &Defeat, attacks: &[Attack], arguments: &ArgumentSet) -> Self {
        let label = |a: usize| arguments.get_argument_by_id(a).label();
        DefeatView {
            defeater: label(defeat.defeater()),
            defeated: label(defeat.defeated()),
            kind: attacks[defeat.attack()].kind(),
            target: label(defeat.target().sub_argument()),
            preference_applied: defeat.preference_applied(),
        }
    }
}

/// The rationality checks of an evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RationalityView {
    /// Whether the theory is well formed.
    pub well_formed: bool,
    /// All the violations, well-formedness ones first.
    pub violations: Vec<String>,
    /// The details of the well-formedness checks.
    pub well_formedness: WellFormednessReport,
    /// The rationality postulates checked on the grounded extension.
    pub postulates: PostulateReport,
}

impl From<RationalityReport> for RationalityView {
    fn from(report: RationalityReport) -> Self {
        RationalityView {
            well_formed: report.well_formedness.well_formed,
            violations: report.violations(),
            well_formedness: report.well_formedness,
            postulates: report.postulates,
        }
    }
}

/// Counters about an evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// The number of arguments built.
    pub argument_count: usize,
    /// The number of attacks.
    pub attack_count: usize,
    /// The number of defeats.
    pub defeat_count: usize,
    /// The number of preference pairs given as input.
    pub preference_count: usize,
    /// The number of preference cycles detected.
    pub cycle_count: usize,
    /// The time spent in the evaluation, in milliseconds.
    pub computation_time_ms: u64,
}

/// The result of an evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    /// The ordering policy used.
    pub ordering: OrderingPolicy,
    /// The arguments, possibly truncated.
    pub arguments: Vec<ArgumentView>,
    /// The attacks, possibly truncated.
    pub attacks: Vec<AttackView>,
    /// The defeats, possibly truncated.
    pub defeats: Vec<DefeatView>,
    /// The labels of the arguments of the grounded extension.
    pub grounded_extension: Vec<String>,
    /// The justification status of each argument.
    pub justification_status: BTreeMap<String, Justification>,
    /// A summary of the grounded labelling.
    pub labelling_summary: LabellingSummary,
    /// Statistics about the defeat graph.
    pub graph_stats: DefeatGraphStats,
    /// The rationality checks.
    pub rationality: RationalityView,
    /// The lists truncated by the output limits, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,
    /// The construction parameters used.
    pub construction_params: ConstructionParams,
    /// The construction bound that was reached, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_limit: Option<ConstructionLimit>,
    /// Counters about the evaluation.
    pub metrics: Metrics,
    /// The data quality warnings.
    pub warnings: Vec<String>,
    /// Whether the response comes from the cache.
    pub cached: bool,
}

impl EvaluationResponse {
    /// Returns the status of the argument with the given label, if any.
    pub fn status_of(&self, label: &str) -> Option<Justification> {
        self.justification_status.get(label).copied()
    }

    /// Returns the conclusions of the arguments of the grounded extension.
    pub fn justified_conclusions(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.labelling_summary.justified_conclusions.iter()
    }
}
