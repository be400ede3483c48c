use super::{
    argument::{Argument, ArgumentSet},
    language::{Literal, Rule},
    theory::ArgumentationTheory,
};
use log::debug;
use permutator::CartesianProduct;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use strum_macros::{AsRefStr, Display, EnumString};

/// The default maximal number of construction rounds.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// The default maximal number of arguments.
pub const DEFAULT_MAX_ARGUMENTS: usize = 1000;

/// The parameters of the argument construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionParams {
    /// The maximal number of rounds after the atomic arguments are built.
    pub max_depth: usize,
    /// The maximal number of arguments.
    pub max_arguments: usize,
    /// Whether arguments with a strict top rule and the same conclusion, premises and defeasible rules are collapsed.
    pub dedupe_strict_rules: bool,
    /// Whether rule applications leading to a set of premises containing a literal and one of its contraries are skipped.
    pub require_consistency: bool,
}

impl Default for ConstructionParams {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_arguments: DEFAULT_MAX_ARGUMENTS,
            dedupe_strict_rules: true,
            require_consistency: false,
        }
    }
}

/// The bound that stopped the construction before it reached a fixpoint.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ConstructionLimit {
    /// The maximal number of rounds was run and the last one built new arguments.
    ///
    /// The bound was hit: a further round is not run, so it is unknown whether it would have built anything.
    MaxDepth,
    /// The maximal number of arguments was reached.
    MaxArguments,
}

/// The result of an argument construction.
#[derive(Debug)]
pub struct ConstructionOutcome {
    arguments: ArgumentSet,
    rounds: usize,
    limit: Option<ConstructionLimit>,
}

impl ConstructionOutcome {
    /// Returns the arguments.
    pub fn arguments(&self) -> &ArgumentSet {
        &self.arguments
    }

    /// Consumes the outcome and returns the arguments.
    pub fn into_arguments(self) -> ArgumentSet {
        self.arguments
    }

    /// Returns the number of rounds that produced composite arguments.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the bound that was reached, if any.
    pub fn limit(&self) -> Option<ConstructionLimit> {
        self.limit
    }

    /// Returns `true` iff a bound was reached.
    pub fn limit_reached(&self) -> bool {
        self.limit.is_some()
    }
}

type StrictKey = (Literal, BTreeSet<Literal>, BTreeSet<usize>, BTreeSet<usize>);

struct ArgumentBuilder<'a> {
    theory: &'a ArgumentationTheory,
    params: &'a ConstructionParams,
    arguments: ArgumentSet,
    structural_keys: HashSet<(usize, Vec<usize>)>,
    strict_keys: HashSet<StrictKey>,
}

impl<'a> ArgumentBuilder<'a> {
    fn new(theory: &'a ArgumentationTheory, params: &'a ConstructionParams) -> Self {
        Self {
            theory,
            params,
            arguments: ArgumentSet::default(),
            structural_keys: HashSet::new(),
            strict_keys: HashSet::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.arguments.len() >= self.params.max_arguments
    }

    fn build_atomic_arguments(&mut self) {
        for (literal, kind) in self.theory.knowledge_base().iter_elements() {
            if self.is_full() {
                return;
            }
            let id = self.arguments.len();
            self.arguments
                .push(Argument::new_atomic(id, literal, kind));
        }
    }

    // Builds the arguments of a round; `old_end` is the number of arguments built before the previous round,
    // `new_end` the number of arguments built before this round.
    fn build_round(&mut self, round: usize, old_end: usize, new_end: usize) {
        let theory = self.theory;
        for (rule_index, rule) in theory.rules().iter().enumerate() {
            if self.is_full() {
                return;
            }
            if rule.antecedents().is_empty() {
                if round == 1 {
                    self.try_add(rule_index, rule, vec![]);
                }
                continue;
            }
            let all = rule
                .antecedents()
                .iter()
                .map(|a| {
                    self.arguments
                        .with_conclusion(a)
                        .iter()
                        .copied()
                        .filter(|id| *id < new_end)
                        .collect::<Vec<usize>>()
                })
                .collect::<Vec<Vec<usize>>>();
            if all.iter().any(|d| d.is_empty()) {
                continue;
            }
            // the first position holding an argument of the previous round is `first_new`;
            // positions before it use older arguments only, which makes each combination unique
            for first_new in 0..all.len() {
                let domains = all
                    .iter()
                    .enumerate()
                    .map(|(i, d)| match i.cmp(&first_new) {
                        std::cmp::Ordering::Less => {
                            d.iter().copied().filter(|id| *id < old_end).collect()
                        }
                        std::cmp::Ordering::Equal => {
                            d.iter().copied().filter(|id| *id >= old_end).collect()
                        }
                        std::cmp::Ordering::Greater => d.clone(),
                    })
                    .collect::<Vec<Vec<usize>>>();
                if domains.iter().any(|d| d.is_empty()) {
                    continue;
                }
                let domain_refs = domains
                    .iter()
                    .map(|v| v.as_slice())
                    .collect::<Vec<&[usize]>>();
                for combination in domain_refs.as_slice().cart_prod() {
                    if self.is_full() {
                        return;
                    }
                    self.try_add(rule_index, rule, combination.into_iter().copied().collect());
                }
            }
        }
    }

    fn try_add(&mut self, rule_index: usize, rule: &Rule, subs: Vec<usize>) {
        let conclusion = rule.consequent();
        let circular = subs.iter().any(|s| {
            self.arguments
                .get_argument_by_id(*s)
                .all_sub_arguments()
                .iter()
                .any(|t| self.arguments.get_argument_by_id(*t).conclusion() == conclusion)
        });
        if circular {
            return;
        }
        let structural_key = (rule_index, subs.clone());
        if self.structural_keys.contains(&structural_key) {
            return;
        }
        let mut premises = BTreeSet::new();
        let mut all_sub_arguments = BTreeSet::new();
        let mut defeasible_rules = BTreeSet::new();
        let mut last_defeasible_rules = BTreeSet::new();
        let mut firm = true;
        let mut depth = 0;
        for s in subs.iter() {
            let sub = self.arguments.get_argument_by_id(*s);
            premises.extend(sub.premises().iter().cloned());
            all_sub_arguments.extend(sub.all_sub_arguments().iter().copied());
            defeasible_rules.extend(sub.defeasible_rules().iter().copied());
            last_defeasible_rules.extend(sub.last_defeasible_rules().iter().copied());
            firm &= sub.is_firm();
            depth = usize::max(depth, sub.depth() + 1);
        }
        if rule.is_defeasible() {
            defeasible_rules.insert(rule_index);
            last_defeasible_rules = std::iter::once(rule_index).collect();
        }
        if self.params.require_consistency && self.theory.contraries().is_inconsistent(premises.iter())
        {
            return;
        }
        if rule.is_strict() && self.params.dedupe_strict_rules {
            let strict_key = (
                conclusion.to_string(),
                premises.clone(),
                defeasible_rules.clone(),
                last_defeasible_rules.clone(),
            );
            if !self.strict_keys.insert(strict_key) {
                return;
            }
        }
        self.structural_keys.insert(structural_key);
        let id = self.arguments.len();
        all_sub_arguments.insert(id);
        self.arguments.push(Argument {
            id,
            conclusion: conclusion.to_string(),
            premises,
            premise_kind: None,
            top_rule: Some((rule_index, rule.kind())),
            sub_arguments: subs,
            all_sub_arguments,
            defeasible_rules,
            last_defeasible_rules,
            firm,
            depth: usize::max(depth, 1),
        });
    }
}

/// Builds the arguments of a theory by a bounded breadth-first closure.
///
/// Round 0 builds an atomic argument for each knowledge base element.
/// Each following round applies every rule to the combinations of existing arguments concluding its antecedents,
/// requiring at least one argument of the previous round in each combination.
/// Rules without antecedents are applied in the first round.
///
/// The construction stops when a round adds nothing, when `max_depth` rounds were run,
/// or when `max_arguments` arguments were built.
/// Reaching a bound is not an error: it is reported by [`ConstructionOutcome::limit`].
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{construct_arguments, ArgumentationTheory, ConstructionParams, Rule};
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.add_rule(Rule::defeasible("r1", &["p"], "q")).unwrap();
/// let outcome = construct_arguments(&theory, &ConstructionParams::default());
/// assert_eq!(2, outcome.arguments().len());
/// assert!(!outcome.limit_reached());
/// ```
pub fn construct_arguments(
    theory: &ArgumentationTheory,
    params: &ConstructionParams,
) -> ConstructionOutcome {
    let mut builder = ArgumentBuilder::new(theory, params);
    builder.build_atomic_arguments();
    debug!("built {} atomic arguments", builder.arguments.len());
    let mut old_end = 0;
    let mut new_end = builder.arguments.len();
    let mut rounds = 0;
    let mut limit = None;
    for round in 1..=params.max_depth {
        if builder.is_full() {
            break;
        }
        builder.build_round(round, old_end, new_end);
        let n_added = builder.arguments.len() - new_end;
        debug!("round {} built {} arguments", round, n_added);
        if n_added == 0 {
            break;
        }
        rounds = round;
        old_end = new_end;
        new_end = builder.arguments.len();
        if round == params.max_depth {
            limit = Some(ConstructionLimit::MaxDepth);
        }
    }
    if builder.is_full() {
        limit = Some(ConstructionLimit::MaxArguments);
    }
    ConstructionOutcome {
        arguments: builder.arguments,
        rounds,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspic::KnowledgeBase;

    fn theory_with(rules: Vec<Rule>, kb: KnowledgeBase) -> ArgumentationTheory {
        ArgumentationTheory::new(rules, Default::default(), kb).unwrap()
    }

    fn conclusions(outcome: &ConstructionOutcome) -> Vec<String> {
        let mut c = outcome
            .arguments()
            .iter()
            .map(|a| a.conclusion().to_string())
            .collect::<Vec<String>>();
        c.sort_unstable();
        c
    }

    #[test]
    fn test_axiom_and_defeasible_rule() {
        let mut kb = KnowledgeBase::default();
        kb.add_axiom("p");
        let theory = theory_with(vec![Rule::defeasible("r1", &["p"], "q")], kb);
        let outcome = construct_arguments(&theory, &ConstructionParams::default());
        assert_eq!(vec!["p", "q"], conclusions(&outcome));
        assert_eq!(1, outcome.rounds());
        assert_eq!(None, outcome.limit());
    }

    #[test]
    fn test_chain() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        let rules = vec![
            Rule::defeasible("r1", &["a"], "b"),
            Rule::defeasible("r2", &["b"], "c"),
            Rule::strict("r3", &["c", "a"], "d"),
        ];
        let outcome = construct_arguments(&theory_with(rules, kb), &ConstructionParams::default());
        assert_eq!(vec!["a", "b", "c", "d"], conclusions(&outcome));
        let d = outcome.arguments().with_conclusion("d")[0];
        let d = outcome.arguments().get_argument_by_id(d);
        assert_eq!(3, d.depth());
        assert_eq!(2, d.defeasible_rules().len());
        assert_eq!(&std::iter::once(1).collect::<BTreeSet<usize>>(), d.last_defeasible_rules());
    }

    #[test]
    fn test_distinct_chains() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        kb.add_premise("b");
        let rules = vec![
            Rule::defeasible("r1", &["a"], "c"),
            Rule::defeasible("r2", &["b"], "c"),
            Rule::defeasible("r3", &["c"], "d"),
        ];
        let outcome = construct_arguments(&theory_with(rules, kb), &ConstructionParams::default());
        assert_eq!(2, outcome.arguments().with_conclusion("c").len());
        assert_eq!(2, outcome.arguments().with_conclusion("d").len());
    }

    #[test]
    fn test_no_circular_arguments() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        let rules = vec![
            Rule::defeasible("r1", &["a"], "b"),
            Rule::defeasible("r2", &["b"], "a"),
        ];
        let outcome = construct_arguments(&theory_with(rules, kb), &ConstructionParams::default());
        assert_eq!(vec!["a", "b"], conclusions(&outcome));
        assert_eq!(None, outcome.limit());
    }

    #[test]
    fn test_rule_without_antecedents() {
        let theory = theory_with(vec![Rule::strict("f", &[] as &[&str], "fact")], KnowledgeBase::default());
        let outcome = construct_arguments(&theory, &ConstructionParams::default());
        assert_eq!(vec!["fact"], conclusions(&outcome));
        let fact = outcome.arguments().get_argument_by_id(0);
        assert!(fact.is_strict() && fact.is_firm());
    }

    #[test]
    fn test_strict_dedup() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        let rules = vec![
            Rule::strict("s1", &["a"], "b"),
            Rule::strict("s2", &["a"], "b"),
        ];
        let theory = theory_with(rules, kb);
        let outcome = construct_arguments(&theory, &ConstructionParams::default());
        assert_eq!(1, outcome.arguments().with_conclusion("b").len());
        let params = ConstructionParams {
            dedupe_strict_rules: false,
            ..Default::default()
        };
        let outcome = construct_arguments(&theory, &params);
        assert_eq!(2, outcome.arguments().with_conclusion("b").len());
    }

    #[test]
    fn test_require_consistency() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        kb.add_premise("b");
        let mut theory = theory_with(vec![Rule::defeasible("r1", &["a", "b"], "c")], kb);
        theory.contraries_mut().add_contrary("a", "b");
        let outcome = construct_arguments(&theory, &ConstructionParams::default());
        assert_eq!(1, outcome.arguments().with_conclusion("c").len());
        let params = ConstructionParams {
            require_consistency: true,
            ..Default::default()
        };
        let outcome = construct_arguments(&theory, &params);
        assert!(outcome.arguments().with_conclusion("c").is_empty());
    }

    #[test]
    fn test_max_depth() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("l0");
        let rules = (0..5)
            .map(|i| Rule::defeasible(&format!("r{}", i), &[format!("l{}", i)], &format!("l{}", i + 1)))
            .collect::<Vec<Rule>>();
        let params = ConstructionParams {
            max_depth: 2,
            ..Default::default()
        };
        let outcome = construct_arguments(&theory_with(rules, kb), &params);
        assert_eq!(vec!["l0", "l1", "l2"], conclusions(&outcome));
        assert_eq!(Some(ConstructionLimit::MaxDepth), outcome.limit());
    }

    #[test]
    fn test_max_arguments() {
        let mut kb = KnowledgeBase::default();
        for i in 0..20 {
            kb.add_premise(&format!("p{}", i));
        }
        let rules = (0..20)
            .map(|i| Rule::defeasible(&format!("r{}", i), &[format!("p{}", i)], &format!("q{}", i)))
            .collect::<Vec<Rule>>();
        let params = ConstructionParams {
            max_arguments: 25,
            ..Default::default()
        };
        let outcome = construct_arguments(&theory_with(rules, kb), &params);
        assert_eq!(25, outcome.arguments().len());
        assert_eq!(Some(ConstructionLimit::MaxArguments), outcome.limit());
    }

    #[test]
    fn test_max_arguments_with_wide_rule() {
        let mut kb = KnowledgeBase::default();
        let mut rules = vec![];
        for i in 0..70 {
            kb.add_premise(&format!("p{}", i));
            for l in ["x", "y", "z", "w"] {
                rules.push(Rule::defeasible(&format!("r{}{}", l, i), &[format!("p{}", i)], l));
            }
        }
        rules.push(Rule::defeasible("goal", &["x", "y", "z", "w"], "goal"));
        let params = ConstructionParams {
            max_arguments: 5000,
            ..Default::default()
        };
        let start = std::time::Instant::now();
        let outcome = construct_arguments(&theory_with(rules, kb), &params);
        assert!(start.elapsed() < std::time::Duration::from_secs(30));
        assert_eq!(5000, outcome.arguments().len());
        assert_eq!(4650, outcome.arguments().with_conclusion("goal").len());
        assert_eq!(Some(ConstructionLimit::MaxArguments), outcome.limit());
    }

    #[test]
    fn test_max_depth_at_fixpoint() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        let params = ConstructionParams {
            max_depth: 1,
            ..Default::default()
        };
        let outcome = construct_arguments(&theory_with(vec![Rule::defeasible("r1", &["a"], "b")], kb), &params);
        assert_eq!(2, outcome.arguments().len());
        assert_eq!(Some(ConstructionLimit::MaxDepth), outcome.limit());
    }

    #[test]
    fn test_cartesian_product() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise("a");
        kb.add_premise("b");
        let rules = vec![
            Rule::defeasible("r1", &["a"], "x"),
            Rule::defeasible("r2", &["b"], "x"),
            Rule::defeasible("r3", &["a"], "y"),
            Rule::defeasible("r4", &["b"], "y"),
            Rule::defeasible("r5", &["x", "y"], "z"),
        ];
        let outcome = construct_arguments(&theory_with(rules, kb), &ConstructionParams::default());
        assert_eq!(4, outcome.arguments().with_conclusion("z").len());
    }
}
