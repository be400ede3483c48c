use super::{
    cache::{fingerprint, Cache, DEFAULT_CACHE_TTL},
    error::EvaluationError,
    limits::{truncate, OutputLimits, Truncation},
    request::EvaluationRequest,
    response::{ArgumentView, AttackView, DefeatView, EvaluationResponse, Metrics},
};
use crate::aspic::{
    compute_attacks, compute_defeats, construct_arguments, new_ordering_for, OrderingPolicy, Preference,
};
use crate::preferences::{detect_cycles, populate, transitive_closure, PreferenceStore};
use crate::rationality::RationalityReport;
use crate::semantics::{defeat_graph_stats, grounded_labelling, summarize_labelling, DefeatGraph, Justification};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Runs the evaluation pipeline: preference completion, argument construction, attacks, defeats,
/// grounded labelling and rationality checks.
///
/// An evaluator holds no mutable state of its own; it may be shared between threads when its cache is.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{ArgumentationTheory, Rule};
/// # use crustaspic::evaluation::{EvaluationRequest, Evaluator};
/// # use crustaspic::semantics::Justification;
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.add_rule(Rule::defeasible("d1", &["p"], "q")).unwrap();
/// let response = Evaluator::default().evaluate(&EvaluationRequest::new(theory)).unwrap();
/// assert_eq!(2, response.arguments.len());
/// assert!(response.attacks.is_empty());
/// assert_eq!(vec!["A0", "A1"], response.grounded_extension);
/// assert_eq!(Some(Justification::In), response.status_of("A1"));
/// ```
pub struct Evaluator<'a> {
    cache: Option<&'a dyn Cache>,
    cache_ttl: Duration,
    limits: OutputLimits,
}

impl Default for Evaluator<'_> {
    fn default() -> Self {
        Evaluator {
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            limits: OutputLimits::default(),
        }
    }
}

impl<'a> Evaluator<'a> {
    /// Sets the cache used to store the responses.
    pub fn with_cache(mut self, cache: &'a dyn Cache, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Sets the caps on the lists returned in the responses.
    pub fn with_limits(mut self, limits: OutputLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Evaluates a request.
    ///
    /// The request is validated first; invalid requests are rejected before any computation.
    /// Failures of the pipeline are logged and returned as [`EvaluationError::Internal`] errors.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResponse, EvaluationError> {
        self.evaluate_with_warnings(request, vec![])
    }

    /// Evaluates a request after adding the preferences read from a store to its theory.
    ///
    /// The store is only read. Records that cannot be resolved are reported as warnings.
    pub fn evaluate_with_store(
        &self,
        request: &EvaluationRequest,
        store: &dyn PreferenceStore,
    ) -> Result<EvaluationResponse, EvaluationError> {
        let populated = populate(store).map_err(|e| self.internal_error(&e))?;
        let mut request = request.clone();
        let kb = request.theory.knowledge_base_mut();
        for p in populated.premise_preferences.iter() {
            kb.add_premise_preference(p.preferred(), p.dispreferred());
        }
        for p in populated.rule_preferences.iter() {
            kb.add_rule_preference(p.preferred(), p.dispreferred());
        }
        self.evaluate_with_warnings(&request, populated.warnings)
    }

    /// Evaluates a request under both ordering policies and reports their differences.
    pub fn compare_orderings(&self, request: &EvaluationRequest) -> Result<OrderingComparison, EvaluationError> {
        let mut request = request.clone();
        request.ordering = OrderingPolicy::LastLink;
        let last_link = self.evaluate(&request)?;
        request.ordering = OrderingPolicy::WeakestLink;
        let weakest_link = self.evaluate(&request)?;
        Ok(OrderingComparison::new(last_link, weakest_link))
    }

    fn internal_error(&self, e: &anyhow::Error) -> EvaluationError {
        error!("evaluation failed: {:#}", e);
        EvaluationError::internal(e)
    }

    fn evaluate_with_warnings(
        &self,
        request: &EvaluationRequest,
        warnings: Vec<String>,
    ) -> Result<EvaluationResponse, EvaluationError> {
        request.validate()?;
        let key = match self.cache {
            Some(_) if !request.bypass_cache => match fingerprint(request, &self.limits) {
                Ok(k) => Some(k),
                Err(e) => {
                    warn!("cache disabled for this request: {:#}", e);
                    None
                }
            },
            _ => None,
        };
        if let (Some(cache), Some(k)) = (self.cache, key.as_ref()) {
            if let Some(mut response) = read_cache(cache, k) {
                debug!("cache hit for {}", k);
                response.cached = true;
                return Ok(response);
            }
        }
        let response = run_pipeline(request, &self.limits, warnings).map_err(|e| self.internal_error(&e))?;
        if let (Some(cache), Some(k)) = (self.cache, key.as_ref()) {
            if let Err(e) = serde_json::to_string(&response)
                .context("while serializing a response")
                .and_then(|json| cache.set(k, &json, self.cache_ttl))
            {
                warn!("cannot write to the cache: {:#}", e);
            }
        }
        Ok(response)
    }
}

fn read_cache(cache: &dyn Cache, key: &str) -> Option<EvaluationResponse> {
    let read = cache.get(key).and_then(|v| match v {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .context("while reading a cached response"),
        None => Ok(None),
    });
    match read {
        Ok(r) => r,
        Err(e) => {
            warn!("cannot read from the cache: {:#}", e);
            None
        }
    }
}

fn complete_preferences(
    preferences: &[Preference],
    name: &str,
    request: &EvaluationRequest,
    warnings: &mut Vec<String>,
) -> (Vec<Preference>, usize) {
    let mut completed = preferences.to_vec();
    if request.compute_transitive_closure {
        completed = transitive_closure(preferences);
        if completed.len() > preferences.len() {
            warnings.push(format!(
                "transitive closure added {} {} preferences",
                completed.len() - preferences.len(),
                name
            ));
        }
    }
    let mut n_cycles = 0;
    if request.detect_cycles {
        n_cycles = detect_cycles(&completed).len();
        if n_cycles > 0 {
            warnings.push(format!("detected {} cycles in {} preferences", n_cycles, name));
        }
    }
    (completed, n_cycles)
}

fn run_pipeline(
    request: &EvaluationRequest,
    limits: &OutputLimits,
    mut warnings: Vec<String>,
) -> Result<EvaluationResponse> {
    let start = Instant::now();
    let mut theory = request.theory.clone();
    let preference_count =
        theory.knowledge_base().premise_preferences().len() + theory.knowledge_base().rule_preferences().len();
    let (premise_preferences, n_premise_cycles) = complete_preferences(
        theory.knowledge_base().premise_preferences(),
        "premise",
        request,
        &mut warnings,
    );
    let (rule_preferences, n_rule_cycles) =
        complete_preferences(theory.knowledge_base().rule_preferences(), "rule", request, &mut warnings);
    theory.knowledge_base_mut().set_premise_preferences(premise_preferences);
    theory.knowledge_base_mut().set_rule_preferences(rule_preferences);

    let params = request.construction_params();
    let outcome = construct_arguments(&theory, &params);
    if let Some(limit) = outcome.limit() {
        warnings.push(format!("argument construction stopped early: {} reached", limit));
    }
    let arguments = outcome.arguments();
    info!("built {} arguments in {} rounds", arguments.len(), outcome.rounds());

    let attacks = compute_attacks(&theory, arguments);
    let ordering = new_ordering_for(request.ordering, &theory);
    let defeats = compute_defeats(arguments, &attacks, ordering.as_ref(), request.defeat_criterion);
    info!(
        "found {} attacks and {} defeats under {}",
        attacks.len(),
        defeats.len(),
        request.ordering
    );

    let graph = DefeatGraph::new_with_defeats(arguments.len(), &defeats).context("while building the defeat graph")?;
    let labelling = grounded_labelling(&graph);
    let in_arguments = labelling.in_arguments();
    let rationality = RationalityReport::new(&theory, arguments, &in_arguments);
    if !rationality.well_formedness.well_formed {
        warn!("the theory is not well formed");
    }

    let mut argument_views = (0..arguments.len())
        .map(|a| ArgumentView::new(a, arguments, &theory))
        .collect::<Vec<_>>();
    let mut attack_views = attacks
        .iter()
        .map(|a| AttackView::new(a, arguments))
        .collect::<Vec<_>>();
    let mut defeat_views = defeats
        .iter()
        .map(|d| DefeatView::new(d, &attacks, arguments))
        .collect::<Vec<_>>();
    let truncation = Truncation {
        arguments: truncate(&mut argument_views, limits.max_arguments),
        attacks: truncate(&mut attack_views, limits.max_attacks),
        defeats: truncate(&mut defeat_views, limits.max_defeats),
    };

    let label = |a: usize| arguments.get_argument_by_id(a).label();
    Ok(EvaluationResponse {
        ordering: request.ordering,
        arguments: argument_views,
        attacks: attack_views,
        defeats: defeat_views,
        grounded_extension: in_arguments.iter().map(|a| label(*a)).collect(),
        justification_status: labelling
            .labels()
            .iter()
            .enumerate()
            .map(|(a, j)| (label(a), *j))
            .collect(),
        labelling_summary: summarize_labelling(arguments, &labelling),
        graph_stats: defeat_graph_stats(&graph),
        rationality: rationality.into(),
        truncation: if truncation.is_truncated() {
            Some(truncation)
        } else {
            None
        },
        construction_params: params,
        construction_limit: outcome.limit(),
        metrics: Metrics {
            argument_count: arguments.len(),
            attack_count: attacks.len(),
            defeat_count: defeats.len(),
            preference_count,
            cycle_count: n_premise_cycles + n_rule_cycles,
            computation_time_ms: start.elapsed().as_millis() as u64,
        },
        warnings,
        cached: false,
    })
}

/// A defeat, identified by the labels of its defeater and of the defeated argument.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatPair {
    /// The label of the defeater.
    pub defeater: String,
    /// The label of the defeated argument.
    pub defeated: String,
}

/// An argument whose status depends on the ordering policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDifference {
    /// The label of the argument.
    pub argument: String,
    /// The status under the last-link policy.
    pub last_link: Justification,
    /// The status under the weakest-link policy.
    pub weakest_link: Justification,
}

/// The evaluations of a request under both ordering policies, and their differences.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingComparison {
    /// The evaluation under the last-link policy.
    pub last_link: EvaluationResponse,
    /// The evaluation under the weakest-link policy.
    pub weakest_link: EvaluationResponse,
    /// The number of last-link defeats minus the number of weakest-link defeats.
    pub defeat_count_diff: i64,
    /// The defeats present under the last-link policy only.
    pub unique_to_last_link: Vec<DefeatPair>,
    /// The defeats present under the weakest-link policy only.
    pub unique_to_weakest_link: Vec<DefeatPair>,
    /// The arguments whose status differs.
    pub status_differences: Vec<StatusDifference>,
}

impl OrderingComparison {
    fn new(last_link: EvaluationResponse, weakest_link: EvaluationResponse) -> Self {
        let pairs = |r: &EvaluationResponse| {
            r.defeats
                .iter()
                .map(|d| DefeatPair {
                    defeater: d.defeater.clone(),
                    defeated: d.defeated.clone(),
                })
                .collect::<BTreeSet<DefeatPair>>()
        };
        let ll_pairs = pairs(&last_link);
        let wl_pairs = pairs(&weakest_link);
        let status_differences = last_link
            .justification_status
            .iter()
            .filter_map(|(a, ll)| match weakest_link.justification_status.get(a) {
                Some(wl) if wl != ll => Some(StatusDifference {
                    argument: a.clone(),
                    last_link: *ll,
                    weakest_link: *wl,
                }),
                _ => None,
            })
            .collect();
        OrderingComparison {
            defeat_count_diff: last_link.metrics.defeat_count as i64 - weakest_link.metrics.defeat_count as i64,
            unique_to_last_link: ll_pairs.difference(&wl_pairs).cloned().collect(),
            unique_to_weakest_link: wl_pairs.difference(&ll_pairs).cloned().collect(),
            status_differences,
            last_link,
            weakest_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspic::{ArgumentationTheory, AttackKind, DefeatCriterion, Rule};
    use crate::evaluation::MemoryCache;
    use crate::graph::{ArgumentGraph, StoredArgument};
    use crate::preferences::PreferenceTarget;

    fn eval(theory: ArgumentationTheory) -> EvaluationResponse {
        Evaluator::default().evaluate(&EvaluationRequest::new(theory)).unwrap()
    }

    fn status_of_conclusion(response: &EvaluationResponse, conclusion: &str) -> Justification {
        let arg = response.arguments.iter().find(|a| a.conclusion == conclusion).unwrap();
        response.status_of(&arg.id).unwrap()
    }

    #[test]
    fn test_axiom_and_defeasible_rule() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("p");
        theory.add_rule(Rule::defeasible("d1", &["p"], "q")).unwrap();
        let response = eval(theory);
        assert_eq!(2, response.metrics.argument_count);
        assert_eq!(0, response.metrics.attack_count);
        assert_eq!(Justification::In, status_of_conclusion(&response, "q"));
        assert!(response.rationality.well_formed);
        assert!(response.truncation.is_none());
        assert!(!response.cached);
    }

    #[test]
    fn test_preferred_premise_wins() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_premise("p");
        theory.knowledge_base_mut().add_premise("¬p");
        theory.contraries_mut().add_classical_negation(["p"]);
        theory.knowledge_base_mut().add_premise_preference("¬p", "p");
        let response = eval(theory);
        assert_eq!(2, response.metrics.attack_count);
        assert_eq!(1, response.metrics.defeat_count);
        assert_eq!(AttackKind::Undermine, response.defeats[0].kind);
        assert!(response.defeats[0].preference_applied);
        assert_eq!(Justification::Out, status_of_conclusion(&response, "p"));
        assert_eq!(Justification::In, status_of_conclusion(&response, "¬p"));
    }

    #[test]
    fn test_incomparable_premises() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_premise("p");
        theory.knowledge_base_mut().add_premise("q");
        theory.contraries_mut().add_contradictory("p", "q");
        let response = eval(theory.clone());
        assert_eq!(2, response.metrics.attack_count);
        assert_eq!(0, response.metrics.defeat_count);
        assert_eq!(2, response.grounded_extension.len());
        let mut request = EvaluationRequest::new(theory);
        request.defeat_criterion = DefeatCriterion::NotWorse;
        let response = Evaluator::default().evaluate(&request).unwrap();
        assert_eq!(2, response.metrics.defeat_count);
        assert!(response.grounded_extension.is_empty());
    }

    #[test]
    fn test_preference_cycles_and_closure() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_premise("a");
        theory.knowledge_base_mut().add_premise_preference("a", "b");
        theory.knowledge_base_mut().add_premise_preference("b", "c");
        theory.knowledge_base_mut().add_premise_preference("c", "a");
        let mut request = EvaluationRequest::new(theory);
        let response = Evaluator::default().evaluate(&request).unwrap();
        assert_eq!(3, response.metrics.preference_count);
        assert_eq!(1, response.metrics.cycle_count);
        assert!(response.warnings.contains(&"detected 1 cycles in premise preferences".to_string()));
        request.compute_transitive_closure = true;
        request.detect_cycles = false;
        let response = Evaluator::default().evaluate(&request).unwrap();
        assert_eq!(0, response.metrics.cycle_count);
        assert!(response
            .warnings
            .contains(&"transitive closure added 6 premise preferences".to_string()));
    }

    #[test]
    fn test_truncation() {
        let mut theory = ArgumentationTheory::default();
        for p in ["p", "q", "r"] {
            theory.knowledge_base_mut().add_premise(p);
        }
        let limits = OutputLimits {
            max_arguments: 2,
            ..Default::default()
        };
        let response = Evaluator::default()
            .with_limits(limits)
            .evaluate(&EvaluationRequest::new(theory))
            .unwrap();
        assert_eq!(2, response.arguments.len());
        assert_eq!(3, response.metrics.argument_count);
        assert_eq!(3, response.justification_status.len());
        let truncation = response.truncation.unwrap();
        assert_eq!(Some(3), truncation.arguments);
        assert_eq!(None, truncation.attacks);
    }

    #[test]
    fn test_invalid_request() {
        let mut request = EvaluationRequest::new(ArgumentationTheory::default());
        request.max_depth = 0;
        let err = Evaluator::default().evaluate(&request).unwrap_err();
        assert_eq!("INVALID_REQUEST", err.code());
    }

    #[test]
    fn test_cache() {
        let cache = MemoryCache::default();
        let evaluator = Evaluator::default().with_cache(&cache, DEFAULT_CACHE_TTL);
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("p");
        let mut request = EvaluationRequest::new(theory);
        assert!(!evaluator.evaluate(&request).unwrap().cached);
        assert_eq!(1, cache.len());
        let cached = evaluator.evaluate(&request).unwrap();
        assert!(cached.cached);
        assert_eq!(1, cached.arguments.len());
        request.bypass_cache = true;
        assert!(!evaluator.evaluate(&request).unwrap().cached);
    }

    #[test]
    fn test_evaluate_with_store() {
        let mut graph = ArgumentGraph::default();
        graph.add_claim("c1", "p");
        graph.add_claim("c2", "q");
        graph.add_argument(StoredArgument::new("a1", &["c1"], "c2"));
        graph
            .create_preference(
                PreferenceTarget::Claim("c2".to_string()),
                PreferenceTarget::Claim("c1".to_string()),
            )
            .unwrap();
        graph
            .create_preference(
                PreferenceTarget::Claim("c1".to_string()),
                PreferenceTarget::Claim("missing".to_string()),
            )
            .unwrap();
        let (theory, _) = crate::graph::derive_theory(&graph).unwrap();
        let response = Evaluator::default()
            .evaluate_with_store(&EvaluationRequest::new(theory), &graph)
            .unwrap();
        assert_eq!(1, response.metrics.preference_count);
        assert_eq!(1, response.warnings.len());
        assert_eq!(2, response.metrics.argument_count);
    }

    #[test]
    fn test_store_preference_between_scheme_and_plain_argument() {
        let mut graph = ArgumentGraph::default();
        for (id, text) in [("c1", "p"), ("c2", "q"), ("c3", "r"), ("c4", "not_q")] {
            graph.add_claim(id, text);
        }
        graph.add_scheme("s1");
        graph.add_argument(StoredArgument::new("a1", &["c1"], "c2").with_scheme("s1"));
        graph.add_argument(StoredArgument::new("a2", &["c3"], "c4"));
        graph.add_contrary("c2", "c4", true);
        graph
            .create_preference(
                PreferenceTarget::Argument("a1".to_string()),
                PreferenceTarget::Argument("a2".to_string()),
            )
            .unwrap();
        let (theory, _) = crate::graph::derive_theory(&graph).unwrap();
        let response = Evaluator::default()
            .evaluate_with_store(&EvaluationRequest::new(theory), &graph)
            .unwrap();
        assert_eq!(1, response.metrics.preference_count);
        assert!(response.warnings.is_empty());
        assert_eq!(2, response.metrics.attack_count);
        assert_eq!(1, response.metrics.defeat_count);
        assert_eq!(Justification::In, status_of_conclusion(&response, "q"));
        assert_eq!(Justification::Out, status_of_conclusion(&response, "not_q"));
    }

    #[test]
    fn test_compare_orderings() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_premise("a");
        theory.knowledge_base_mut().add_premise("b");
        theory.add_rule(Rule::defeasible("r1", &["a"], "x")).unwrap();
        theory.add_rule(Rule::defeasible("r2", &["b"], "¬x")).unwrap();
        theory.contraries_mut().add_classical_negation(["x"]);
        theory.knowledge_base_mut().add_rule_preference("r1", "r2");
        theory.knowledge_base_mut().add_premise_preference("b", "a");
        let comparison = Evaluator::default()
            .compare_orderings(&EvaluationRequest::new(theory))
            .unwrap();
        assert_eq!(OrderingPolicy::LastLink, comparison.last_link.ordering);
        assert_eq!(OrderingPolicy::WeakestLink, comparison.weakest_link.ordering);
        assert_eq!(1, comparison.last_link.metrics.defeat_count);
        assert_eq!(0, comparison.weakest_link.metrics.defeat_count);
        assert_eq!(1, comparison.defeat_count_diff);
        assert_eq!(1, comparison.unique_to_last_link.len());
        assert!(comparison.unique_to_weakest_link.is_empty());
        assert_eq!(1, comparison.status_differences.len());
    }
}
