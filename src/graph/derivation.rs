use super::argument_graph::{ArgumentGraph, AssumptionStatus, ClaimEdgeKind, ConflictKind, ConflictTarget};
use crate::aspic::{ArgumentationTheory, Rule, RuleKind};
use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::BTreeSet;

/// Builds an argumentation theory from a stored argument graph.
///
/// Each stored argument becomes a rule `RA:{id}` from the texts of its premises to the text of its conclusion.
/// The rule is strict if the argument says so, defeasible otherwise; it records the scheme of the argument.
/// Claims flagged as axioms become axioms, claims with an accepted assumption use become assumptions,
/// and the other claims used as premises but never concluded become ordinary premises.
///
/// The contrariness relation is built from the conflict applications, the explicit contrary records
/// and the `rebuts` edges between claims.
///
/// The preferences are not read here: they are populated from the preference store by the evaluator.
/// Dangling references are skipped; a warning is returned for each of them.
///
/// # Example
///
/// ```
/// # use crustaspic::graph::{derive_theory, ArgumentGraph, StoredArgument};
/// let mut graph = ArgumentGraph::default();
/// graph.add_claim("c1", "p");
/// graph.add_claim("c2", "q");
/// graph.add_argument(StoredArgument::new("a1", &["c1"], "c2"));
/// let (theory, warnings) = derive_theory(&graph).unwrap();
/// assert!(warnings.is_empty());
/// assert!(theory.knowledge_base().premises().contains("p"));
/// assert_eq!("RA:a1", theory.rules()[0].id());
/// ```
pub fn derive_theory(graph: &ArgumentGraph) -> Result<(ArgumentationTheory, Vec<String>)> {
    let mut theory = ArgumentationTheory::default();
    let mut warnings = vec![];
    let text_of = |claim_id: &str, warnings: &mut Vec<String>, context: &str| match graph.get_claim(claim_id) {
        Some(c) => Some(c.text().to_string()),
        None => {
            warnings.push(format!(r#"{} refers to the missing claim "{}""#, context, claim_id));
            None
        }
    };

    let mut concluded = BTreeSet::new();
    let mut used_as_premise = BTreeSet::new();
    for arg in graph.arguments() {
        let context = format!("argument {}", arg.id());
        let antecedents = arg
            .premises()
            .iter()
            .map(|p| text_of(p, &mut warnings, &context))
            .collect::<Option<Vec<String>>>();
        let consequent = text_of(arg.conclusion(), &mut warnings, &context);
        let (antecedents, consequent) = match (antecedents, consequent) {
            (Some(a), Some(c)) => (a, c),
            _ => continue,
        };
        let mut rule = Rule::new(&arg.rule_id(), &antecedents, &consequent, arg.rule_type());
        if arg.rule_type() == RuleKind::Defeasible {
            rule = rule.with_name(&arg.rule_name());
        }
        if let Some(s) = arg.scheme_id() {
            rule = rule.with_scheme(s);
        }
        theory
            .add_rule(rule)
            .with_context(|| format!("while deriving the rule of argument {}", arg.id()))?;
        used_as_premise.extend(arg.premises().iter().map(|p| p.as_str()));
        concluded.insert(arg.conclusion());
    }

    let accepted = graph
        .assumptions()
        .iter()
        .filter(|a| a.status() == AssumptionStatus::Accepted)
        .map(|a| a.claim_id())
        .collect::<BTreeSet<&str>>();
    for claim in graph.claims() {
        let kb = theory.knowledge_base_mut();
        if claim.is_axiom() {
            kb.add_axiom(claim.text());
        } else if accepted.contains(claim.id()) {
            kb.add_assumption(claim.text());
        } else if used_as_premise.contains(claim.id()) && !concluded.contains(claim.id()) {
            kb.add_premise(claim.text());
        }
    }
    for claim_id in accepted.iter().filter(|c| graph.get_claim(c).is_none()) {
        warnings.push(format!(r#"an assumption use refers to the missing claim "{}""#, claim_id));
    }

    for conflict in graph.conflicts() {
        let context = format!("conflict application {}", conflict.id());
        let attacker = match text_of(conflict.conflicting_claim(), &mut warnings, &context) {
            Some(t) => t,
            None => continue,
        };
        let targets = match (conflict.kind(), conflict.target()) {
            (ConflictKind::Undercut, ConflictTarget::Argument(a)) => graph.get_argument(a).map(|arg| {
                if arg.rule_type() == RuleKind::Strict {
                    warnings.push(format!("{} undercuts the strict argument {}", context, a));
                }
                vec![arg.rule_name()]
            }),
            (ConflictKind::Undercut, ConflictTarget::Claim(c)) => {
                warnings.push(format!(r#"{} undercuts the claim "{}" instead of an argument"#, context, c));
                continue;
            }
            (_, ConflictTarget::Claim(c)) => text_of(c, &mut warnings, &context).map(|t| vec![t]),
            (ConflictKind::Rebut, ConflictTarget::Argument(a)) => graph
                .get_argument(a)
                .and_then(|arg| text_of(arg.conclusion(), &mut warnings, &context))
                .map(|t| vec![t]),
            (ConflictKind::Undermine, ConflictTarget::Argument(a)) => graph.get_argument(a).map(|arg| {
                arg.premises()
                    .iter()
                    .filter_map(|p| text_of(p, &mut warnings, &context))
                    .collect()
            }),
        };
        match targets {
            Some(literals) => {
                for literal in literals {
                    theory.contraries_mut().add_contrary(&literal, &attacker);
                }
            }
            None => {
                if let ConflictTarget::Argument(a) = conflict.target() {
                    if graph.get_argument(a).is_none() {
                        warnings.push(format!(r#"{} refers to the missing argument "{}""#, context, a));
                    }
                }
            }
        }
    }

    for record in graph.contraries() {
        let context = "a contrary record";
        let literal = text_of(record.claim_id(), &mut warnings, context);
        let contrary = text_of(record.contrary_id(), &mut warnings, context);
        if let (Some(l), Some(c)) = (literal, contrary) {
            if record.is_symmetric() {
                theory.contraries_mut().add_contradictory(&l, &c);
            } else {
                theory.contraries_mut().add_contrary(&l, &c);
            }
        }
    }

    for edge in graph.edges().iter().filter(|e| e.kind() == ClaimEdgeKind::Rebuts) {
        let context = "a rebuts edge";
        let from = text_of(edge.from(), &mut warnings, context);
        let to = text_of(edge.to(), &mut warnings, context);
        if let (Some(f), Some(t)) = (from, to) {
            theory.contraries_mut().add_contrary(&t, &f);
        }
    }

    for w in warnings.iter() {
        warn!("{}", w);
    }
    info!(
        "derived a theory with {} rules, {} knowledge base elements and {} contraries",
        theory.rules().len(),
        theory.knowledge_base().len(),
        theory.contraries().len()
    );
    Ok((theory, warnings))
}
