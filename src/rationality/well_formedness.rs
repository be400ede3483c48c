use crate::aspic::{ArgumentationTheory, Literal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{AsRefStr, Display};

/// The closure property satisfied by the strict rules of a theory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClosureProperty {
    /// The strict rules are closed under transposition.
    Transposition,
    /// The unary strict rules are closed under contraposition.
    Contraposition,
    /// None of the closure properties hold.
    None,
}

/// The result of the well-formedness checks of a theory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellFormednessReport {
    /// Whether the axioms are consistent, directly and after applying the strict rules.
    pub axiom_consistency: bool,
    /// Whether no axiom and no strict rule consequent is the target of a (non symmetric) contrary.
    pub contrary_well_formed: bool,
    /// Whether no strict rule is dispreferred.
    pub reasonable_preferences: bool,
    /// The closure property of the strict rules.
    pub closure_property: ClosureProperty,
    /// Whether all the conditions hold.
    pub well_formed: bool,
    /// A description of each violation.
    pub violations: Vec<String>,
}

/// Computes the closure of a set of literals under the strict rules of a theory.
pub fn strict_closure(theory: &ArgumentationTheory, literals: BTreeSet<Literal>) -> BTreeSet<Literal> {
    let mut closure = literals;
    loop {
        let mut changed = false;
        for rule in theory.strict_rules() {
            if !closure.contains(rule.consequent())
                && rule.antecedents().iter().all(|a| closure.contains(a))
            {
                closure.insert(rule.consequent().to_string());
                changed = true;
            }
        }
        if !changed {
            return closure;
        }
    }
}

/// Returns the pairs of conflicting literals of a set.
pub(crate) fn conflicting_pairs(theory: &ArgumentationTheory, literals: &BTreeSet<Literal>) -> Vec<(Literal, Literal)> {
    let contraries = theory.contraries();
    let mut pairs = vec![];
    for (i, l1) in literals.iter().enumerate() {
        for l2 in literals.iter().skip(i + 1) {
            if contraries.conflict(l1, l2) {
                pairs.push((l1.clone(), l2.clone()));
            }
        }
    }
    pairs
}

fn check_axiom_consistency(theory: &ArgumentationTheory, violations: &mut Vec<String>) -> bool {
    let axioms = theory.knowledge_base().axioms().clone();
    let direct = conflicting_pairs(theory, &axioms);
    for (a, b) in direct.iter() {
        violations.push(format!(r#"axioms "{}" and "{}" are directly inconsistent"#, a, b));
    }
    let closure = strict_closure(theory, axioms);
    let indirect = conflicting_pairs(theory, &closure)
        .into_iter()
        .filter(|p| !direct.contains(p))
        .collect::<Vec<_>>();
    for (a, b) in indirect.iter() {
        violations.push(format!(
            r#"axioms are indirectly inconsistent: "{}" and "{}" are derivable by strict rules"#,
            a, b
        ));
    }
    direct.is_empty() && indirect.is_empty()
}

fn check_contrary_well_formedness(theory: &ArgumentationTheory, violations: &mut Vec<String>) -> bool {
    let contraries = theory.contraries();
    let axioms = theory.knowledge_base().axioms();
    let strict_consequents = theory
        .strict_rules()
        .map(|r| r.consequent())
        .collect::<BTreeSet<&str>>();
    let n_violations = violations.len();
    for (literal, contrary) in contraries.iter() {
        if contraries.is_contrary_of(literal, contrary) {
            continue;
        }
        if axioms.contains(literal) {
            violations.push(format!(
                r#"axiom "{}" has a contrary "{}""#,
                literal, contrary
            ));
        }
        if strict_consequents.contains(literal.as_str()) {
            violations.push(format!(
                r#"strict rule consequent "{}" has a contrary "{}""#,
                literal, contrary
            ));
        }
    }
    violations.len() == n_violations
}

fn check_reasonable_preferences(theory: &ArgumentationTheory, violations: &mut Vec<String>) -> bool {
    let n_violations = violations.len();
    for pref in theory.knowledge_base().rule_preferences() {
        if theory
            .get_rule(pref.dispreferred())
            .map(|r| r.is_strict())
            .unwrap_or(false)
        {
            violations.push(format!(
                r#"strict rule "{}" is dispreferred to "{}""#,
                pref.dispreferred(),
                pref.preferred()
            ));
        }
    }
    violations.len() == n_violations
}

/// Checks the strict rules are closed under transposition, with respect to the contrariness relation.
///
/// For each strict rule `a_1, ..., a_n -> c` and each antecedent `a_i` such that `a_i` and `c` have contraries,
/// a strict rule concluding the first contrary of `a_i` from the other antecedents and the first contrary of `c` must exist.
pub fn check_transposition_closure(theory: &ArgumentationTheory) -> Vec<String> {
    let contraries = theory.contraries();
    let mut violations = vec![];
    for rule in theory.strict_rules() {
        let consequent_contrary = match contraries.first_contrary_of(rule.consequent()) {
            Some(c) => c,
            None => continue,
        };
        for (i, antecedent) in rule.antecedents().iter().enumerate() {
            let antecedent_contrary = match contraries.first_contrary_of(antecedent) {
                Some(c) => c,
                None => continue,
            };
            let mut expected = rule
                .antecedents()
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, a)| a.as_str())
                .collect::<BTreeSet<&str>>();
            expected.insert(consequent_contrary.as_str());
            let exists = theory.strict_rules().any(|r| {
                r.consequent() == antecedent_contrary.as_str()
                    && r.antecedents().iter().map(|a| a.as_str()).collect::<BTreeSet<&str>>() == expected
            });
            if !exists {
                violations.push(format!(
                    "missing transposition of rule {}: [{}] -> {}",
                    rule.id(),
                    expected.into_iter().collect::<Vec<&str>>().join(", "),
                    antecedent_contrary
                ));
            }
        }
    }
    violations
}

/// Checks the unary strict rules are closed under contraposition, with respect to the contrariness relation.
pub fn check_contraposition_closure(theory: &ArgumentationTheory) -> Vec<String> {
    let contraries = theory.contraries();
    let mut violations = vec![];
    for rule in theory.strict_rules().filter(|r| r.antecedents().len() == 1) {
        let (phi_bar, psi_bar) = match (
            contraries.first_contrary_of(&rule.antecedents()[0]),
            contraries.first_contrary_of(rule.consequent()),
        ) {
            (Some(p), Some(q)) => (p, q),
            _ => continue,
        };
        let exists = theory.strict_rules().any(|r| {
            r.antecedents().len() == 1 && &r.antecedents()[0] == psi_bar && r.consequent() == phi_bar.as_str()
        });
        if !exists {
            violations.push(format!(
                "missing contrapositive of rule {}: {} -> {}",
                rule.id(),
                psi_bar,
                phi_bar
            ));
        }
    }
    violations
}

/// Checks the well-formedness of a theory.
///
/// The checks are advisory: they never prevent an evaluation.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::ArgumentationTheory;
/// # use crustaspic::rationality::{check_well_formedness, ClosureProperty};
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.knowledge_base_mut().add_axiom("q");
/// theory.contraries_mut().add_contradictory("p", "q");
/// let report = check_well_formedness(&theory);
/// assert!(!report.axiom_consistency);
/// assert_eq!(ClosureProperty::Transposition, report.closure_property);
/// assert!(!report.well_formed);
/// ```
pub fn check_well_formedness(theory: &ArgumentationTheory) -> WellFormednessReport {
    let mut violations = vec![];
    let axiom_consistency = check_axiom_consistency(theory, &mut violations);
    let contrary_well_formed = check_contrary_well_formedness(theory, &mut violations);
    let reasonable_preferences = check_reasonable_preferences(theory, &mut violations);
    let transposition = check_transposition_closure(theory);
    let contraposition = check_contraposition_closure(theory);
    let closure_property = if transposition.is_empty() {
        ClosureProperty::Transposition
    } else if contraposition.is_empty() {
        ClosureProperty::Contraposition
    } else {
        violations.extend(transposition);
        violations.extend(contraposition);
        ClosureProperty::None
    };
    WellFormednessReport {
        axiom_consistency,
        contrary_well_formed,
        reasonable_preferences,
        closure_property,
        well_formed: axiom_consistency
            && contrary_well_formed
            && reasonable_preferences
            && closure_property != ClosureProperty::None,
        violations,
    }
}
