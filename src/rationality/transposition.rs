use crate::aspic::{negate, Rule};
use anyhow::{anyhow, Result};
use std::collections::{BTreeSet, HashSet};

const TRANSPOSE_MARKER: &str = "_transpose_";

/// A rule obtained by transposing a strict rule on one of its antecedents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransposedRule {
    rule: Rule,
    transposed_index: usize,
    explanation: String,
}

impl TransposedRule {
    /// Returns the transposed rule; its source rule identifier is set.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Consumes this object and returns the transposed rule.
    pub fn into_rule(self) -> Rule {
        self.rule
    }

    /// Returns the index of the antecedent the transposition is made on.
    pub fn transposed_index(&self) -> usize {
        self.transposed_index
    }

    /// Returns a human readable explanation of the transposition.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Generates the transpositions of a strict rule.
///
/// For a rule `a_1, ..., a_n -> c`, the i-th transposition replaces `a_i` by `¬c` and concludes `¬a_i`.
/// Its identifier is the rule identifier followed by `_transpose_i`.
///
/// An error is returned for defeasible rules.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::Rule;
/// # use crustaspic::rationality::generate_transpositions;
/// let rule = Rule::strict("mp", &["p", "p→q"], "q");
/// let transposed = generate_transpositions(&rule).unwrap();
/// assert_eq!(2, transposed.len());
/// assert_eq!("mp_transpose_1", transposed[1].rule().id());
/// assert_eq!(&["p", "¬q"], transposed[1].rule().antecedents());
/// assert_eq!("¬(p→q)", transposed[1].rule().consequent());
/// ```
pub fn generate_transpositions(rule: &Rule) -> Result<Vec<TransposedRule>> {
    if !rule.is_strict() {
        return Err(anyhow!(r#"cannot transpose non-strict rule "{}""#, rule.id()));
    }
    let negated_consequent = negate(rule.consequent());
    Ok(rule
        .antecedents()
        .iter()
        .enumerate()
        .map(|(i, antecedent)| {
            let mut antecedents = rule.antecedents().to_vec();
            antecedents[i] = negated_consequent.clone();
            let transposed = Rule::strict(
                &format!("{}{}{}", rule.id(), TRANSPOSE_MARKER, i),
                &antecedents,
                &negate(antecedent),
            )
            .with_source_rule(rule.id());
            TransposedRule {
                rule: transposed,
                transposed_index: i,
                explanation: format!(
                    "Contrapositive of {}: from ¬({}) and the other antecedents, infer ¬({})",
                    rule.id(),
                    rule.consequent(),
                    antecedent
                ),
            }
        })
        .collect())
}

/// The result of a transposition closure check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranspositionValidation {
    /// Whether all the required transpositions are present.
    pub is_closed: bool,
    /// The transpositions that are not present.
    pub missing_rules: Vec<TransposedRule>,
    /// The number of transpositions required by the strict rules.
    pub total_required: usize,
    /// The number of required transpositions that are present.
    pub total_present: usize,
    /// A human readable message.
    pub message: String,
}

fn is_generated(rule: &Rule) -> bool {
    rule.id().contains(TRANSPOSE_MARKER)
}

fn rule_shape(rule: &Rule) -> (BTreeSet<&str>, &str) {
    (
        rule.antecedents().iter().map(|a| a.as_str()).collect(),
        rule.consequent(),
    )
}

/// Checks whether a set of rules is closed under transposition.
///
/// Only the strict rules that are not themselves transpositions (their identifier does not contain `_transpose_`) are considered.
/// A transposition is present if a strict rule has the same set of antecedents and the same consequent.
pub fn validate_transposition_closure(rules: &[Rule]) -> TranspositionValidation {
    let present_shapes = rules
        .iter()
        .filter(|r| r.is_strict())
        .map(rule_shape)
        .collect::<HashSet<_>>();
    let mut missing_rules = vec![];
    let mut total_required = 0;
    let mut total_present = 0;
    for rule in rules.iter().filter(|r| r.is_strict() && !is_generated(r)) {
        // strict rules never fail to transpose
        for t in generate_transpositions(rule).unwrap_or_default() {
            total_required += 1;
            if present_shapes.contains(&rule_shape(t.rule())) {
                total_present += 1;
            } else {
                missing_rules.push(t);
            }
        }
    }
    let message = match missing_rules.len() {
        0 => "strict rules are closed under transposition".to_string(),
        1 => "1 transposed rule missing".to_string(),
        n => format!("{} transposed rules missing", n),
    };
    TranspositionValidation {
        is_closed: missing_rules.is_empty(),
        missing_rules,
        total_required,
        total_present,
        message,
    }
}

/// Adds the missing transpositions to a set of rules.
///
/// Applying this function to its own output adds nothing.
pub fn apply_transposition_closure(rules: &[Rule]) -> Vec<Rule> {
    let validation = validate_transposition_closure(rules);
    let mut ids = rules.iter().map(|r| r.id().to_string()).collect::<HashSet<String>>();
    let mut closed = rules.to_vec();
    for t in validation.missing_rules.into_iter() {
        if ids.insert(t.rule().id().to_string()) {
            closed.push(t.into_rule());
        }
    }
    closed
}

/// Returns a one-line summary of a transposition validation.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::Rule;
/// # use crustaspic::rationality::{transposition_summary, validate_transposition_closure};
/// let rules = vec![Rule::strict("r1", &["a"], "b"), Rule::strict("r2", &["c", "d"], "e")];
/// let validation = validate_transposition_closure(&rules);
/// assert_eq!("0% of the transpositions are present (0/3), 3 missing", transposition_summary(&validation));
/// ```
pub fn transposition_summary(validation: &TranspositionValidation) -> String {
    if validation.is_closed {
        return format!(
            "strict rules are closed under transposition ({}/{})",
            validation.total_present, validation.total_required
        );
    }
    let percent = if validation.total_required == 0 {
        0
    } else {
        (100. * validation.total_present as f64 / validation.total_required as f64).round() as usize
    };
    format!(
        "{}% of the transpositions are present ({}/{}), {} missing",
        percent,
        validation.total_present,
        validation.total_required,
        validation.missing_rules.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_antecedent_missing() {
        let validation = validate_transposition_closure(&[Rule::strict("rule1", &["p"], "q")]);
        assert!(!validation.is_closed);
        assert_eq!(1, validation.total_required);
        assert_eq!(0, validation.total_present);
        let missing = &validation.missing_rules[0];
        assert_eq!(&["¬q"], missing.rule().antecedents());
        assert_eq!("¬p", missing.rule().consequent());
        assert_eq!(Some("rule1"), missing.rule().source_rule_id());
        assert_eq!(0, missing.transposed_index());
        assert!(validation.message.contains("1 transposed rule missing"));
    }

    #[test]
    fn test_modus_ponens() {
        let validation =
            validate_transposition_closure(&[Rule::strict("modus_ponens", &["p", "p→q"], "q")]);
        assert_eq!(2, validation.missing_rules.len());
        let t0 = validation.missing_rules[0].rule();
        assert_eq!("modus_ponens_transpose_0", t0.id());
        assert_eq!(&["¬q", "p→q"], t0.antecedents());
        assert_eq!("¬p", t0.consequent());
        assert!(t0.is_strict());
        let t1 = validation.missing_rules[1].rule();
        assert_eq!("modus_ponens_transpose_1", t1.id());
        assert_eq!(&["p", "¬q"], t1.antecedents());
        assert_eq!("¬(p→q)", t1.consequent());
    }

    #[test]
    fn test_closed() {
        let rules = vec![
            Rule::strict("rule1", &["p"], "q"),
            Rule::strict("rule1_transpose_0", &["¬q"], "¬p"),
        ];
        let validation = validate_transposition_closure(&rules);
        assert!(validation.is_closed);
        assert_eq!(1, validation.total_required);
        assert_eq!(1, validation.total_present);
    }

    #[test]
    fn test_multiple_rules() {
        let rules = vec![Rule::strict("r1", &["a"], "b"), Rule::strict("r2", &["c", "d"], "e")];
        let validation = validate_transposition_closure(&rules);
        assert_eq!(3, validation.total_required);
        assert_eq!(3, validation.missing_rules.len());
    }

    #[test]
    fn test_empty() {
        let validation = validate_transposition_closure(&[]);
        assert!(validation.is_closed);
        assert_eq!(0, validation.total_required);
        assert!(apply_transposition_closure(&[]).is_empty());
    }

    #[test]
    fn test_defeasible_rules_are_ignored() {
        let validation = validate_transposition_closure(&[Rule::defeasible("d", &["p"], "q")]);
        assert!(validation.is_closed);
        assert!(generate_transpositions(&Rule::defeasible("d", &["p"], "q"))
            .unwrap_err()
            .to_string()
            .contains("cannot transpose non-strict rule"));
    }

    #[test]
    fn test_explanation() {
        let validation = validate_transposition_closure(&[Rule::strict(
            "syllogism",
            &["all_humans_mortal", "socrates_human"],
            "socrates_mortal",
        )]);
        let e0 = validation.missing_rules[0].explanation();
        assert!(e0.contains("Contrapositive"));
        assert!(e0.contains("all_humans_mortal"));
        assert!(e0.contains("¬(socrates_mortal)"));
        assert!(validation.missing_rules[1].explanation().contains("socrates_human"));
    }

    #[test]
    fn test_complex_formulas() {
        let transposed =
            generate_transpositions(&Rule::strict("complex", &["(p ∧ q)", "r → s"], "(t ∨ u)")).unwrap();
        assert!(transposed[0].rule().antecedents().contains(&"¬(t ∨ u)".to_string()));
        assert_eq!("¬(p ∧ q)", transposed[0].rule().consequent());
        assert_eq!("¬(r → s)", transposed[1].rule().consequent());
    }

    #[test]
    fn test_many_antecedents() {
        let transposed =
            generate_transpositions(&Rule::strict("many", &["a", "b", "c", "d", "e"], "z")).unwrap();
        assert_eq!(5, transposed.len());
        for t in transposed.iter() {
            assert_eq!(5, t.rule().antecedents().len());
            assert!(t.rule().antecedents().contains(&"¬z".to_string()));
        }
    }

    #[test]
    fn test_apply_closure() {
        let rules = vec![Rule::strict("r1", &["a"], "b"), Rule::strict("r2", &["c", "d"], "e")];
        let closed = apply_transposition_closure(&rules);
        assert_eq!(5, closed.len());
        assert!(validate_transposition_closure(&closed).is_closed);
        let closed_again = apply_transposition_closure(&closed);
        assert_eq!(closed, closed_again);
    }

    #[test]
    fn test_apply_closure_keeps_existing() {
        let rules = vec![
            Rule::strict("rule1", &["p"], "q"),
            Rule::strict("rule1_transpose_0", &["¬q"], "¬p"),
        ];
        assert_eq!(2, apply_transposition_closure(&rules).len());
    }

    #[test]
    fn test_summary() {
        let mut validation = validate_transposition_closure(&[
            Rule::strict("r1", &["a"], "b"),
            Rule::strict("r2", &["c", "d"], "e"),
            Rule::strict("r1_transpose_0", &["¬b"], "¬a"),
        ]);
        validation.total_required = 5;
        validation.total_present = 3;
        let summary = transposition_summary(&validation);
        assert!(summary.contains("60%"));
        assert!(summary.contains("3/5"));
        assert!(summary.contains("2 missing"));
        let closed = validate_transposition_closure(&[]);
        assert!(transposition_summary(&closed).contains("closed under transposition"));
    }
}
