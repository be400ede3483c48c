use super::well_formedness::{conflicting_pairs, strict_closure};
use crate::aspic::{ArgumentSet, ArgumentationTheory, Literal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The rationality postulates checked on a grounded extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostulateReport {
    /// Whether the sub-arguments of the arguments of the extension belong to the extension.
    pub sub_argument_closure: bool,
    /// Whether the conclusions of the extension are closed under the strict rules.
    pub strict_closure: bool,
    /// Whether no two conclusions of the extension conflict.
    pub direct_consistency: bool,
    /// Whether the strict closure of the conclusions of the extension is consistent.
    pub indirect_consistency: bool,
    /// A description of each violation.
    pub violations: Vec<String>,
}

impl PostulateReport {
    /// Returns `true` iff all the postulates hold.
    pub fn is_rational(&self) -> bool {
        self.sub_argument_closure && self.strict_closure && self.direct_consistency && self.indirect_consistency
    }
}

/// Checks the rationality postulates on an extension, given as a set of argument identifiers.
///
/// The checks are advisory: a violation is reported, never raised as an error.
pub fn check_postulates(
    theory: &ArgumentationTheory,
    arguments: &ArgumentSet,
    extension: &[usize],
) -> PostulateReport {
    let mut violations: Vec<String> = vec![];
    let in_ext = extension.iter().copied().collect::<BTreeSet<usize>>();

    let n_violations = violations.len();
    for id in extension.iter() {
        let arg = arguments.get_argument_by_id(*id);
        for sub in arg.all_sub_arguments().iter().filter(|s| !in_ext.contains(*s)) {
            violations.push(format!(
                "sub-argument closure: {} ({}) is in the extension but its sub-argument {} ({}) is not",
                arg.label(),
                arg.conclusion(),
                arguments.get_argument_by_id(*sub).label(),
                arguments.get_argument_by_id(*sub).conclusion(),
            ));
        }
    }
    let sub_argument_closure = violations.len() == n_violations;

    let conclusions = extension
        .iter()
        .map(|id| arguments.get_argument_by_id(*id).conclusion().to_string())
        .collect::<BTreeSet<Literal>>();
    let n_violations = violations.len();
    for rule in theory.strict_rules() {
        if rule.antecedents().iter().all(|a| conclusions.contains(a)) && !conclusions.contains(rule.consequent()) {
            violations.push(format!(
                r#"strict closure: the antecedents of rule {} are concluded but not its consequent "{}""#,
                rule.id(),
                rule.consequent()
            ));
        }
    }
    let strict_closure_holds = violations.len() == n_violations;

    let direct = conflicting_pairs(theory, &conclusions);
    for (a, b) in direct.iter() {
        violations.push(format!(
            r#"direct consistency: "{}" and "{}" are both concluded"#,
            a, b
        ));
    }

    let closure = strict_closure(theory, conclusions);
    let indirect = conflicting_pairs(theory, &closure);
    for (a, b) in indirect.iter().filter(|p| !direct.contains(p)) {
        violations.push(format!(
            r#"indirect consistency: "{}" and "{}" are both derivable"#,
            a, b
        ));
    }

    PostulateReport {
        sub_argument_closure,
        strict_closure: strict_closure_holds,
        direct_consistency: direct.is_empty(),
        indirect_consistency: indirect.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspic::{construct_arguments, ConstructionParams, Rule};

    fn all_arguments(theory: &ArgumentationTheory) -> (ArgumentSet, Vec<usize>) {
        let args = construct_arguments(theory, &ConstructionParams::default()).into_arguments();
        let ids = args.iter().map(|a| a.id()).collect();
        (args, ids)
    }

    #[test]
    fn test_rational_extension() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("a");
        theory.add_rule(Rule::strict("s1", &["a"], "b")).unwrap();
        let (args, ext) = all_arguments(&theory);
        let report = check_postulates(&theory, &args, &ext);
        assert!(report.is_rational());
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_sub_argument_closure_violated() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("a");
        theory.add_rule(Rule::defeasible("d1", &["a"], "b")).unwrap();
        let (args, _) = all_arguments(&theory);
        let b = args.with_conclusion("b")[0];
        let report = check_postulates(&theory, &args, &[b]);
        assert!(!report.sub_argument_closure);
        assert!(report.strict_closure);
    }

    #[test]
    fn test_strict_closure_violated() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("a");
        theory.add_rule(Rule::strict("s1", &["a"], "b")).unwrap();
        let (args, _) = all_arguments(&theory);
        let a = args.with_conclusion("a")[0];
        let report = check_postulates(&theory, &args, &[a]);
        assert!(!report.strict_closure);
        assert_eq!(1, report.violations.len());
    }

    #[test]
    fn test_consistency_violated() {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_premise("p");
        theory.knowledge_base_mut().add_premise("q");
        theory.add_rule(Rule::strict("s1", &["q"], "r")).unwrap();
        theory.contraries_mut().add_contradictory("p", "r");
        let (args, _) = all_arguments(&theory);
        let p = args.with_conclusion("p")[0];
        let q = args.with_conclusion("q")[0];
        let report = check_postulates(&theory, &args, &[p, q]);
        assert!(report.direct_consistency);
        assert!(!report.indirect_consistency);
        assert!(!report.strict_closure);
    }
}
