use super::{
    knowledge_base::KnowledgeBase,
    language::{Contrariness, Literal, Rule},
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// An argumentation theory: a set of rules, a contrariness relation and a knowledge base.
///
/// Theories are built once per evaluation and are not shared between evaluations.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{ArgumentationTheory, Rule};
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.add_rule(Rule::defeasible("r1", &["p"], "q")).unwrap();
/// assert!(theory.add_rule(Rule::strict("r1", &["q"], "s")).is_err());
/// assert_eq!(1, theory.rules().len());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentationTheory {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    contraries: Contrariness,
    #[serde(default)]
    knowledge_base: KnowledgeBase,
}

impl ArgumentationTheory {
    /// Builds a theory from its components.
    ///
    /// The rule identifiers must be unique.
    pub fn new(
        rules: Vec<Rule>,
        contraries: Contrariness,
        knowledge_base: KnowledgeBase,
    ) -> Result<Self> {
        let mut theory = ArgumentationTheory {
            rules: Vec::with_capacity(rules.len()),
            contraries,
            knowledge_base,
        };
        for r in rules {
            theory.add_rule(r)?;
        }
        Ok(theory)
    }

    /// Adds a rule.
    ///
    /// An error is returned if a rule with the same identifier is already present.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        if self.get_rule(rule.id()).is_some() {
            return Err(anyhow!(r#"a rule with identifier "{}" already exists"#, rule.id()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Returns the rules, strict and defeasible, in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterates over the strict rules.
    pub fn strict_rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(|r| r.is_strict())
    }

    /// Iterates over the defeasible rules.
    pub fn defeasible_rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(|r| r.is_defeasible())
    }

    /// Returns the rule with the given identifier.
    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Replaces the strict rules by the provided ones, keeping the defeasible rules.
    pub fn replace_strict_rules(&mut self, strict_rules: Vec<Rule>) -> Result<()> {
        let defeasible = self
            .rules
            .drain(..)
            .filter(|r| r.is_defeasible())
            .collect::<Vec<Rule>>();
        for r in strict_rules.into_iter().chain(defeasible) {
            self.add_rule(r)?;
        }
        Ok(())
    }

    /// Returns the contrariness relation.
    pub fn contraries(&self) -> &Contrariness {
        &self.contraries
    }

    /// Returns the contrariness relation, allowing to modify it.
    pub fn contraries_mut(&mut self) -> &mut Contrariness {
        &mut self.contraries
    }

    /// Returns the knowledge base.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Returns the knowledge base, allowing to modify it.
    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge_base
    }

    /// Returns the set of literals occurring in the knowledge base, the rules and the contrariness relation.
    ///
    /// Rule names are included when they differ from the rule identifiers.
    pub fn language(&self) -> BTreeSet<Literal> {
        let mut language = self
            .knowledge_base
            .iter_elements()
            .map(|(l, _)| l.clone())
            .collect::<BTreeSet<Literal>>();
        for r in self.rules.iter() {
            language.extend(r.antecedents().iter().cloned());
            language.insert(r.consequent().to_string());
        }
        for (l, c) in self.contraries.iter() {
            language.insert(l.clone());
            language.insert(c.clone());
        }
        language
    }

    /// Checks the theory is structurally valid.
    ///
    /// This function checks that:
    /// * the rule identifiers are unique and not empty,
    /// * no rule has an empty antecedent or consequent,
    /// * the knowledge base partitions are disjoint,
    /// * no contrariness pair involves an empty literal.
    ///
    /// Semantic issues (inconsistent axioms, unreasonable preferences, ...) are not errors;
    /// they are reported by the [rationality](crate::rationality) checks.
    pub fn check(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.rules.len());
        for r in self.rules.iter() {
            let context = || format!(r#"while checking rule "{}""#, r.id());
            if r.id().trim().is_empty() {
                return Err(anyhow!("a rule has an empty identifier"));
            }
            if !ids.insert(r.id()) {
                return Err(anyhow!("duplicate rule identifier")).with_context(context);
            }
            if r.consequent().trim().is_empty() {
                return Err(anyhow!("empty consequent")).with_context(context);
            }
            if r.antecedents().iter().any(|a| a.trim().is_empty()) {
                return Err(anyhow!("empty antecedent")).with_context(context);
            }
            if r.name().trim().is_empty() {
                return Err(anyhow!("empty rule name")).with_context(context);
            }
        }
        self.knowledge_base
            .check()
            .context("while checking the knowledge base")?;
        if self
            .contraries
            .iter()
            .any(|(l, c)| l.trim().is_empty() || c.trim().is_empty())
        {
            return Err(anyhow!("the contrariness relation involves an empty literal"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theory() -> ArgumentationTheory {
        let mut t = ArgumentationTheory::default();
        t.knowledge_base_mut().add_premise("p");
        t.add_rule(Rule::strict("s1", &["p"], "q")).unwrap();
        t.add_rule(Rule::defeasible("d1", &["q"], "r")).unwrap();
        t.contraries_mut().add_contrary("r", "x");
        t
    }

    #[test]
    fn test_rule_kinds() {
        let t = theory();
        assert_eq!(1, t.strict_rules().count());
        assert_eq!(1, t.defeasible_rules().count());
        assert!(t.get_rule("d1").is_some());
        assert!(t.get_rule("d2").is_none());
    }

    #[test]
    fn test_language() {
        let t = theory();
        let language = t.language().into_iter().collect::<Vec<_>>();
        assert_eq!(vec!["p", "q", "r", "x"], language);
    }

    #[test]
    fn test_check_ok() {
        theory().check().unwrap();
    }

    #[test]
    fn test_check_empty_antecedent() {
        let mut t = theory();
        t.add_rule(Rule::strict("s2", &[""], "q")).unwrap();
        let err = t.check().unwrap_err();
        assert_eq!(r#"while checking rule "s2""#, err.to_string());
    }

    #[test]
    fn test_check_duplicate_from_json() {
        let t: ArgumentationTheory = serde_json::from_str(
            r#"{"rules":[
                {"id":"r","antecedents":[],"consequent":"a","kind":"strict"},
                {"id":"r","antecedents":[],"consequent":"b","kind":"strict"}
            ]}"#,
        )
        .unwrap();
        assert!(t.check().is_err());
    }

    #[test]
    fn test_replace_strict_rules() {
        let mut t = theory();
        t.replace_strict_rules(vec![
            Rule::strict("s1", &["p"], "q"),
            Rule::strict("s2", &["¬q"], "¬p"),
        ])
        .unwrap();
        assert_eq!(2, t.strict_rules().count());
        assert_eq!(1, t.defeasible_rules().count());
    }
}
