use super::language::Literal;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{AsRefStr, Display, EnumString};

/// The partition a knowledge base element belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PremiseKind {
    /// Indefeasible elements.
    Axiom,
    /// Ordinary premises, attackable by undermining and subject to preferences.
    Premise,
    /// Assumptions, attackable by undermining regardless of preferences.
    Assumption,
}

impl PremiseKind {
    /// Returns `true` for ordinary premises and assumptions.
    pub fn is_ordinary(&self) -> bool {
        !matches!(self, PremiseKind::Axiom)
    }
}

/// A directed preference pair: `preferred` is strictly preferred to `dispreferred`.
///
/// Pairs are built over literals (premise preferences) or rule identifiers (rule preferences).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Preference {
    preferred: String,
    dispreferred: String,
}

impl Preference {
    /// Builds a new preference pair.
    pub fn new(preferred: &str, dispreferred: &str) -> Self {
        Preference {
            preferred: preferred.to_string(),
            dispreferred: dispreferred.to_string(),
        }
    }

    /// Returns the preferred element.
    pub fn preferred(&self) -> &str {
        &self.preferred
    }

    /// Returns the dispreferred element.
    pub fn dispreferred(&self) -> &str {
        &self.dispreferred
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} > {}", self.preferred, self.dispreferred)
    }
}

/// A knowledge base, partitioned into axioms, ordinary premises and assumptions,
/// together with the preferences over premises and over rules.
///
/// No ordering is assumed between two elements unless a preference pair relates them.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{KnowledgeBase, PremiseKind};
/// let mut kb = KnowledgeBase::default();
/// kb.add_axiom("p");
/// kb.add_premise("q");
/// kb.add_premise_preference("q", "r");
/// assert_eq!(Some(PremiseKind::Axiom), kb.kind_of("p"));
/// assert_eq!(Some(PremiseKind::Premise), kb.kind_of("q"));
/// assert_eq!(None, kb.kind_of("r"));
/// assert_eq!(1, kb.premise_preferences().len());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    #[serde(default)]
    axioms: BTreeSet<Literal>,
    #[serde(default)]
    premises: BTreeSet<Literal>,
    #[serde(default)]
    assumptions: BTreeSet<Literal>,
    #[serde(default)]
    premise_preferences: Vec<Preference>,
    #[serde(default)]
    rule_preferences: Vec<Preference>,
}

impl KnowledgeBase {
    /// Adds an axiom.
    pub fn add_axiom(&mut self, literal: &str) {
        self.axioms.insert(literal.to_string());
    }

    /// Adds an ordinary premise.
    pub fn add_premise(&mut self, literal: &str) {
        self.premises.insert(literal.to_string());
    }

    /// Adds an assumption.
    pub fn add_assumption(&mut self, literal: &str) {
        self.assumptions.insert(literal.to_string());
    }

    /// Returns the axioms.
    pub fn axioms(&self) -> &BTreeSet<Literal> {
        &self.axioms
    }

    /// Returns the ordinary premises.
    pub fn premises(&self) -> &BTreeSet<Literal> {
        &self.premises
    }

    /// Returns the assumptions.
    pub fn assumptions(&self) -> &BTreeSet<Literal> {
        &self.assumptions
    }

    /// Iterates over all the elements together with their kind.
    ///
    /// Axioms come first, then ordinary premises, then assumptions.
    pub fn iter_elements(&self) -> impl Iterator<Item = (&Literal, PremiseKind)> + '_ {
        self.axioms
            .iter()
            .map(|l| (l, PremiseKind::Axiom))
            .chain(self.premises.iter().map(|l| (l, PremiseKind::Premise)))
            .chain(self.assumptions.iter().map(|l| (l, PremiseKind::Assumption)))
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.axioms.len() + self.premises.len() + self.assumptions.len()
    }

    /// Returns `true` iff the knowledge base has no element.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the kind of a literal, or `None` if it does not belong to the knowledge base.
    ///
    /// If a literal belongs to several partitions (which [`check`](Self::check) reports as an error),
    /// the axioms take precedence over the premises, which take precedence over the assumptions.
    pub fn kind_of(&self, literal: &str) -> Option<PremiseKind> {
        if self.axioms.contains(literal) {
            Some(PremiseKind::Axiom)
        } else if self.premises.contains(literal) {
            Some(PremiseKind::Premise)
        } else if self.assumptions.contains(literal) {
            Some(PremiseKind::Assumption)
        } else {
            None
        }
    }

    /// Returns `true` iff the literal is an ordinary premise or an assumption.
    pub fn is_ordinary(&self, literal: &str) -> bool {
        self.kind_of(literal)
            .map(|k| k.is_ordinary())
            .unwrap_or(false)
    }

    /// Adds a preference between two premises; nothing happens if it is already present.
    pub fn add_premise_preference(&mut self, preferred: &str, dispreferred: &str) {
        let p = Preference::new(preferred, dispreferred);
        if !self.premise_preferences.contains(&p) {
            self.premise_preferences.push(p);
        }
    }

    /// Adds a preference between two rules; nothing happens if it is already present.
    pub fn add_rule_preference(&mut self, preferred: &str, dispreferred: &str) {
        let p = Preference::new(preferred, dispreferred);
        if !self.rule_preferences.contains(&p) {
            self.rule_preferences.push(p);
        }
    }

    /// Returns the premise preferences.
    pub fn premise_preferences(&self) -> &[Preference] {
        &self.premise_preferences
    }

    /// Returns the rule preferences.
    pub fn rule_preferences(&self) -> &[Preference] {
        &self.rule_preferences
    }

    /// Replaces the premise preferences.
    pub fn set_premise_preferences(&mut self, preferences: Vec<Preference>) {
        self.premise_preferences = preferences;
    }

    /// Replaces the rule preferences.
    pub fn set_rule_preferences(&mut self, preferences: Vec<Preference>) {
        self.rule_preferences = preferences;
    }

    /// Checks the partitions are disjoint and the literals are not empty.
    pub fn check(&self) -> Result<()> {
        if let Some(l) = self.iter_elements().map(|(l, _)| l).find(|l| l.trim().is_empty()) {
            return Err(anyhow!("empty literal {:?} in the knowledge base", l));
        }
        let overlap = |a: &BTreeSet<Literal>, b: &BTreeSet<Literal>| a.intersection(b).next().cloned();
        let clashes = [
            (overlap(&self.axioms, &self.premises), "an axiom", "a premise"),
            (overlap(&self.axioms, &self.assumptions), "an axiom", "an assumption"),
            (overlap(&self.premises, &self.assumptions), "a premise", "an assumption"),
        ];
        for (clash, k1, k2) in clashes {
            if let Some(l) = clash {
                return Err(anyhow!(r#""{}" is both {} and {}"#, l, k1, k2));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let mut kb = KnowledgeBase::default();
        kb.add_axiom("a");
        kb.add_premise("p");
        kb.add_assumption("h");
        assert_eq!(Some(PremiseKind::Axiom), kb.kind_of("a"));
        assert_eq!(Some(PremiseKind::Premise), kb.kind_of("p"));
        assert_eq!(Some(PremiseKind::Assumption), kb.kind_of("h"));
        assert!(!kb.is_ordinary("a"));
        assert!(kb.is_ordinary("p"));
        assert!(kb.is_ordinary("h"));
        assert_eq!(3, kb.len());
    }

    #[test]
    fn test_iter_elements_order() {
        let mut kb = KnowledgeBase::default();
        kb.add_assumption("h");
        kb.add_premise("p");
        kb.add_axiom("a");
        let kinds = kb.iter_elements().map(|(_, k)| k).collect::<Vec<_>>();
        assert_eq!(
            vec![PremiseKind::Axiom, PremiseKind::Premise, PremiseKind::Assumption],
            kinds
        );
    }

    #[test]
    fn test_preferences_dedup() {
        let mut kb = KnowledgeBase::default();
        kb.add_rule_preference("r1", "r2");
        kb.add_rule_preference("r1", "r2");
        assert_eq!(1, kb.rule_preferences().len());
        assert_eq!("r1", kb.rule_preferences()[0].preferred());
        assert_eq!("r2", kb.rule_preferences()[0].dispreferred());
    }

    #[test]
    fn test_check_overlap() {
        let mut kb = KnowledgeBase::default();
        kb.add_axiom("p");
        kb.add_premise("p");
        let err = kb.check().unwrap_err();
        assert_eq!(r#""p" is both an axiom and a premise"#, err.to_string());
    }

    #[test]
    fn test_check_empty_literal() {
        let mut kb = KnowledgeBase::default();
        kb.add_premise(" ");
        assert!(kb.check().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let kb: KnowledgeBase = serde_json::from_str(r#"{"premises":["p"]}"#).unwrap();
        assert_eq!(1, kb.premises().len());
        assert!(kb.axioms().is_empty());
    }
}
