use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum_macros::{AsRefStr, Display, EnumString};

/// The type of literals.
///
/// Literals are opaque identifiers: the engine never looks inside them,
/// except for [`negate`] which builds the classical negation used by transpositions.
pub type Literal = String;

/// The negation symbol used when literals are negated.
pub const NEGATION_SYMBOL: char = '¬';

const COMPOUND_MARKERS: [char; 9] = [' ', '→', '∧', '∨', '↔', '⇒', '&', '|', '>'];

/// Builds the classical negation of a literal.
///
/// Atomic literals are prefixed by [`NEGATION_SYMBOL`].
/// Compound formulas (containing spaces or connectives) are surrounded by parentheses before the negation symbol is added,
/// unless they are already parenthesized.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::negate;
/// assert_eq!("¬p", negate("p"));
/// assert_eq!("¬(p→q)", negate("p→q"));
/// assert_eq!("¬(p ∧ q)", negate("(p ∧ q)"));
/// ```
pub fn negate(literal: &str) -> Literal {
    let trimmed = literal.trim();
    let already_wrapped = trimmed.starts_with('(') && trimmed.ends_with(')');
    let is_negation = trimmed.starts_with(NEGATION_SYMBOL);
    if already_wrapped || is_negation || !trimmed.contains(&COMPOUND_MARKERS[..]) {
        format!("{}{}", NEGATION_SYMBOL, trimmed)
    } else {
        format!("{}({})", NEGATION_SYMBOL, trimmed)
    }
}

/// The kind of a rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleKind {
    /// A strict rule: its consequent cannot be rebutted.
    Strict,
    /// A defeasible rule: its consequent may be rebutted and its application undercut.
    Defeasible,
}

/// An inference rule.
///
/// Rules are immutable once built.
/// Each rule is named by a literal (its explicit name if any, else its identifier),
/// which is the literal undercutting attacks address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    id: String,
    #[serde(default)]
    antecedents: Vec<Literal>,
    consequent: Literal,
    #[serde(alias = "type")]
    kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_rule_id: Option<String>,
}

impl Rule {
    /// Builds a new rule.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustaspic::aspic::{Rule, RuleKind};
    /// let r = Rule::new("r1", &["p", "q"], "s", RuleKind::Defeasible);
    /// assert_eq!("r1", r.id());
    /// assert_eq!(2, r.antecedents().len());
    /// assert_eq!("r1", r.name());
    /// ```
    pub fn new<S: AsRef<str>>(id: &str, antecedents: &[S], consequent: &str, kind: RuleKind) -> Self {
        Rule {
            id: id.to_string(),
            antecedents: antecedents.iter().map(|a| a.as_ref().to_string()).collect(),
            consequent: consequent.to_string(),
            kind,
            name: None,
            scheme: None,
            source_rule_id: None,
        }
    }

    /// Builds a new strict rule.
    pub fn strict<S: AsRef<str>>(id: &str, antecedents: &[S], consequent: &str) -> Self {
        Self::new(id, antecedents, consequent, RuleKind::Strict)
    }

    /// Builds a new defeasible rule.
    pub fn defeasible<S: AsRef<str>>(id: &str, antecedents: &[S], consequent: &str) -> Self {
        Self::new(id, antecedents, consequent, RuleKind::Defeasible)
    }

    /// Sets the literal naming this rule.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets the scheme this rule instantiates.
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = Some(scheme.to_string());
        self
    }

    /// Sets the identifier of the rule this one was generated from.
    pub fn with_source_rule(mut self, source_rule_id: &str) -> Self {
        self.source_rule_id = Some(source_rule_id.to_string());
        self
    }

    /// Returns the rule identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ordered antecedents.
    pub fn antecedents(&self) -> &[Literal] {
        &self.antecedents
    }

    /// Returns the consequent.
    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    /// Returns the kind of the rule.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns `true` iff the rule is strict.
    pub fn is_strict(&self) -> bool {
        self.kind == RuleKind::Strict
    }

    /// Returns `true` iff the rule is defeasible.
    pub fn is_defeasible(&self) -> bool {
        self.kind == RuleKind::Defeasible
    }

    /// Returns the literal naming the rule.
    ///
    /// This is the explicit name if one was given, or the rule identifier.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Returns the scheme this rule instantiates, if any.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the identifier of the rule this one was generated from, if any.
    pub fn source_rule_id(&self) -> Option<&str> {
        self.source_rule_id.as_deref()
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = match self.kind {
            RuleKind::Strict => "->",
            RuleKind::Defeasible => "=>",
        };
        write!(f, "{}: {} {} {}", self.id, self.antecedents.join(", "), arrow, self.consequent)
    }
}

/// The contrariness relation.
///
/// It maps a literal to the set of literals that are its contraries.
/// The relation is not symmetric by default: `b` being a contrary of `a` does not make `a` a contrary of `b`.
/// Symmetric pairs (contradictories) are added by [`add_contradictory`](Self::add_contradictory).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contrariness(BTreeMap<Literal, BTreeSet<Literal>>);

impl Contrariness {
    /// Declares `contrary` as a contrary of `literal`.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustaspic::aspic::Contrariness;
    /// let mut contraries = Contrariness::default();
    /// contraries.add_contrary("p", "q");
    /// assert!(contraries.is_contrary_of("q", "p"));
    /// assert!(!contraries.is_contrary_of("p", "q"));
    /// ```
    pub fn add_contrary(&mut self, literal: &str, contrary: &str) {
        self.0
            .entry(literal.to_string())
            .or_default()
            .insert(contrary.to_string());
    }

    /// Declares two literals as contradictory (each one is a contrary of the other).
    pub fn add_contradictory(&mut self, a: &str, b: &str) {
        self.add_contrary(a, b);
        self.add_contrary(b, a);
    }

    /// Adds the classical negation of each literal as a contradictory of it.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustaspic::aspic::Contrariness;
    /// let mut contraries = Contrariness::default();
    /// contraries.add_classical_negation(["p", "q"]);
    /// assert!(contraries.is_contrary_of("¬p", "p"));
    /// assert!(contraries.is_contrary_of("q", "¬q"));
    /// ```
    pub fn add_classical_negation<'a, I>(&mut self, language: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for literal in language {
            self.add_contradictory(literal, &negate(literal));
        }
    }

    /// Returns `true` iff `candidate` is declared as a contrary of `literal`.
    pub fn is_contrary_of(&self, candidate: &str, literal: &str) -> bool {
        self.0
            .get(literal)
            .map(|c| c.contains(candidate))
            .unwrap_or(false)
    }

    /// Returns `true` iff one of the literals is a contrary of the other.
    pub fn conflict(&self, a: &str, b: &str) -> bool {
        self.is_contrary_of(a, b) || self.is_contrary_of(b, a)
    }

    /// Iterates over the contraries of a literal.
    pub fn contraries_of<'a>(&'a self, literal: &str) -> impl Iterator<Item = &'a Literal> + 'a {
        self.0.get(literal).into_iter().flat_map(|c| c.iter())
    }

    /// Returns the first contrary of a literal (in lexicographic order), if any.
    pub fn first_contrary_of(&self, literal: &str) -> Option<&Literal> {
        self.0.get(literal).and_then(|c| c.iter().next())
    }

    /// Iterates over the `(literal, contrary)` pairs of the relation.
    pub fn iter(&self) -> impl Iterator<Item = (&Literal, &Literal)> + '_ {
        self.0
            .iter()
            .flat_map(|(l, cs)| cs.iter().map(move |c| (l, c)))
    }

    /// Returns the number of `(literal, contrary)` pairs.
    pub fn len(&self) -> usize {
        self.0.values().map(|c| c.len()).sum()
    }

    /// Returns `true` iff no contrary is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` iff the premise set contains a literal together with one of its contraries.
    pub fn is_inconsistent<'a, I>(&self, literals: I) -> bool
    where
        I: IntoIterator<Item = &'a Literal> + Clone,
    {
        let set = literals.clone().into_iter().collect::<BTreeSet<&Literal>>();
        literals
            .into_iter()
            .any(|l| self.contraries_of(l).any(|c| set.contains(&c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_atomic() {
        assert_eq!("¬socrates_mortal", negate("socrates_mortal"));
    }

    #[test]
    fn test_negate_compound() {
        assert_eq!("¬(r → s)", negate("r → s"));
        assert_eq!("¬(t ∨ u)", negate("(t ∨ u)"));
    }

    #[test]
    fn test_negate_negation() {
        assert_eq!("¬¬p", negate("¬p"));
    }

    #[test]
    fn test_rule_name_defaults_to_id() {
        let r = Rule::defeasible("r1", &["p"], "q");
        assert_eq!("r1", r.name());
        let r = r.with_name("n_r1");
        assert_eq!("n_r1", r.name());
    }

    #[test]
    fn test_rule_display() {
        assert_eq!("r: p, q -> s", Rule::strict("r", &["p", "q"], "s").to_string());
        assert_eq!("d: p => s", Rule::defeasible("d", &["p"], "s").to_string());
    }

    #[test]
    fn test_rule_deserialize_type_alias() {
        let r: Rule = serde_json::from_str(
            r#"{"id":"r1","antecedents":["p"],"consequent":"q","type":"strict"}"#,
        )
        .unwrap();
        assert!(r.is_strict());
    }

    #[test]
    fn test_contrariness_asymmetric() {
        let mut c = Contrariness::default();
        c.add_contrary("p", "q");
        assert!(c.is_contrary_of("q", "p"));
        assert!(!c.is_contrary_of("p", "q"));
        assert!(c.conflict("p", "q"));
        assert!(c.conflict("q", "p"));
        assert_eq!(1, c.len());
    }

    #[test]
    fn test_contradictory() {
        let mut c = Contrariness::default();
        c.add_contradictory("p", "¬p");
        assert!(c.is_contrary_of("p", "¬p"));
        assert!(c.is_contrary_of("¬p", "p"));
        assert_eq!(2, c.len());
    }

    #[test]
    fn test_inconsistent_set() {
        let mut c = Contrariness::default();
        c.add_contrary("p", "q");
        let set = vec!["p".to_string(), "q".to_string()];
        assert!(c.is_inconsistent(set.iter()));
        let set = vec!["p".to_string(), "r".to_string()];
        assert!(!c.is_inconsistent(set.iter()));
    }
}
