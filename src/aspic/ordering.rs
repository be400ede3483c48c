use super::{
    argument::Argument,
    knowledge_base::Preference,
    language::{Literal, Rule},
    theory::ArgumentationTheory,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The policies used to lift element preferences to argument preferences.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Compares the last defeasible rules of the arguments.
    #[default]
    LastLink,
    /// Compares all the defeasible rules and all the premises of the arguments.
    WeakestLink,
}

/// A strict partial order over elements (literals or rule identifiers), built from preference pairs.
///
/// An element is preferred to another one if a chain of pairs leads from the former to the latter.
/// Elements involved in a common cycle are considered incomparable.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{Preference, PreferenceRelation};
/// let relation = PreferenceRelation::new(&[Preference::new("a", "b"), Preference::new("b", "c")]);
/// assert!(relation.prefers("a", "c"));
/// assert!(!relation.prefers("c", "a"));
/// assert!(!relation.prefers("a", "d"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PreferenceRelation {
    pairs: HashSet<(Literal, Literal)>,
}

impl PreferenceRelation {
    /// Builds the relation from a list of preference pairs.
    pub fn new(preferences: &[Preference]) -> Self {
        let mut indices: HashMap<&str, usize> = HashMap::new();
        let mut successors: Vec<Vec<usize>> = vec![];
        for p in preferences.iter() {
            let i = intern(p.preferred(), &mut indices, &mut successors);
            let j = intern(p.dispreferred(), &mut indices, &mut successors);
            successors[i].push(j);
        }
        let mut names = vec![""; indices.len()];
        for (name, i) in indices.iter() {
            names[*i] = *name;
        }
        let reach = (0..names.len())
            .map(|start| {
                let mut seen = vec![false; names.len()];
                let mut stack = successors[start].clone();
                while let Some(n) = stack.pop() {
                    if !seen[n] {
                        seen[n] = true;
                        stack.extend(successors[n].iter().copied());
                    }
                }
                seen
            })
            .collect::<Vec<Vec<bool>>>();
        let mut pairs = HashSet::new();
        for i in 0..names.len() {
            for j in 0..names.len() {
                if i != j && reach[i][j] && !reach[j][i] {
                    pairs.insert((names[i].to_string(), names[j].to_string()));
                }
            }
        }
        PreferenceRelation { pairs }
    }

    /// Returns `true` iff `a` is strictly preferred to `b`.
    pub fn prefers(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&(a.to_string(), b.to_string()))
    }

    /// Returns the number of strictly ordered pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` iff no pair is ordered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn intern<'p>(
    element: &'p str,
    indices: &mut HashMap<&'p str, usize>,
    successors: &mut Vec<Vec<usize>>,
) -> usize {
    *indices.entry(element).or_insert_with(|| {
        successors.push(vec![]);
        successors.len() - 1
    })
}

/// An ordering over arguments.
pub trait ArgumentOrdering {
    /// Returns the policy implemented by this ordering.
    fn policy(&self) -> OrderingPolicy;

    /// Returns `true` iff `a` is strictly less preferred than `b`.
    fn is_weaker(&self, a: &Argument, b: &Argument) -> bool;

    /// Returns `true` iff `a` is strictly preferred to `b`.
    fn is_stronger(&self, a: &Argument, b: &Argument) -> bool {
        self.is_weaker(b, a)
    }
}

/// The element preferences of a theory, shared by the argument orderings.
struct ElementPreferences<'a> {
    theory: &'a ArgumentationTheory,
    premises: PreferenceRelation,
    rules: PreferenceRelation,
}

impl<'a> ElementPreferences<'a> {
    fn new(theory: &'a ArgumentationTheory) -> Self {
        Self {
            theory,
            premises: PreferenceRelation::new(theory.knowledge_base().premise_preferences()),
            rules: PreferenceRelation::new(theory.knowledge_base().rule_preferences()),
        }
    }

    // A rule is designated in the preferences by its identifier or by its scheme, independently on each side.
    fn rule_is_weaker(&self, r1: usize, r2: usize) -> bool {
        let rules = self.theory.rules();
        let handles = |r: &'a Rule| std::iter::once(r.id()).chain(r.scheme());
        handles(&rules[r2]).any(|h2| handles(&rules[r1]).any(|h1| self.rules.prefers(h2, h1)))
    }

    fn ordinary_premises(&self, arg: &Argument) -> BTreeSet<Literal> {
        let kb = self.theory.knowledge_base();
        arg.premises()
            .iter()
            .filter(|p| kb.is_ordinary(p))
            .cloned()
            .collect()
    }

    fn premises_weaker(&self, a: &Argument, b: &Argument) -> bool {
        elitist_weaker(&self.ordinary_premises(a), &self.ordinary_premises(b), |x, y| {
            self.premises.prefers(y, x)
        })
    }

    fn rules_weaker(&self, ra: &BTreeSet<usize>, rb: &BTreeSet<usize>) -> bool {
        elitist_weaker(ra, rb, |x, y| self.rule_is_weaker(*x, *y))
    }
}

/// The elitist set comparison: `gamma` is weaker than `other` iff `gamma` is not empty and
/// either `other` is empty or some element of `gamma` is weaker than all the elements of `other`.
fn elitist_weaker<T, F>(gamma: &BTreeSet<T>, other: &BTreeSet<T>, is_weaker: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    if gamma.is_empty() {
        return false;
    }
    if other.is_empty() {
        return true;
    }
    gamma.iter().any(|x| other.iter().all(|y| is_weaker(x, y)))
}

// Strict and firm arguments are stronger than the fallible ones; returns None when this does not decide.
fn reasonable_weaker(a: &Argument, b: &Argument) -> Option<bool> {
    match (a.is_fallible(), b.is_fallible()) {
        (true, true) => None,
        (true, false) => Some(true),
        (false, _) => Some(false),
    }
}

/// The last-link ordering.
///
/// The last defeasible rules of the arguments are compared with the elitist set comparison.
/// When both arguments have no defeasible rule, their ordinary premises are compared instead.
pub struct LastLinkOrdering<'a> {
    preferences: ElementPreferences<'a>,
}

impl<'a> LastLinkOrdering<'a> {
    /// Builds the ordering induced by the preferences of a theory.
    pub fn new(theory: &'a ArgumentationTheory) -> Self {
        Self {
            preferences: ElementPreferences::new(theory),
        }
    }
}

impl ArgumentOrdering for LastLinkOrdering<'_> {
    fn policy(&self) -> OrderingPolicy {
        OrderingPolicy::LastLink
    }

    fn is_weaker(&self, a: &Argument, b: &Argument) -> bool {
        if let Some(r) = reasonable_weaker(a, b) {
            return r;
        }
        let (la, lb) = (a.last_defeasible_rules(), b.last_defeasible_rules());
        if la.is_empty() && lb.is_empty() {
            self.preferences.premises_weaker(a, b)
        } else {
            self.preferences.rules_weaker(la, lb)
        }
    }
}

/// The weakest-link ordering.
///
/// Strict arguments are compared on their ordinary premises, firm arguments on their defeasible rules,
/// and other arguments must be weaker on both.
pub struct WeakestLinkOrdering<'a> {
    preferences: ElementPreferences<'a>,
}

impl<'a> WeakestLinkOrdering<'a> {
    /// Builds the ordering induced by the preferences of a theory.
    pub fn new(theory: &'a ArgumentationTheory) -> Self {
        Self {
            preferences: ElementPreferences::new(theory),
        }
    }
}

impl ArgumentOrdering for WeakestLinkOrdering<'_> {
    fn policy(&self) -> OrderingPolicy {
        OrderingPolicy::WeakestLink
    }

    fn is_weaker(&self, a: &Argument, b: &Argument) -> bool {
        if let Some(r) = reasonable_weaker(a, b) {
            return r;
        }
        let premises_weaker = || self.preferences.premises_weaker(a, b);
        let rules_weaker = || {
            self.preferences
                .rules_weaker(a.defeasible_rules(), b.defeasible_rules())
        };
        if a.is_strict() && b.is_strict() {
            premises_weaker()
        } else if a.is_firm() && b.is_firm() {
            rules_weaker()
        } else {
            premises_weaker() && rules_weaker()
        }
    }
}

/// Builds the argument ordering of a theory for a policy.
pub fn new_ordering_for(
    policy: OrderingPolicy,
    theory: &ArgumentationTheory,
) -> Box<dyn ArgumentOrdering + '_> {
    match policy {
        OrderingPolicy::LastLink => Box::new(LastLinkOrdering::new(theory)),
        OrderingPolicy::WeakestLink => Box::new(WeakestLinkOrdering::new(theory)),
    }
}
