use super::{
    knowledge_base::PremiseKind,
    language::{Literal, RuleKind},
    theory::ArgumentationTheory,
};
use anyhow::{anyhow, Result};
use std::collections::{BTreeSet, HashMap};

/// A structured argument.
///
/// Atomic arguments are made of a single knowledge base element.
/// Composite arguments apply a rule (the top rule) to a list of sub-arguments, one per antecedent of the rule.
///
/// Arguments are built by the [construction engine](crate::aspic::construct_arguments) and identified by their index in the [`ArgumentSet`].
/// Rules are referred to by their index in the theory rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub(crate) id: usize,
    pub(crate) conclusion: Literal,
    pub(crate) premises: BTreeSet<Literal>,
    pub(crate) premise_kind: Option<PremiseKind>,
    pub(crate) top_rule: Option<(usize, RuleKind)>,
    pub(crate) sub_arguments: Vec<usize>,
    pub(crate) all_sub_arguments: BTreeSet<usize>,
    pub(crate) defeasible_rules: BTreeSet<usize>,
    pub(crate) last_defeasible_rules: BTreeSet<usize>,
    pub(crate) firm: bool,
    pub(crate) depth: usize,
}

impl Argument {
    pub(crate) fn new_atomic(id: usize, literal: &str, kind: PremiseKind) -> Self {
        Argument {
            id,
            conclusion: literal.to_string(),
            premises: std::iter::once(literal.to_string()).collect(),
            premise_kind: Some(kind),
            top_rule: None,
            sub_arguments: vec![],
            all_sub_arguments: std::iter::once(id).collect(),
            defeasible_rules: BTreeSet::new(),
            last_defeasible_rules: BTreeSet::new(),
            firm: kind == PremiseKind::Axiom,
            depth: 0,
        }
    }

    /// Returns the argument identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the label of the argument, used in outputs.
    pub fn label(&self) -> String {
        argument_label(self.id)
    }

    /// Returns the conclusion.
    pub fn conclusion(&self) -> &str {
        &self.conclusion
    }

    /// Returns the knowledge base elements the argument is built on.
    pub fn premises(&self) -> &BTreeSet<Literal> {
        &self.premises
    }

    /// Returns the kind of knowledge base element for atomic arguments, or `None` for composite ones.
    pub fn premise_kind(&self) -> Option<PremiseKind> {
        self.premise_kind
    }

    /// Returns `true` iff the argument is made of a single knowledge base element.
    pub fn is_atomic(&self) -> bool {
        self.top_rule.is_none()
    }

    /// Returns the index of the top rule (in the theory rules), if any.
    pub fn top_rule(&self) -> Option<usize> {
        self.top_rule.map(|(r, _)| r)
    }

    /// Returns `true` iff the top rule exists and is defeasible.
    pub fn has_defeasible_top_rule(&self) -> bool {
        matches!(self.top_rule, Some((_, RuleKind::Defeasible)))
    }

    /// Returns the immediate sub-arguments, in the order of the top rule antecedents.
    pub fn sub_arguments(&self) -> &[usize] {
        &self.sub_arguments
    }

    /// Returns all the sub-arguments, including the argument itself.
    pub fn all_sub_arguments(&self) -> &BTreeSet<usize> {
        &self.all_sub_arguments
    }

    /// Returns the defeasible rules used in the argument.
    pub fn defeasible_rules(&self) -> &BTreeSet<usize> {
        &self.defeasible_rules
    }

    /// Returns the last defeasible rules of the argument.
    ///
    /// For an argument with a defeasible top rule, this is the top rule itself.
    /// Else, this is the union of the last defeasible rules of its immediate sub-arguments.
    pub fn last_defeasible_rules(&self) -> &BTreeSet<usize> {
        &self.last_defeasible_rules
    }

    /// Returns `true` iff the argument uses no defeasible rule.
    pub fn is_strict(&self) -> bool {
        self.defeasible_rules.is_empty()
    }

    /// Returns `true` iff all the premises are axioms.
    pub fn is_firm(&self) -> bool {
        self.firm
    }

    /// Returns `true` iff the argument is neither strict nor firm.
    pub fn is_fallible(&self) -> bool {
        !(self.is_strict() && self.is_firm())
    }

    /// Returns the depth of the argument (0 for atomic arguments).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

pub(crate) fn argument_label(id: usize) -> String {
    format!("A{}", id)
}

/// The set of arguments built from a theory.
///
/// The identifier of an argument is its index in the set.
#[derive(Clone, Debug, Default)]
pub struct ArgumentSet {
    arguments: Vec<Argument>,
    by_conclusion: HashMap<Literal, Vec<usize>>,
}

impl ArgumentSet {
    pub(crate) fn push(&mut self, mut argument: Argument) -> usize {
        let id = self.arguments.len();
        argument.id = id;
        self.by_conclusion
            .entry(argument.conclusion.clone())
            .or_default()
            .push(id);
        self.arguments.push(argument);
        id
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Returns `true` iff the set has no argument.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Returns the argument with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if no argument has this identifier.
    pub fn get_argument_by_id(&self, id: usize) -> &Argument {
        &self.arguments[id]
    }

    /// Returns the argument with the given label (see [`Argument::label`]).
    ///
    /// An error is returned if there is no such argument.
    pub fn get_argument_by_label(&self, label: &str) -> Result<&Argument> {
        label
            .strip_prefix('A')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|id| self.arguments.get(id))
            .ok_or_else(|| anyhow!("no such argument: {}", label))
    }

    /// Returns the identifiers of the arguments concluding a literal.
    pub fn with_conclusion(&self, literal: &str) -> &[usize] {
        self.by_conclusion
            .get(literal)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = &Argument> + '_ {
        self.arguments.iter()
    }

    /// Returns a textual description of the structure of an argument.
    ///
    /// Atomic arguments are described by their conclusion;
    /// composite arguments by their top rule applied to the descriptions of their sub-arguments.
    pub fn describe(&self, id: usize, theory: &ArgumentationTheory) -> String {
        let arg = &self.arguments[id];
        match arg.top_rule() {
            None => arg.conclusion.clone(),
            Some(r) => {
                let rule = &theory.rules()[r];
                let arrow = if rule.is_strict() { "->" } else { "=>" };
                let subs = arg
                    .sub_arguments
                    .iter()
                    .map(|s| self.describe(*s, theory))
                    .collect::<Vec<String>>();
                format!("[{}] {} {} {}", subs.join(", "), arrow, rule.id(), arg.conclusion)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspic::{construct_arguments, ConstructionParams, Rule};

    fn build() -> (ArgumentationTheory, ArgumentSet) {
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_axiom("a");
        theory.knowledge_base_mut().add_premise("p");
        theory.add_rule(Rule::strict("s1", &["a", "p"], "q")).unwrap();
        theory.add_rule(Rule::defeasible("d1", &["q"], "r")).unwrap();
        let args = construct_arguments(&theory, &ConstructionParams::default()).into_arguments();
        (theory, args)
    }

    #[test]
    fn test_atomic() {
        let (_, args) = build();
        let a = args.get_argument_by_id(args.with_conclusion("a")[0]);
        assert!(a.is_atomic());
        assert!(a.is_firm());
        assert!(a.is_strict());
        assert!(!a.is_fallible());
        assert_eq!(Some(PremiseKind::Axiom), a.premise_kind());
        let p = args.get_argument_by_id(args.with_conclusion("p")[0]);
        assert!(!p.is_firm());
        assert!(p.is_fallible());
    }

    #[test]
    fn test_composite() {
        let (theory, args) = build();
        let r = args.get_argument_by_id(args.with_conclusion("r")[0]);
        assert_eq!(2, r.depth());
        assert!(r.has_defeasible_top_rule());
        assert_eq!(1, r.defeasible_rules().len());
        assert_eq!(r.defeasible_rules(), r.last_defeasible_rules());
        assert_eq!(4, r.all_sub_arguments().len());
        assert_eq!("[[a, p] -> s1 q] => d1 r", args.describe(r.id(), &theory));
        let q = args.get_argument_by_id(args.with_conclusion("q")[0]);
        assert!(q.is_strict());
        assert!(!q.is_firm());
        assert!(q.last_defeasible_rules().is_empty());
    }

    #[test]
    fn test_labels() {
        let (_, args) = build();
        let a = args.get_argument_by_label("A0").unwrap();
        assert_eq!("A0", a.label());
        assert!(args.get_argument_by_label("A99").is_err());
        assert!(args.get_argument_by_label("foo").is_err());
    }
}
