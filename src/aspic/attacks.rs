use super::{
    argument::ArgumentSet,
    knowledge_base::PremiseKind,
    language::Literal,
    theory::ArgumentationTheory,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of an attack.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttackKind {
    /// An attack on an ordinary premise or an assumption.
    Undermine,
    /// An attack on the conclusion of a defeasible rule.
    Rebut,
    /// An attack on the applicability of a defeasible rule.
    Undercut,
}

/// A place an attack hits: a sub-argument of the attacked argument, and the literal the attacker contradicts.
///
/// For undermining and rebutting attacks, the literal is the conclusion of the sub-argument;
/// for undercutting attacks, it is the name of the top rule of the sub-argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttackTarget {
    sub_argument: usize,
    literal: Literal,
}

impl AttackTarget {
    /// Returns the targeted sub-argument.
    pub fn sub_argument(&self) -> usize {
        self.sub_argument
    }

    /// Returns the contradicted literal.
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

/// An attack from an argument to another one.
///
/// There is at most one attack for a given attacker, attacked argument and attack kind;
/// when the attacker hits several places of the attacked argument, all of them are listed as targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attack {
    attacker: usize,
    attacked: usize,
    kind: AttackKind,
    targets: Vec<AttackTarget>,
}

impl Attack {
    /// Returns the attacking argument.
    pub fn attacker(&self) -> usize {
        self.attacker
    }

    /// Returns the attacked argument.
    pub fn attacked(&self) -> usize {
        self.attacked
    }

    /// Returns the kind of the attack.
    pub fn kind(&self) -> AttackKind {
        self.kind
    }

    /// Returns all the targets, the primary one first.
    pub fn targets(&self) -> &[AttackTarget] {
        &self.targets
    }

    /// Returns the primary target.
    pub fn primary_target(&self) -> &AttackTarget {
        &self.targets[0]
    }
}

/// Computes the attacks between the arguments built from a theory.
///
/// An argument `A` attacks an argument `B` when the conclusion of `A` is a contrary of:
/// * an ordinary premise or an assumption of `B` (undermining; axioms are never attacked),
/// * the conclusion of a sub-argument of `B` with a defeasible top rule (rebutting),
/// * the name of the defeasible top rule of a sub-argument of `B` (undercutting).
///
/// Self-attacks are ignored.
/// The attacks are sorted by attacker, then attacked argument, then attack kind.
pub fn compute_attacks(theory: &ArgumentationTheory, arguments: &ArgumentSet) -> Vec<Attack> {
    let contraries = theory.contraries();
    let mut attacks: BTreeMap<(usize, usize, AttackKind), Vec<AttackTarget>> = BTreeMap::new();
    let mut add_targets = |attacked: usize, sub: usize, literal: &str, kind: AttackKind| {
        for contrary in contraries.contraries_of(literal) {
            for attacker in arguments.with_conclusion(contrary) {
                if *attacker == attacked {
                    continue;
                }
                let targets = attacks.entry((*attacker, attacked, kind)).or_default();
                let target = AttackTarget {
                    sub_argument: sub,
                    literal: literal.to_string(),
                };
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
    };
    for attacked in arguments.iter() {
        for sub in attacked.all_sub_arguments().iter() {
            let sub_arg = arguments.get_argument_by_id(*sub);
            match sub_arg.premise_kind() {
                Some(PremiseKind::Premise) | Some(PremiseKind::Assumption) => {
                    add_targets(attacked.id(), *sub, sub_arg.conclusion(), AttackKind::Undermine)
                }
                _ => {}
            }
            if let Some(rule_index) = sub_arg.top_rule() {
                let rule = &theory.rules()[rule_index];
                if rule.is_defeasible() {
                    add_targets(attacked.id(), *sub, sub_arg.conclusion(), AttackKind::Rebut);
                    add_targets(attacked.id(), *sub, rule.name(), AttackKind::Undercut);
                }
            }
        }
    }
    attacks
        .into_iter()
        .map(|((attacker, attacked, kind), targets)| Attack {
            attacker,
            attacked,
            kind,
            targets,
        })
        .collect()
}
