use super::{
    argument::ArgumentSet,
    attacks::{Attack, AttackKind, AttackTarget},
    knowledge_base::PremiseKind,
    ordering::ArgumentOrdering,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The condition an undermining or rebutting attack must meet to be a defeat.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DefeatCriterion {
    /// The attacker must be strictly preferred to the targeted sub-argument.
    #[default]
    Strict,
    /// The attacker must not be strictly less preferred than the targeted sub-argument.
    NotWorse,
}

/// An attack that succeeds as a defeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Defeat {
    attack: usize,
    defeater: usize,
    defeated: usize,
    target: AttackTarget,
    preference_applied: bool,
}

impl Defeat {
    /// Returns the index of the underlying attack.
    pub fn attack(&self) -> usize {
        self.attack
    }

    /// Returns the defeating argument.
    pub fn defeater(&self) -> usize {
        self.defeater
    }

    /// Returns the defeated argument.
    pub fn defeated(&self) -> usize {
        self.defeated
    }

    /// Returns the target the attack succeeded on.
    pub fn target(&self) -> &AttackTarget {
        &self.target
    }

    /// Returns `true` iff the argument ordering was consulted to decide the defeat.
    pub fn preference_applied(&self) -> bool {
        self.preference_applied
    }
}

/// Resolves attacks into defeats.
///
/// Undercutting attacks and attacks undermining an assumption always succeed.
/// Other attacks are checked target by target: the attacker is compared to the targeted sub-argument
/// under the provided ordering and criterion, and the attack succeeds as soon as one target is defeated.
///
/// The defeats keep the order of the attacks.
pub fn compute_defeats(
    arguments: &ArgumentSet,
    attacks: &[Attack],
    ordering: &dyn ArgumentOrdering,
    criterion: DefeatCriterion,
) -> Vec<Defeat> {
    attacks
        .iter()
        .enumerate()
        .filter_map(|(i, attack)| {
            let new_defeat = |target: &AttackTarget, preference_applied| Defeat {
                attack: i,
                defeater: attack.attacker(),
                defeated: attack.attacked(),
                target: target.clone(),
                preference_applied,
            };
            if attack.kind() == AttackKind::Undercut {
                return Some(new_defeat(attack.primary_target(), false));
            }
            let attacker = arguments.get_argument_by_id(attack.attacker());
            if let Some(t) = attack.targets().iter().find(|t| {
                attack.kind() == AttackKind::Undermine
                    && arguments.get_argument_by_id(t.sub_argument()).premise_kind()
                        == Some(PremiseKind::Assumption)
            }) {
                return Some(new_defeat(t, false));
            }
            attack
                .targets()
                .iter()
                .find(|t| {
                    let target = arguments.get_argument_by_id(t.sub_argument());
                    match criterion {
                        DefeatCriterion::Strict => ordering.is_stronger(attacker, target),
                        DefeatCriterion::NotWorse => !ordering.is_weaker(attacker, target),
                    }
                })
                .map(|t| new_defeat(t, true))
        })
        .collect()
}
