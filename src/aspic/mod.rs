//! This module contains the structured argumentation material: theories, arguments, attacks and defeats.

mod argument;
pub use argument::Argument;
pub use argument::ArgumentSet;

mod attacks;
pub use attacks::compute_attacks;
pub use attacks::Attack;
pub use attacks::AttackKind;
pub use attacks::AttackTarget;

mod construction;
pub use construction::construct_arguments;
pub use construction::ConstructionLimit;
pub use construction::ConstructionOutcome;
pub use construction::ConstructionParams;
pub use construction::DEFAULT_MAX_ARGUMENTS;
pub use construction::DEFAULT_MAX_DEPTH;

mod defeats;
pub use defeats::compute_defeats;
pub use defeats::Defeat;
pub use defeats::DefeatCriterion;

mod knowledge_base;
pub use knowledge_base::KnowledgeBase;
pub use knowledge_base::Preference;
pub use knowledge_base::PremiseKind;

mod language;
pub use language::negate;
pub use language::Contrariness;
pub use language::Literal;
pub use language::Rule;
pub use language::RuleKind;
pub use language::NEGATION_SYMBOL;

mod ordering;
pub use ordering::new_ordering_for;
pub use ordering::ArgumentOrdering;
pub use ordering::LastLinkOrdering;
pub use ordering::OrderingPolicy;
pub use ordering::PreferenceRelation;
pub use ordering::WeakestLinkOrdering;

mod theory;
pub use theory::ArgumentationTheory;
