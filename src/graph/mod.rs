//! This module contains the stored argument graphs and the derivation of argumentation theories from them.

mod argument_graph;
pub use argument_graph::ArgumentGraph;
pub use argument_graph::AssumptionStatus;
pub use argument_graph::AssumptionUse;
pub use argument_graph::Claim;
pub use argument_graph::ClaimEdge;
pub use argument_graph::ClaimEdgeKind;
pub use argument_graph::ConflictApplication;
pub use argument_graph::ConflictKind;
pub use argument_graph::ConflictTarget;
pub use argument_graph::ContraryRecord;
pub use argument_graph::Scheme;
pub use argument_graph::StoredArgument;

mod derivation;
pub use derivation::derive_theory;
