//! This module contains the abstract level of the evaluation: the defeat graph and its grounded labelling.

mod defeat_graph;
pub use defeat_graph::DefeatGraph;

mod grounded;
pub use grounded::grounded_labelling;
pub use grounded::GroundedLabelling;
pub use grounded::Justification;

mod stats;
pub use stats::defeat_graph_stats;
pub use stats::is_complete_labelling;
pub use stats::summarize_labelling;
pub use stats::DefeatGraphStats;
pub use stats::LabellingSummary;
