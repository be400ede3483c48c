//! This module contains the rationality checks: well-formedness of theories, transposition and rationality postulates.

mod postulates;
pub use postulates::check_postulates;
pub use postulates::PostulateReport;

mod transposition;
pub use transposition::apply_transposition_closure;
pub use transposition::generate_transpositions;
pub use transposition::transposition_summary;
pub use transposition::validate_transposition_closure;
pub use transposition::TransposedRule;
pub use transposition::TranspositionValidation;

mod well_formedness;
pub use well_formedness::check_contraposition_closure;
pub use well_formedness::check_transposition_closure;
pub use well_formedness::check_well_formedness;
pub use well_formedness::strict_closure;
pub use well_formedness::ClosureProperty;
pub use well_formedness::WellFormednessReport;

use crate::aspic::{ArgumentSet, ArgumentationTheory};
use std::fmt::Display;

/// The whole set of rationality checks for an evaluated theory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalityReport {
    /// The well-formedness of the theory.
    pub well_formedness: WellFormednessReport,
    /// The postulates checked on the grounded extension.
    pub postulates: PostulateReport,
}

impl RationalityReport {
    /// Runs the well-formedness checks on the theory and the postulate checks on the extension.
    pub fn new(theory: &ArgumentationTheory, arguments: &ArgumentSet, extension: &[usize]) -> Self {
        RationalityReport {
            well_formedness: check_well_formedness(theory),
            postulates: check_postulates(theory, arguments, extension),
        }
    }

    /// Returns all the violations, well-formedness ones first.
    pub fn violations(&self) -> Vec<String> {
        self.well_formedness
            .violations
            .iter()
            .chain(self.postulates.violations.iter())
            .cloned()
            .collect()
    }
}

fn mark(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

impl Display for RationalityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wf = &self.well_formedness;
        writeln!(f, "well-formedness: {}", mark(wf.well_formed))?;
        writeln!(f, "  axiom consistency: {}", mark(wf.axiom_consistency))?;
        writeln!(f, "  contrary well-formedness: {}", mark(wf.contrary_well_formed))?;
        writeln!(f, "  reasonable preferences: {}", mark(wf.reasonable_preferences))?;
        writeln!(f, "  closure property: {}", wf.closure_property)?;
        let p = &self.postulates;
        writeln!(f, "rationality postulates: {}", mark(p.is_rational()))?;
        writeln!(f, "  sub-argument closure: {}", mark(p.sub_argument_closure))?;
        writeln!(f, "  strict closure: {}", mark(p.strict_closure))?;
        writeln!(f, "  direct consistency: {}", mark(p.direct_consistency))?;
        writeln!(f, "  indirect consistency: {}", mark(p.indirect_consistency))?;
        for v in self.violations() {
            writeln!(f, "  - {}", v)?;
        }
        Ok(())
    }
}
