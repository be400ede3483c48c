use crate::aspic::ArgumentationTheory;
use crate::evaluation::{EvaluationResponse, OrderingComparison};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while parsing a theory.
///
/// The callbacks receive the (1-based) line number and the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read argumentation theories.
pub trait TheoryReader {
    /// Reads an [`ArgumentationTheory`].
    ///
    /// # Example
    ///
    /// ```
    /// # use crustaspic::aspic::ArgumentationTheory;
    /// # use crustaspic::io::{AspicReader, TheoryReader};
    /// fn read_theory_from_str(s: &str) -> ArgumentationTheory {
    ///     let reader = AspicReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid theory")
    /// }
    /// # read_theory_from_str("axiom(p).");
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<ArgumentationTheory>;
}

/// A trait implemented by objects that write the results of evaluations.
pub trait ResponseWriter {
    /// Writes the result of an evaluation.
    fn write_response(&self, writer: &mut dyn Write, response: &EvaluationResponse) -> Result<()>;

    /// Writes the comparison of the two ordering policies.
    fn write_comparison(&self, writer: &mut dyn Write, comparison: &OrderingComparison) -> Result<()>;
}

pub(crate) fn write_lines<I, S>(writer: &mut dyn Write, lines: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .try_for_each(|l| writeln!(writer, "{}", l.as_ref()).context(context.to_string()))?;
    writer.flush().context(context.to_string())
}
