use super::{specs::write_lines, ResponseWriter};
use crate::evaluation::{EvaluationResponse, OrderingComparison};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// A writer producing JSON documents.
///
/// Responses are written as they are serialized, with camel-cased field names.
#[derive(Default)]
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    /// Builds a writer producing indented documents.
    pub fn new_pretty() -> Self {
        JsonWriter { pretty: true }
    }

    fn write_value<T: Serialize>(&self, writer: &mut dyn Write, value: &T) -> Result<()> {
        let context = "while writing a JSON document";
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value).context(context)?;
        } else {
            serde_json::to_writer(&mut *writer, value).context(context)?;
        }
        writeln!(writer).context(context)?;
        writer.flush().context(context)
    }
}

impl ResponseWriter for JsonWriter {
    fn write_response(&self, writer: &mut dyn Write, response: &EvaluationResponse) -> Result<()> {
        self.write_value(writer, response)
    }

    fn write_comparison(&self, writer: &mut dyn Write, comparison: &OrderingComparison) -> Result<()> {
        self.write_value(writer, comparison)
    }
}

/// A writer producing a line-oriented summary.
///
/// An evaluation is written this way:
///   * a line with the ordering policy,
///   * one line per argument with its label, its status and its conclusion,
///   * the letter `w`, followed by the labels of the arguments of the grounded extension,
///   * the warnings, as comment lines beginning with `%`.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{ArgumentationTheory, Rule};
/// # use crustaspic::evaluation::{EvaluationRequest, Evaluator};
/// # use crustaspic::io::{ResponseWriter, TextWriter};
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.add_rule(Rule::defeasible("d1", &["p"], "q")).unwrap();
/// let response = Evaluator::default().evaluate(&EvaluationRequest::new(theory)).unwrap();
/// let mut buffer = Vec::new();
/// TextWriter::default().write_response(&mut buffer, &response).unwrap();
/// assert_eq!(
///     "ordering last-link\nA0 in p\nA1 in q\nw A0 A1\n",
///     String::from_utf8(buffer).unwrap()
/// );
/// ```
#[derive(Default)]
pub struct TextWriter;

impl ResponseWriter for TextWriter {
    fn write_response(&self, writer: &mut dyn Write, response: &EvaluationResponse) -> Result<()> {
        let mut lines = vec![format!("ordering {}", response.ordering)];
        lines.extend(response.arguments.iter().map(|a| {
            let status = response
                .status_of(&a.id)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{} {} {}", a.id, status, a.conclusion)
        }));
        lines.push(
            std::iter::once("w")
                .chain(response.grounded_extension.iter().map(|a| a.as_str()))
                .collect::<Vec<&str>>()
                .join(" "),
        );
        if let Some(t) = &response.truncation {
            if let Some(n) = t.arguments {
                lines.push(format!("% only {} of the {} arguments are listed", response.arguments.len(), n));
            }
        }
        lines.extend(response.warnings.iter().map(|w| format!("% warning: {}", w)));
        lines.extend(
            response
                .rationality
                .violations
                .iter()
                .map(|v| format!("% violation: {}", v)),
        );
        write_lines(writer, lines, "while writing an evaluation")
    }

    fn write_comparison(&self, writer: &mut dyn Write, comparison: &OrderingComparison) -> Result<()> {
        let pairs = |v: &[crate::evaluation::DefeatPair]| {
            v.iter()
                .map(|p| format!(" {}>{}", p.defeater, p.defeated))
                .collect::<String>()
        };
        let mut lines = vec![
            format!("defeat count difference {}", comparison.defeat_count_diff),
            format!("last-link only{}", pairs(&comparison.unique_to_last_link)),
            format!("weakest-link only{}", pairs(&comparison.unique_to_weakest_link)),
        ];
        lines.extend(comparison.status_differences.iter().map(|d| {
            format!(
                "{} last-link={} weakest-link={}",
                d.argument, d.last_link, d.weakest_link
            )
        }));
        write_lines(writer, lines, "while writing a comparison")
    }
}
