use super::aspic_reader::LITERAL;
use crate::aspic::{ArgumentationTheory, RuleKind};
use anyhow::{anyhow, Context, Result};
use std::io::Write;

/// A writer for the text format of argumentation theories.
///
/// The output can be read back by an [`AspicReader`](super::AspicReader).
/// Symmetric contrariness pairs are written as `contradictory` lines.
/// Literals that cannot be expressed in the text format (for instance compound formulas
/// like `¬(p → q)`) make the writer fail.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::{ArgumentationTheory, Rule};
/// # use crustaspic::io::AspicWriter;
/// let mut theory = ArgumentationTheory::default();
/// theory.knowledge_base_mut().add_axiom("p");
/// theory.add_rule(Rule::defeasible("d1", &["p"], "q")).unwrap();
/// let mut buffer = Vec::new();
/// AspicWriter::default().write_theory(&theory, &mut buffer).unwrap();
/// assert_eq!("axiom(p).\ndefeasible(d1,[p],q).\n", String::from_utf8(buffer).unwrap());
/// ```
#[derive(Default)]
pub struct AspicWriter;

fn checked(literal: &str) -> Result<&str> {
    if LITERAL.is_match(literal) {
        Ok(literal)
    } else {
        Err(anyhow!(r#""{}" cannot be written in the text format"#, literal))
    }
}

impl AspicWriter {
    /// Writes a theory using the text format to the provided writer.
    pub fn write_theory(&self, theory: &ArgumentationTheory, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing a theory";
        let kb = theory.knowledge_base();
        for (literal, kind) in kb.iter_elements() {
            writeln!(writer, "{}({}).", kind, checked(literal)?).context(context)?;
        }
        for rule in theory.rules() {
            let kind = match rule.kind() {
                RuleKind::Strict => "strict",
                RuleKind::Defeasible => "defeasible",
            };
            let antecedents = rule
                .antecedents()
                .iter()
                .map(|a| checked(a))
                .collect::<Result<Vec<&str>>>()?;
            writeln!(
                writer,
                "{}({},[{}],{}).",
                kind,
                checked(rule.id())?,
                antecedents.join(","),
                checked(rule.consequent())?
            )
            .context(context)?;
            if rule.name() != rule.id() {
                writeln!(writer, "name({},{}).", rule.id(), checked(rule.name())?).context(context)?;
            }
        }
        let contraries = theory.contraries();
        for (literal, contrary) in contraries.iter() {
            let symmetric = literal != contrary && contraries.is_contrary_of(literal, contrary);
            if symmetric && literal > contrary {
                continue;
            }
            writeln!(
                writer,
                "{}({},{}).",
                if symmetric { "contradictory" } else { "contrary" },
                checked(literal)?,
                checked(contrary)?
            )
            .context(context)?;
        }
        for p in kb.premise_preferences() {
            writeln!(writer, "prefer_premise({},{}).", checked(p.preferred())?, checked(p.dispreferred())?)
                .context(context)?;
        }
        for p in kb.rule_preferences() {
            writeln!(writer, "prefer_rule({},{}).", checked(p.preferred())?, checked(p.dispreferred())?)
                .context(context)?;
        }
        writer.flush().context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspic::Rule;
    use crate::io::{AspicReader, TheoryReader};

    fn write(theory: &ArgumentationTheory) -> Result<String> {
        let mut buffer = Vec::new();
        AspicWriter::default().write_theory(theory, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    #[test]
    fn test_write_contraries() {
        let mut theory = ArgumentationTheory::default();
        theory.contraries_mut().add_contradictory("p", "¬p");
        theory.contraries_mut().add_contrary("h", "q");
        assert_eq!("contrary(h,q).\ncontradictory(p,¬p).\n", write(&theory).unwrap());
    }

    #[test]
    fn test_write_then_read() {
        let text = "axiom(a).\npremise(p).\nassumption(h).\nstrict(s1,[a,p],c).\ndefeasible(d1,[],p).\nname(d1,n1).\ncontradictory(c,¬c).\nprefer_premise(p,h).\nprefer_rule(d1,d2).\n";
        let theory = AspicReader::default().read(&mut text.as_bytes()).unwrap();
        assert_eq!(text, write(&theory).unwrap());
    }

    #[test]
    fn test_compound_literal() {
        let mut theory = ArgumentationTheory::default();
        theory.add_rule(Rule::strict("t", &["¬(p → q)"], "r")).unwrap();
        assert!(write(&theory).is_err());
    }
}
