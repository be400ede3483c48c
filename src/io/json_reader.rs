use super::TheoryReader;
use crate::aspic::ArgumentationTheory;
use anyhow::{Context, Result};
use std::io::Read;

/// A reader for argumentation theories encoded in JSON.
///
/// The document is an object with optional `rules`, `contraries` and `knowledgeBase` fields,
/// as produced by the serialization of an [`ArgumentationTheory`].
///
/// # Example
///
/// ```
/// # use crustaspic::io::{JsonReader, TheoryReader};
/// let json = r#"{
///     "rules": [{"id": "d1", "antecedents": ["p"], "consequent": "q", "type": "defeasible"}],
///     "contraries": {"q": ["¬q"]},
///     "knowledgeBase": {"axioms": ["p"]}
/// }"#;
/// let theory = JsonReader::default().read(&mut json.as_bytes()).unwrap();
/// assert_eq!(1, theory.rules().len());
/// assert!(theory.contraries().is_contrary_of("¬q", "q"));
/// ```
#[derive(Default)]
pub struct JsonReader;

impl TheoryReader for JsonReader {
    fn read(&self, reader: &mut dyn Read) -> Result<ArgumentationTheory> {
        let theory: ArgumentationTheory =
            serde_json::from_reader(reader).context("while reading a JSON theory")?;
        theory.check().context("while checking the theory")?;
        Ok(theory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object() {
        let theory = JsonReader::default().read(&mut "{}".as_bytes()).unwrap();
        assert!(theory.rules().is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let err = JsonReader::default().read(&mut "{".as_bytes()).unwrap_err();
        assert_eq!("while reading a JSON theory", err.to_string());
    }

    #[test]
    fn test_duplicate_rule_ids() {
        let json = r#"{"rules": [
            {"id": "r", "consequent": "p", "type": "strict"},
            {"id": "r", "consequent": "q", "type": "strict"}
        ]}"#;
        let err = JsonReader::default().read(&mut json.as_bytes()).unwrap_err();
        assert_eq!("while checking the theory", err.to_string());
    }
}
