use super::{warning_result::WarningResult, TheoryReader, WarningHandler};
use crate::aspic::{
    ArgumentationTheory, Contrariness, KnowledgeBase, PremiseKind, Rule, RuleKind, NEGATION_SYMBOL,
};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};

pub(crate) const LITERAL_PATTERN: &str = r"[^\s,()\[\]%]+";

lazy_static! {
    pub(crate) static ref LITERAL: Regex = Regex::new(&format!(r"^{}$", LITERAL_PATTERN)).unwrap();
    static ref ELEMENT_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*(axiom|premise|assumption)\(\s*({})\s*\)\.\s*$",
        LITERAL_PATTERN
    ))
    .unwrap();
    static ref PAIR_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*(contrary|contradictory|name|prefer_premise|prefer_rule)\(\s*({})\s*,\s*({})\s*\)\.\s*$",
        LITERAL_PATTERN, LITERAL_PATTERN
    ))
    .unwrap();
    static ref RULE_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*(strict|defeasible)\(\s*({})\s*,\s*\[([^\]]*)\]\s*,\s*({})\s*\)\.\s*$",
        LITERAL_PATTERN, LITERAL_PATTERN
    ))
    .unwrap();
}

const ALTERNATIVE_NEGATION_SYMBOLS: [char; 2] = ['~', '!'];

fn captured_literal(c: &Captures, i: usize) -> WarningResult<String, String> {
    check_literal(&c[i])
}

fn check_literal(literal: &str) -> WarningResult<String, String> {
    let result = WarningResult::Ok(literal.to_string());
    match literal.chars().next() {
        Some(first) if ALTERNATIVE_NEGATION_SYMBOLS.contains(&first) => result.warn(format!(
            r#"literal "{}" starts with "{}", which is not read as a negation (use "{}")"#,
            literal, first, NEGATION_SYMBOL
        )),
        _ => result,
    }
}

fn read_antecedents(list: &str) -> Result<WarningResult<Vec<String>, String>> {
    if list.trim().is_empty() {
        return Ok(WarningResult::Ok(vec![]));
    }
    list.split(',').try_fold(WarningResult::Ok(vec![]), |acc, a| {
        let a = a.trim();
        if !LITERAL.is_match(a) {
            return Err(anyhow!(r#"invalid antecedent "{}""#, a));
        }
        Ok(acc.zip(check_literal(a)).map(|(mut v, l)| {
            v.push(l);
            v
        }))
    })
}

#[derive(Default)]
struct TheoryBuilder {
    rules: Vec<Rule>,
    rule_ids: HashSet<String>,
    names: HashMap<String, (usize, String)>,
    contraries: Contrariness,
    knowledge_base: KnowledgeBase,
    premise_preferences: Vec<(usize, String, String)>,
    rule_preferences: Vec<(usize, String, String)>,
}

/// A reader for the text format of argumentation theories.
///
/// Each non-empty line declares one element of the theory; `%` starts a comment running to the end of the line.
///
/// # Format
///
/// The following content declares an axiom `p`, an ordinary premise `q`, an assumption `h`,
/// a strict rule `s1` and a defeasible rule `d1` named `n1`,
/// the contrariness between `r` and `¬r`, and preferences over premises and rules.
///
/// ```text
/// % a small theory
/// axiom(p).
/// premise(q).
/// assumption(h).
/// strict(s1,[p,q],r).
/// defeasible(d1,[h],¬r).
/// name(d1,n1).
/// contradictory(r,¬r).
/// contrary(h,q).          % q is a contrary of h
/// prefer_premise(q,h).
/// prefer_rule(d1,d2).
/// ```
///
/// Literals are sequences of characters among which there are no spaces, commas, parentheses, brackets or `%`.
/// The names of the rules may be given before or after their declarations.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::ArgumentationTheory;
/// # use crustaspic::io::{AspicReader, TheoryReader};
/// let reader = AspicReader::default();
/// let theory = reader.read(&mut "axiom(p).\ndefeasible(d1,[p],q).".as_bytes()).unwrap();
/// assert_eq!(1, theory.rules().len());
/// assert!(theory.knowledge_base().axioms().contains("p"));
/// ```
#[derive(Default)]
pub struct AspicReader {
    warning_handlers: Vec<WarningHandler>,
}

impl AspicReader {
    /// Adds a callback function to call when warnings are raised while parsing a theory.
    pub fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }

    fn warn(&self, line_index: usize, warnings: Vec<String>) {
        for w in warnings {
            self.warning_handlers
                .iter()
                .for_each(|h| (h)(1 + line_index, w.clone()));
        }
    }

    fn read_line(&self, builder: &mut TheoryBuilder, i: usize, l: &str) -> Result<()> {
        let warning_consumer = |warnings| self.warn(i, warnings);
        if let Some(c) = ELEMENT_LINE_PATTERN.captures(l) {
            let literal = captured_literal(&c, 2).consume_warnings(warning_consumer);
            let kind = c[1].parse::<PremiseKind>()?;
            if builder.knowledge_base.kind_of(&literal) == Some(kind) {
                self.warn(i, vec![format!(r#"{} "{}" is declared twice"#, kind, literal)]);
            }
            match kind {
                PremiseKind::Axiom => builder.knowledge_base.add_axiom(&literal),
                PremiseKind::Premise => builder.knowledge_base.add_premise(&literal),
                PremiseKind::Assumption => builder.knowledge_base.add_assumption(&literal),
            }
            return Ok(());
        }
        if let Some(c) = PAIR_LINE_PATTERN.captures(l) {
            let (a, b) = captured_literal(&c, 2)
                .zip(captured_literal(&c, 3))
                .consume_warnings(warning_consumer);
            match &c[1] {
                "contrary" => builder.contraries.add_contrary(&a, &b),
                "contradictory" => builder.contraries.add_contradictory(&a, &b),
                "name" => {
                    if builder.names.insert(a.clone(), (i, b)).is_some() {
                        return Err(anyhow!(r#"rule "{}" is named twice"#, a));
                    }
                }
                kind => {
                    if a == b {
                        self.warn(i, vec![format!(r#"ignoring the preference of "{}" over itself"#, a)]);
                    } else if kind == "prefer_premise" {
                        builder.knowledge_base.add_premise_preference(&a, &b);
                        builder.premise_preferences.push((i, a, b));
                    } else {
                        builder.knowledge_base.add_rule_preference(&a, &b);
                        builder.rule_preferences.push((i, a, b));
                    }
                }
            }
            return Ok(());
        }
        if let Some(c) = RULE_LINE_PATTERN.captures(l) {
            let kind = if &c[1] == "strict" {
                RuleKind::Strict
            } else {
                RuleKind::Defeasible
            };
            let ((id, antecedents), consequent) = captured_literal(&c, 2)
                .zip(read_antecedents(&c[3])?)
                .zip(captured_literal(&c, 4))
                .consume_warnings(warning_consumer);
            if !builder.rule_ids.insert(id.clone()) {
                return Err(anyhow!(r#"a rule with identifier "{}" already exists"#, id));
            }
            builder.rules.push(Rule::new(&id, &antecedents, &consequent, kind));
            return Ok(());
        }
        Err(anyhow!(r#"syntax error in line "{}""#, l.trim()))
    }

    fn build(&self, builder: TheoryBuilder) -> Result<ArgumentationTheory> {
        let TheoryBuilder {
            rules,
            mut names,
            contraries,
            knowledge_base,
            premise_preferences,
            rule_preferences,
            ..
        } = builder;
        let rules = rules
            .into_iter()
            .map(|r| match names.remove(r.id()) {
                Some((_, name)) => r.with_name(&name),
                None => r,
            })
            .collect::<Vec<Rule>>();
        if let Some((id, (i, _))) = names.into_iter().min_by_key(|(_, (i, _))| *i) {
            return Err(anyhow!(r#"a name is given to the unknown rule "{}""#, id))
                .with_context(|| format!("while reading line with index {}", i));
        }
        let theory = ArgumentationTheory::new(rules, contraries, knowledge_base)?;
        theory.check().context("while checking the theory")?;
        for (i, a, b) in premise_preferences {
            for x in [a, b] {
                if theory.knowledge_base().kind_of(&x).is_none() {
                    self.warn(
                        i,
                        vec![format!(
                            r#"premise preference refers to "{}", which is not a knowledge base element"#,
                            x
                        )],
                    );
                }
            }
        }
        for (i, a, b) in rule_preferences {
            for x in [a, b] {
                if !theory.rules().iter().any(|r| r.id() == x || r.scheme() == Some(x.as_str())) {
                    self.warn(i, vec![format!(r#"rule preference refers to the unknown rule "{}""#, x)]);
                }
            }
        }
        Ok(theory)
    }
}

impl TheoryReader for AspicReader {
    fn read(&self, reader: &mut dyn Read) -> Result<ArgumentationTheory> {
        let mut builder = TheoryBuilder::default();
        let br = BufReader::new(reader);
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let line = line.with_context(context)?;
            let l = match line.find('%') {
                Some(p) => &line[..p],
                None => &line,
            };
            if l.trim().is_empty() {
                continue;
            }
            self.read_line(&mut builder, i, l).with_context(context)?;
        }
        self.build(builder)
    }
}
