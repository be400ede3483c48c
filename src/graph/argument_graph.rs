use crate::aspic::RuleKind;
use crate::preferences::{PreferenceApplication, PreferenceStore, PreferenceTarget};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

const RULE_ID_PREFIX: &str = "RA:";

/// A claim of an argument graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    id: String,
    text: String,
    #[serde(default)]
    axiom: bool,
}

impl Claim {
    /// Returns the claim identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the claim text, which is the literal it stands for.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` iff the claim is flagged as an axiom.
    pub fn is_axiom(&self) -> bool {
        self.axiom
    }
}

/// A stored argument: an inference from premise claims to a conclusion claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredArgument {
    id: String,
    #[serde(default)]
    premises: Vec<String>,
    conclusion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheme_id: Option<String>,
    #[serde(default = "default_rule_type")]
    rule_type: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rule_name: Option<String>,
}

fn default_rule_type() -> RuleKind {
    RuleKind::Defeasible
}

impl StoredArgument {
    /// Builds a defeasible argument without scheme.
    pub fn new<S: AsRef<str>>(id: &str, premises: &[S], conclusion: &str) -> Self {
        StoredArgument {
            id: id.to_string(),
            premises: premises.iter().map(|p| p.as_ref().to_string()).collect(),
            conclusion: conclusion.to_string(),
            scheme_id: None,
            rule_type: RuleKind::Defeasible,
            rule_name: None,
        }
    }

    /// Sets the scheme this argument instantiates.
    pub fn with_scheme(mut self, scheme_id: &str) -> Self {
        self.scheme_id = Some(scheme_id.to_string());
        self
    }

    /// Makes the inference of this argument strict.
    pub fn strict(mut self) -> Self {
        self.rule_type = RuleKind::Strict;
        self
    }

    /// Sets the name of the inference rule of this argument.
    pub fn with_rule_name(mut self, rule_name: &str) -> Self {
        self.rule_name = Some(rule_name.to_string());
        self
    }

    /// Returns the argument identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the identifiers of the premise claims.
    pub fn premises(&self) -> &[String] {
        &self.premises
    }

    /// Returns the identifier of the conclusion claim.
    pub fn conclusion(&self) -> &str {
        &self.conclusion
    }

    /// Returns the scheme identifier, if any.
    pub fn scheme_id(&self) -> Option<&str> {
        self.scheme_id.as_deref()
    }

    /// Returns the kind of the inference rule of this argument.
    pub fn rule_type(&self) -> RuleKind {
        self.rule_type
    }

    /// Returns the identifier of the rule derived from this argument (`RA:` followed by the argument id).
    pub fn rule_id(&self) -> String {
        format!("{}{}", RULE_ID_PREFIX, self.id)
    }

    /// Returns the literal naming the rule derived from this argument: its rule name if any, else its rule id.
    pub fn rule_name(&self) -> String {
        self.rule_name.clone().unwrap_or_else(|| self.rule_id())
    }

    /// Returns the identifier preference applications translate this argument into: its scheme if any, else its rule id.
    pub fn preference_rule_id(&self) -> String {
        self.scheme_id.clone().unwrap_or_else(|| self.rule_id())
    }
}

/// An argumentation scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

impl Scheme {
    /// Returns the scheme identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The status of an assumption use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssumptionStatus {
    /// The assumption is proposed but not accepted yet.
    Proposed,
    /// The assumption is accepted.
    Accepted,
    /// The assumption was retracted.
    Retracted,
}

/// A use of a claim as an assumption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionUse {
    claim_id: String,
    status: AssumptionStatus,
}

impl AssumptionUse {
    /// Returns the identifier of the assumed claim.
    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    /// Returns the status of the assumption.
    pub fn status(&self) -> AssumptionStatus {
        self.status
    }
}

/// The kind of a conflict application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConflictKind {
    /// A conflict with a conclusion.
    Rebut,
    /// A conflict with a premise.
    Undermine,
    /// A conflict with the application of an inference.
    Undercut,
}

/// The element a conflict application is directed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ConflictTarget {
    /// A claim.
    Claim(String),
    /// A stored argument.
    Argument(String),
}

/// A conflict application: a claim conflicting with another claim or with an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictApplication {
    id: String,
    kind: ConflictKind,
    conflicting_claim: String,
    target: ConflictTarget,
}

impl ConflictApplication {
    /// Builds a new conflict application.
    pub fn new(id: &str, kind: ConflictKind, conflicting_claim: &str, target: ConflictTarget) -> Self {
        ConflictApplication {
            id: id.to_string(),
            kind,
            conflicting_claim: conflicting_claim.to_string(),
            target,
        }
    }

    /// Returns the identifier of the record.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the kind of conflict.
    pub fn kind(&self) -> ConflictKind {
        self.kind
    }

    /// Returns the identifier of the conflicting claim.
    pub fn conflicting_claim(&self) -> &str {
        &self.conflicting_claim
    }

    /// Returns the conflicted element.
    pub fn target(&self) -> &ConflictTarget {
        &self.target
    }
}

/// An explicit contrary declaration between two claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContraryRecord {
    claim_id: String,
    contrary_id: String,
    #[serde(default)]
    symmetric: bool,
}

impl ContraryRecord {
    /// Returns the claim the contrary is declared for.
    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    /// Returns the contrary claim.
    pub fn contrary_id(&self) -> &str {
        &self.contrary_id
    }

    /// Returns `true` iff the declaration holds in both directions.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}

/// The kind of an edge between two claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClaimEdgeKind {
    /// The source claim supports the target claim.
    Supports,
    /// The source claim rebuts the target claim.
    Rebuts,
}

/// An edge between two claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEdge {
    from: String,
    to: String,
    kind: ClaimEdgeKind,
}

impl ClaimEdge {
    /// Returns the source claim.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Returns the target claim.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Returns the kind of the edge.
    pub fn kind(&self) -> ClaimEdgeKind {
        self.kind
    }
}

/// A stored argument graph: claims, arguments, schemes, conflicts and preference applications.
///
/// Graphs are usually read from JSON documents; they implement [`PreferenceStore`] in memory.
///
/// # Example
///
/// ```
/// # use crustaspic::graph::{ArgumentGraph, StoredArgument};
/// # use crustaspic::preferences::{PreferenceStore, PreferenceTarget};
/// let mut graph = ArgumentGraph::default();
/// graph.add_claim("c1", "p");
/// graph.add_claim("c2", "q");
/// graph.add_argument(StoredArgument::new("a1", &["c1"], "c2"));
/// let id = graph
///     .create_preference(PreferenceTarget::Claim("c1".to_string()), PreferenceTarget::Claim("c2".to_string()))
///     .unwrap();
/// assert_eq!(1, graph.preference_applications().unwrap().len());
/// assert!(graph.delete_preference(&id).unwrap());
/// assert_eq!(Some("RA:a1".to_string()), graph.argument_rule_id("a1").unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentGraph {
    #[serde(default)]
    claims: Vec<Claim>,
    #[serde(default)]
    arguments: Vec<StoredArgument>,
    #[serde(default)]
    schemes: Vec<Scheme>,
    #[serde(default)]
    assumptions: Vec<AssumptionUse>,
    #[serde(default)]
    conflicts: Vec<ConflictApplication>,
    #[serde(default)]
    contraries: Vec<ContraryRecord>,
    #[serde(default)]
    edges: Vec<ClaimEdge>,
    #[serde(default)]
    preferences: Vec<PreferenceApplication>,
}

impl ArgumentGraph {
    /// Reads a graph from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("while reading an argument graph")
    }

    /// Adds a claim.
    pub fn add_claim(&mut self, id: &str, text: &str) {
        self.claims.push(Claim {
            id: id.to_string(),
            text: text.to_string(),
            axiom: false,
        });
    }

    /// Flags a claim as an axiom.
    pub fn set_axiom(&mut self, claim_id: &str) -> Result<()> {
        let claim = self
            .claims
            .iter_mut()
            .find(|c| c.id == claim_id)
            .ok_or_else(|| anyhow!(r#"no claim with id "{}""#, claim_id))?;
        claim.axiom = true;
        Ok(())
    }

    /// Adds an argument.
    pub fn add_argument(&mut self, argument: StoredArgument) {
        self.arguments.push(argument);
    }

    /// Adds a scheme.
    pub fn add_scheme(&mut self, id: &str) {
        self.schemes.push(Scheme {
            id: id.to_string(),
            key: None,
        });
    }

    /// Records the use of a claim as an assumption.
    pub fn add_assumption(&mut self, claim_id: &str, status: AssumptionStatus) {
        self.assumptions.push(AssumptionUse {
            claim_id: claim_id.to_string(),
            status,
        });
    }

    /// Adds a conflict application.
    pub fn add_conflict(&mut self, conflict: ConflictApplication) {
        self.conflicts.push(conflict);
    }

    /// Declares a contrary between two claims.
    pub fn add_contrary(&mut self, claim_id: &str, contrary_id: &str, symmetric: bool) {
        self.contraries.push(ContraryRecord {
            claim_id: claim_id.to_string(),
            contrary_id: contrary_id.to_string(),
            symmetric,
        });
    }

    /// Adds an edge between two claims.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: ClaimEdgeKind) {
        self.edges.push(ClaimEdge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        });
    }

    /// Returns the claims.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Returns the claim with the given identifier, if any.
    pub fn get_claim(&self, id: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.id == id)
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &[StoredArgument] {
        &self.arguments
    }

    /// Returns the argument with the given identifier, if any.
    pub fn get_argument(&self, id: &str) -> Option<&StoredArgument> {
        self.arguments.iter().find(|a| a.id == id)
    }

    /// Returns the assumption uses.
    pub fn assumptions(&self) -> &[AssumptionUse] {
        &self.assumptions
    }

    /// Returns the conflict applications.
    pub fn conflicts(&self) -> &[ConflictApplication] {
        &self.conflicts
    }

    /// Returns the explicit contrary declarations.
    pub fn contraries(&self) -> &[ContraryRecord] {
        &self.contraries
    }

    /// Returns the edges between claims.
    pub fn edges(&self) -> &[ClaimEdge] {
        &self.edges
    }

    fn new_preference_id(&self) -> String {
        (self.preferences.len() + 1..)
            .map(|i| format!("pa{}", i))
            .find(|id| self.preferences.iter().all(|pa| pa.id() != id.as_str()))
            .unwrap_or_default()
    }
}

impl PreferenceStore for ArgumentGraph {
    fn preference_applications(&self) -> Result<Vec<PreferenceApplication>> {
        Ok(self.preferences.clone())
    }

    fn create_preference(&mut self, preferred: PreferenceTarget, dispreferred: PreferenceTarget) -> Result<String> {
        let id = self.new_preference_id();
        self.preferences
            .push(PreferenceApplication::new(&id, preferred, dispreferred));
        Ok(id)
    }

    fn delete_preference(&mut self, id: &str) -> Result<bool> {
        let n = self.preferences.len();
        self.preferences.retain(|pa| pa.id() != id);
        Ok(self.preferences.len() != n)
    }

    fn claim_text(&self, claim_id: &str) -> Result<Option<String>> {
        Ok(self.get_claim(claim_id).map(|c| c.text.clone()))
    }

    fn claim_by_text(&self, text: &str) -> Result<Option<String>> {
        Ok(self.claims.iter().find(|c| c.text == text).map(|c| c.id.clone()))
    }

    fn argument_rule_id(&self, argument_id: &str) -> Result<Option<String>> {
        Ok(self.get_argument(argument_id).map(|a| a.preference_rule_id()))
    }

    fn argument_by_rule_id(&self, rule_id: &str) -> Result<Option<String>> {
        Ok(self
            .arguments
            .iter()
            .find(|a| a.preference_rule_id() == rule_id)
            .map(|a| a.id.clone()))
    }

    fn scheme_exists(&self, scheme_id: &str) -> Result<bool> {
        Ok(self.schemes.iter().any(|s| s.id == scheme_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let graph = ArgumentGraph::from_json(
            r#"{
                "claims": [{"id": "c1", "text": "p", "axiom": true}, {"id": "c2", "text": "q"}],
                "arguments": [{"id": "a1", "premises": ["c1"], "conclusion": "c2", "schemeId": "s1", "ruleType": "strict"}],
                "schemes": [{"id": "s1"}],
                "conflicts": [{"id": "ca1", "kind": "undercut", "conflictingClaim": "c2", "target": {"kind": "argument", "id": "a1"}}],
                "preferences": [{"id": "pa1", "preferred": {"kind": "claim", "id": "c1"}, "dispreferred": {"kind": "claim", "id": "c2"}}]
            }"#,
        )
        .unwrap();
        assert!(graph.get_claim("c1").unwrap().is_axiom());
        assert!(!graph.get_claim("c2").unwrap().is_axiom());
        let a1 = graph.get_argument("a1").unwrap();
        assert_eq!(RuleKind::Strict, a1.rule_type());
        assert_eq!("RA:a1", a1.rule_id());
        assert_eq!("s1", a1.preference_rule_id());
        assert_eq!(ConflictKind::Undercut, graph.conflicts()[0].kind());
        assert_eq!(1, graph.preference_applications().unwrap().len());
    }

    #[test]
    fn test_from_json_error() {
        assert!(ArgumentGraph::from_json(r#"{"claims": [{"id": "c1"}]}"#).is_err());
    }

    #[test]
    fn test_new_preference_ids_are_unique() {
        let mut graph = ArgumentGraph::default();
        let c = || PreferenceTarget::Claim("c".to_string());
        let id1 = graph.create_preference(c(), c()).unwrap();
        let id2 = graph.create_preference(c(), c()).unwrap();
        graph.delete_preference(&id1).unwrap();
        let id3 = graph.create_preference(c(), c()).unwrap();
        assert_ne!(id2, id3);
        assert_eq!(2, graph.preference_applications().unwrap().len());
    }

    #[test]
    fn test_lookups() {
        let mut graph = ArgumentGraph::default();
        graph.add_claim("c1", "p");
        graph.add_scheme("s1");
        graph.add_argument(StoredArgument::new("a1", &["c1"], "c1").with_scheme("s1"));
        graph.add_argument(StoredArgument::new("a2", &["c1"], "c1").with_scheme("s1"));
        assert_eq!(Some("c1".to_string()), graph.claim_by_text("p").unwrap());
        assert_eq!(None, graph.claim_by_text("q").unwrap());
        assert_eq!(Some("a1".to_string()), graph.argument_by_rule_id("s1").unwrap());
        assert!(graph.scheme_exists("s1").unwrap());
        assert!(!graph.scheme_exists("s2").unwrap());
        assert!(graph.set_axiom("c2").is_err());
    }
}
