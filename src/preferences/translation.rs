use super::{
    graph_algorithms::detect_cycles,
    store::PreferenceStore,
    target::{PreferenceApplication, PreferenceTarget, TargetKind},
};
use crate::aspic::{ArgumentationTheory, Preference};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;

/// The preferences read from a store, split into premise and rule preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPreferences {
    /// The preferences between claim texts.
    pub premise_preferences: Vec<Preference>,
    /// The preferences between rule or scheme identifiers.
    pub rule_preferences: Vec<Preference>,
    /// The number of rule preferences coming from scheme/scheme records.
    pub scheme_preferences: usize,
    /// A message for each record that could not be resolved.
    pub warnings: Vec<String>,
}

impl PopulatedPreferences {
    /// Returns the total number of preferences.
    pub fn len(&self) -> usize {
        self.premise_preferences.len() + self.rule_preferences.len()
    }

    /// Returns `true` iff no preference was read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn resolve_target(store: &dyn PreferenceStore, target: &PreferenceTarget) -> Result<Option<String>> {
    match target {
        PreferenceTarget::Claim(id) => store.claim_text(id),
        PreferenceTarget::Argument(id) => store.argument_rule_id(id),
        PreferenceTarget::Scheme(id) => Ok(if store.scheme_exists(id)? {
            Some(id.clone())
        } else {
            None
        }),
    }
}

fn resolve_application(store: &dyn PreferenceStore, pa: &PreferenceApplication) -> Result<Option<Preference>> {
    let preferred = resolve_target(store, pa.preferred())?;
    let dispreferred = resolve_target(store, pa.dispreferred())?;
    Ok(match (preferred, dispreferred) {
        (Some(p), Some(d)) => Some(Preference::new(&p, &d)),
        _ => None,
    })
}

/// Reads the preference applications of a store and translates them into preference pairs.
///
/// Claims are translated into their text, arguments into their rule identifier and schemes into their identifier.
/// Records relating two claims become premise preferences; the other ones become rule preferences.
/// Records with a side that cannot be resolved are dropped with a warning.
pub fn populate(store: &dyn PreferenceStore) -> Result<PopulatedPreferences> {
    let mut populated = PopulatedPreferences::default();
    for pa in store
        .preference_applications()
        .context("while reading the preference applications")?
    {
        match resolve_application(store, &pa)? {
            Some(pref) if pa.is_premise_preference() => populated.premise_preferences.push(pref),
            Some(pref) => {
                if pa.is_scheme_preference() {
                    populated.scheme_preferences += 1;
                }
                populated.rule_preferences.push(pref)
            }
            None => {
                let message = format!(
                    "preference application {} ({} > {}) refers to a missing element",
                    pa.id(),
                    pa.preferred(),
                    pa.dispreferred()
                );
                warn!("{}", message);
                populated.warnings.push(message);
            }
        }
    }
    debug!(
        "read {} premise preferences and {} rule preferences",
        populated.premise_preferences.len(),
        populated.rule_preferences.len()
    );
    Ok(populated)
}

/// The result of a synchronization of abstract preferences to a store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// The number of records created.
    pub created: usize,
    /// The number of preferences that were not written, because they already exist or cannot be resolved.
    pub skipped: usize,
    /// A message for each preference that could not be written.
    pub errors: Vec<String>,
}

enum Resolution {
    Targets(PreferenceTarget, PreferenceTarget),
    Unresolved(String),
}

fn resolve_premise_pair(store: &dyn PreferenceStore, pref: &Preference) -> Result<Resolution> {
    let preferred = match store.claim_by_text(pref.preferred())? {
        Some(c) => c,
        None => return Ok(Resolution::Unresolved(format!("preferred premise not found: {}", pref.preferred()))),
    };
    let dispreferred = match store.claim_by_text(pref.dispreferred())? {
        Some(c) => c,
        None => {
            return Ok(Resolution::Unresolved(format!(
                "dispreferred premise not found: {}",
                pref.dispreferred()
            )))
        }
    };
    Ok(Resolution::Targets(
        PreferenceTarget::Claim(preferred),
        PreferenceTarget::Claim(dispreferred),
    ))
}

fn resolve_rule_pair(store: &dyn PreferenceStore, pref: &Preference) -> Result<Resolution> {
    let preferred = store.argument_by_rule_id(pref.preferred())?;
    let dispreferred = store.argument_by_rule_id(pref.dispreferred())?;
    match (preferred, dispreferred) {
        (Some(p), Some(d)) => Ok(Resolution::Targets(
            PreferenceTarget::Argument(p),
            PreferenceTarget::Argument(d),
        )),
        (p, _) => {
            if store.scheme_exists(pref.preferred())? && store.scheme_exists(pref.dispreferred())? {
                return Ok(Resolution::Targets(
                    PreferenceTarget::Scheme(pref.preferred().to_string()),
                    PreferenceTarget::Scheme(pref.dispreferred().to_string()),
                ));
            }
            Ok(Resolution::Unresolved(if p.is_none() {
                format!("preferred rule not found: {}", pref.preferred())
            } else {
                format!("dispreferred rule not found: {}", pref.dispreferred())
            }))
        }
    }
}

/// Writes the preferences of a theory to a store.
///
/// Premise preferences become claim/claim records, the claims being found by their text.
/// Rule preferences become argument/argument records (the first argument with the rule identifier),
/// or scheme/scheme records when no argument matches but both schemes exist.
/// Preferences already present in the store are skipped, so synchronizing twice creates nothing the second time.
/// Preferences that cannot be resolved are skipped and reported as errors; they never abort the synchronization.
pub fn sync(theory: &ArgumentationTheory, store: &mut dyn PreferenceStore) -> Result<SyncReport> {
    let existing = populate(&*store)?;
    let mut present_premise_pairs = existing.premise_preferences.into_iter().collect::<HashSet<Preference>>();
    let mut present_rule_pairs = existing.rule_preferences.into_iter().collect::<HashSet<Preference>>();
    let mut report = SyncReport::default();
    let kb = theory.knowledge_base();
    let pairs = kb
        .premise_preferences()
        .iter()
        .map(|p| (p, true))
        .chain(kb.rule_preferences().iter().map(|p| (p, false)));
    for (pref, is_premise) in pairs {
        let present = if is_premise {
            &mut present_premise_pairs
        } else {
            &mut present_rule_pairs
        };
        if present.contains(pref) {
            report.skipped += 1;
            continue;
        }
        let outcome = if is_premise {
            resolve_premise_pair(&*store, pref)
        } else {
            resolve_rule_pair(&*store, pref)
        }
        .and_then(|resolution| match resolution {
            Resolution::Targets(p, d) => store.create_preference(p, d).map(|_| None),
            Resolution::Unresolved(message) => Ok(Some(message)),
        });
        match outcome {
            Ok(None) => {
                present.insert(pref.clone());
                report.created += 1;
            }
            Ok(Some(message)) => {
                warn!("{}", message);
                report.errors.push(message);
                report.skipped += 1;
            }
            Err(e) => {
                let kind = if is_premise { "premise" } else { "rule" };
                let message = format!("error creating {} preference {}: {:#}", kind, pref, e);
                warn!("{}", message);
                report.errors.push(message);
                report.skipped += 1;
            }
        }
    }
    info!(
        "preference synchronization: {} created, {} skipped",
        report.created, report.skipped
    );
    Ok(report)
}

/// Deletes a preference application.
pub fn delete_preference(store: &mut dyn PreferenceStore, id: &str) -> Result<()> {
    if store.delete_preference(id)? {
        Ok(())
    } else {
        Err(anyhow!(r#"no preference application with id "{}""#, id))
    }
}

/// Deletes all the preference applications of a store and returns their number.
pub fn clear_preferences(store: &mut dyn PreferenceStore) -> Result<usize> {
    let ids = store
        .preference_applications()?
        .into_iter()
        .map(|pa| pa.id().to_string())
        .collect::<Vec<String>>();
    for id in ids.iter() {
        store
            .delete_preference(id)
            .with_context(|| format!("while deleting preference application {}", id))?;
    }
    Ok(ids.len())
}

/// Returns `true` iff a record states that the first element is preferred to the second one.
pub fn preference_exists(
    store: &dyn PreferenceStore,
    preferred_id: &str,
    dispreferred_id: &str,
    kind: TargetKind,
) -> Result<bool> {
    Ok(store
        .find_preference(
            &PreferenceTarget::new(kind, preferred_id),
            &PreferenceTarget::new(kind, dispreferred_id),
        )?
        .is_some())
}

/// Statistics about the preferences of a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceStatistics {
    /// The number of premise and rule preferences.
    pub total_preferences: usize,
    /// The number of premise preferences.
    pub premise_preferences: usize,
    /// The number of rule preferences.
    pub rule_preferences: usize,
    /// The number of rule preferences coming from scheme/scheme records.
    pub scheme_preferences: usize,
    /// The cycles among the premise preferences.
    pub premise_cycles: Vec<Vec<String>>,
    /// The cycles among the rule preferences.
    pub rule_cycles: Vec<Vec<String>>,
}

impl PreferenceStatistics {
    /// Returns the total number of cycles.
    pub fn cycle_count(&self) -> usize {
        self.premise_cycles.len() + self.rule_cycles.len()
    }
}

/// Computes statistics about the preferences of a store.
pub fn preference_statistics(store: &dyn PreferenceStore) -> Result<PreferenceStatistics> {
    let populated = populate(store)?;
    Ok(PreferenceStatistics {
        total_preferences: populated.len(),
        premise_preferences: populated.premise_preferences.len(),
        rule_preferences: populated.rule_preferences.len(),
        scheme_preferences: populated.scheme_preferences,
        premise_cycles: detect_cycles(&populated.premise_preferences),
        rule_cycles: detect_cycles(&populated.rule_preferences),
    })
}

/// The result of a round-trip translation check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTripReport {
    /// Whether the round trip preserved the preferences without error.
    pub success: bool,
    /// Whether the number of premise preferences is unchanged.
    pub premise_preferences_preserved: bool,
    /// Whether the number of rule preferences is unchanged.
    pub rule_preferences_preserved: bool,
    /// The synchronization errors and the count mismatches.
    pub errors: Vec<String>,
}

/// Reads the preferences of a store, writes them back, reads them again and compares the counts.
pub fn validate_round_trip(store: &mut dyn PreferenceStore) -> Result<RoundTripReport> {
    let initial = populate(&*store)?;
    let mut theory = ArgumentationTheory::default();
    theory
        .knowledge_base_mut()
        .set_premise_preferences(initial.premise_preferences.clone());
    theory
        .knowledge_base_mut()
        .set_rule_preferences(initial.rule_preferences.clone());
    let mut errors = sync(&theory, store)?.errors;
    let last = populate(&*store)?;
    let premise_preferences_preserved = initial.premise_preferences.len() == last.premise_preferences.len();
    let rule_preferences_preserved = initial.rule_preferences.len() == last.rule_preferences.len();
    if !premise_preferences_preserved {
        errors.push(format!(
            "premise preference count mismatch: {} → {}",
            initial.premise_preferences.len(),
            last.premise_preferences.len()
        ));
    }
    if !rule_preferences_preserved {
        errors.push(format!(
            "rule preference count mismatch: {} → {}",
            initial.rule_preferences.len(),
            last.rule_preferences.len()
        ));
    }
    Ok(RoundTripReport {
        success: errors.is_empty(),
        premise_preferences_preserved,
        rule_preferences_preserved,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ArgumentGraph, StoredArgument};

    fn claim(id: &str) -> PreferenceTarget {
        PreferenceTarget::Claim(id.to_string())
    }

    fn argument(id: &str) -> PreferenceTarget {
        PreferenceTarget::Argument(id.to_string())
    }

    fn scheme(id: &str) -> PreferenceTarget {
        PreferenceTarget::Scheme(id.to_string())
    }

    fn graph() -> ArgumentGraph {
        let mut graph = ArgumentGraph::default();
        graph.add_claim("ca", "expert testimony is reliable");
        graph.add_claim("cb", "statistical evidence is reliable");
        graph.add_claim("cc", "the conclusion follows");
        graph.add_scheme("expert-opinion");
        graph.add_scheme("statistics");
        graph.add_argument(StoredArgument::new("a1", &["ca"], "cc").with_scheme("expert-opinion"));
        graph.add_argument(StoredArgument::new("a2", &["cb"], "cc"));
        graph
    }

    #[test]
    fn test_populate_premise_preferences() {
        let mut graph = graph();
        graph.create_preference(claim("ca"), claim("cb")).unwrap();
        let populated = populate(&graph).unwrap();
        assert_eq!(
            vec![Preference::new("expert testimony is reliable", "statistical evidence is reliable")],
            populated.premise_preferences
        );
        assert!(populated.rule_preferences.is_empty());
    }

    #[test]
    fn test_populate_rule_preferences() {
        let mut graph = graph();
        graph.create_preference(argument("a1"), argument("a2")).unwrap();
        graph.create_preference(scheme("statistics"), scheme("expert-opinion")).unwrap();
        let populated = populate(&graph).unwrap();
        assert_eq!(
            vec![
                Preference::new("expert-opinion", "RA:a2"),
                Preference::new("statistics", "expert-opinion")
            ],
            populated.rule_preferences
        );
        assert_eq!(1, populated.scheme_preferences);
    }

    #[test]
    fn test_populate_missing_claims() {
        let mut graph = graph();
        graph.create_preference(claim("missing-1"), claim("missing-2")).unwrap();
        let populated = populate(&graph).unwrap();
        assert!(populated.is_empty());
        assert_eq!(1, populated.warnings.len());
    }

    #[test]
    fn test_preference_exists() {
        let mut graph = graph();
        graph.create_preference(claim("ca"), claim("cb")).unwrap();
        assert!(preference_exists(&graph, "ca", "cb", TargetKind::Claim).unwrap());
        assert!(!preference_exists(&graph, "cb", "ca", TargetKind::Claim).unwrap());
        assert!(!preference_exists(&graph, "ca", "cb", TargetKind::Argument).unwrap());
    }

    #[test]
    fn test_sync_creates_and_skips() {
        let mut graph = graph();
        let mut theory = ArgumentationTheory::default();
        theory
            .knowledge_base_mut()
            .add_premise_preference("statistical evidence is reliable", "the conclusion follows");
        let report = sync(&theory, &mut graph).unwrap();
        assert_eq!(1, report.created);
        assert_eq!(0, report.skipped);
        assert!(preference_exists(&graph, "cb", "cc", TargetKind::Claim).unwrap());
        let report = sync(&theory, &mut graph).unwrap();
        assert_eq!(0, report.created);
        assert_eq!(1, report.skipped);
    }

    #[test]
    fn test_sync_rule_preferences() {
        let mut graph = graph();
        let mut theory = ArgumentationTheory::default();
        theory.knowledge_base_mut().add_rule_preference("expert-opinion", "RA:a2");
        theory.knowledge_base_mut().add_rule_preference("statistics", "expert-opinion");
        theory.knowledge_base_mut().add_rule_preference("unknown", "RA:a2");
        let report = sync(&theory, &mut graph).unwrap();
        assert_eq!(2, report.created);
        assert_eq!(1, report.skipped);
        assert_eq!(vec!["preferred rule not found: unknown"], report.errors);
        assert!(preference_exists(&graph, "a1", "a2", TargetKind::Argument).unwrap());
        assert!(preference_exists(&graph, "statistics", "expert-opinion", TargetKind::Scheme).unwrap());
    }

    #[test]
    fn test_sync_missing_premise() {
        let mut graph = graph();
        let mut theory = ArgumentationTheory::default();
        theory
            .knowledge_base_mut()
            .add_premise_preference("expert testimony is reliable", "nothing");
        let report = sync(&theory, &mut graph).unwrap();
        assert_eq!(0, report.created);
        assert_eq!(vec!["dispreferred premise not found: nothing"], report.errors);
    }

    #[test]
    fn test_round_trip() {
        let mut graph = graph();
        graph.create_preference(claim("ca"), claim("cb")).unwrap();
        graph.create_preference(argument("a1"), argument("a2")).unwrap();
        graph.create_preference(scheme("statistics"), scheme("expert-opinion")).unwrap();
        let report = validate_round_trip(&mut graph).unwrap();
        assert!(report.success, "{:?}", report.errors);
        assert!(report.premise_preferences_preserved);
        assert!(report.rule_preferences_preserved);
        assert_eq!(3, graph.preference_applications().unwrap().len());
    }

    #[test]
    fn test_statistics() {
        let mut graph = graph();
        graph.create_preference(claim("ca"), claim("cb")).unwrap();
        graph.create_preference(claim("cb"), claim("ca")).unwrap();
        graph.create_preference(scheme("statistics"), scheme("expert-opinion")).unwrap();
        let stats = preference_statistics(&graph).unwrap();
        assert_eq!(3, stats.total_preferences);
        assert_eq!(2, stats.premise_preferences);
        assert_eq!(1, stats.rule_preferences);
        assert_eq!(1, stats.scheme_preferences);
        assert_eq!(1, stats.cycle_count());
    }

    #[test]
    fn test_delete_and_clear() {
        let mut graph = graph();
        let id = graph.create_preference(claim("ca"), claim("cb")).unwrap();
        graph.create_preference(claim("cb"), claim("cc")).unwrap();
        delete_preference(&mut graph, &id).unwrap();
        assert!(delete_preference(&mut graph, &id).is_err());
        assert_eq!(1, clear_preferences(&mut graph).unwrap());
        assert!(graph.preference_applications().unwrap().is_empty());
    }
}
