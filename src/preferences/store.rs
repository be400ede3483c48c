use super::target::{PreferenceApplication, PreferenceTarget};
use anyhow::Result;

/// A storage of preference applications, together with the lookups needed to translate them.
///
/// Claims are identified by their text on the abstract side;
/// arguments are identified by their scheme identifier, or by a rule identifier derived from their own identifier.
pub trait PreferenceStore {
    /// Returns all the stored preference applications.
    fn preference_applications(&self) -> Result<Vec<PreferenceApplication>>;

    /// Stores a new preference application and returns its identifier.
    fn create_preference(&mut self, preferred: PreferenceTarget, dispreferred: PreferenceTarget) -> Result<String>;

    /// Deletes a preference application; returns `false` if no record has this identifier.
    fn delete_preference(&mut self, id: &str) -> Result<bool>;

    /// Returns the text of a claim, if it exists.
    fn claim_text(&self, claim_id: &str) -> Result<Option<String>>;

    /// Returns the identifier of the first claim with the given text, if any.
    fn claim_by_text(&self, text: &str) -> Result<Option<String>>;

    /// Returns the rule identifier of an argument, if it exists.
    fn argument_rule_id(&self, argument_id: &str) -> Result<Option<String>>;

    /// Returns the first argument whose rule identifier is the given one, if any.
    fn argument_by_rule_id(&self, rule_id: &str) -> Result<Option<String>>;

    /// Returns `true` iff the scheme exists.
    fn scheme_exists(&self, scheme_id: &str) -> Result<bool>;

    /// Returns the first record relating the two targets in this direction, if any.
    fn find_preference(
        &self,
        preferred: &PreferenceTarget,
        dispreferred: &PreferenceTarget,
    ) -> Result<Option<PreferenceApplication>> {
        Ok(self
            .preference_applications()?
            .into_iter()
            .find(|pa| pa.preferred() == preferred && pa.dispreferred() == dispreferred))
    }
}
