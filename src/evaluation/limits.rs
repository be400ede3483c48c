use serde::{Deserialize, Serialize};

/// The default maximal number of arguments returned in a response.
pub const DEFAULT_MAX_RETURNED_ARGUMENTS: usize = 1000;

/// The default maximal number of attacks (and of defeats) returned in a response.
pub const DEFAULT_MAX_RETURNED_RELATIONS: usize = 2000;

/// Caps on the size of the lists returned in a response.
///
/// The caps are independent: reaching one of them truncates its list only.
/// The metrics and the grounded extension are always computed on the whole lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLimits {
    /// The maximal number of returned arguments.
    pub max_arguments: usize,
    /// The maximal number of returned attacks.
    pub max_attacks: usize,
    /// The maximal number of returned defeats.
    pub max_defeats: usize,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            max_arguments: DEFAULT_MAX_RETURNED_ARGUMENTS,
            max_attacks: DEFAULT_MAX_RETURNED_RELATIONS,
            max_defeats: DEFAULT_MAX_RETURNED_RELATIONS,
        }
    }
}

/// A report of the lists truncated by the output limits.
///
/// Each field is the total length of the list, set only when the list was truncated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truncation {
    /// The total number of arguments, if the argument list was truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<usize>,
    /// The total number of attacks, if the attack list was truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<usize>,
    /// The total number of defeats, if the defeat list was truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defeats: Option<usize>,
}

impl Truncation {
    /// Returns `true` iff a list was truncated.
    pub fn is_truncated(&self) -> bool {
        self.arguments.is_some() || self.attacks.is_some() || self.defeats.is_some()
    }
}

/// Truncates a list to a maximal length, and returns its original length if it was truncated.
pub(crate) fn truncate<T>(list: &mut Vec<T>, max: usize) -> Option<usize> {
    if list.len() > max {
        let total = list.len();
        list.truncate(max);
        Some(total)
    } else {
        None
    }
}
