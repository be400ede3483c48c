use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The kind of element a preference application points to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetKind {
    /// A claim, resolved to its text.
    Claim,
    /// A stored argument, resolved to its scheme or rule identifier.
    Argument,
    /// An argumentation scheme, resolved to its identifier.
    Scheme,
}

/// One side of a preference application.
///
/// ```
/// # use crustaspic::preferences::{PreferenceTarget, TargetKind};
/// let target: PreferenceTarget = serde_json::from_str(r#"{"kind":"claim","id":"c1"}"#).unwrap();
/// assert_eq!(PreferenceTarget::Claim("c1".to_string()), target);
/// assert_eq!(TargetKind::Claim, target.kind());
/// assert_eq!("claim:c1", target.to_string());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PreferenceTarget {
    /// A claim identifier.
    Claim(String),
    /// An argument identifier.
    Argument(String),
    /// A scheme identifier.
    Scheme(String),
}

impl PreferenceTarget {
    /// Builds a target of the given kind.
    pub fn new(kind: TargetKind, id: &str) -> Self {
        match kind {
            TargetKind::Claim => PreferenceTarget::Claim(id.to_string()),
            TargetKind::Argument => PreferenceTarget::Argument(id.to_string()),
            TargetKind::Scheme => PreferenceTarget::Scheme(id.to_string()),
        }
    }

    /// Returns the kind of the target.
    pub fn kind(&self) -> TargetKind {
        match self {
            PreferenceTarget::Claim(_) => TargetKind::Claim,
            PreferenceTarget::Argument(_) => TargetKind::Argument,
            PreferenceTarget::Scheme(_) => TargetKind::Scheme,
        }
    }

    /// Returns the identifier of the targeted element.
    pub fn id(&self) -> &str {
        match self {
            PreferenceTarget::Claim(id) | PreferenceTarget::Argument(id) | PreferenceTarget::Scheme(id) => id,
        }
    }
}

impl std::fmt::Display for PreferenceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// A stored preference application: `preferred` is preferred to `dispreferred`.
///
/// Records are created and deleted, never modified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceApplication {
    id: String,
    preferred: PreferenceTarget,
    dispreferred: PreferenceTarget,
}

impl PreferenceApplication {
    /// Builds a new record.
    pub fn new(id: &str, preferred: PreferenceTarget, dispreferred: PreferenceTarget) -> Self {
        PreferenceApplication {
            id: id.to_string(),
            preferred,
            dispreferred,
        }
    }

    /// Returns the record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the preferred side.
    pub fn preferred(&self) -> &PreferenceTarget {
        &self.preferred
    }

    /// Returns the dispreferred side.
    pub fn dispreferred(&self) -> &PreferenceTarget {
        &self.dispreferred
    }

    /// Returns `true` iff both sides are claims, i.e. the record is a premise preference.
    pub fn is_premise_preference(&self) -> bool {
        matches!(
            (&self.preferred, &self.dispreferred),
            (PreferenceTarget::Claim(_), PreferenceTarget::Claim(_))
        )
    }

    /// Returns `true` iff both sides are schemes.
    pub fn is_scheme_preference(&self) -> bool {
        matches!(
            (&self.preferred, &self.dispreferred),
            (PreferenceTarget::Scheme(_), PreferenceTarget::Scheme(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_new_for_each_kind() {
        for kind in TargetKind::iter() {
            let target = PreferenceTarget::new(kind, "x");
            assert_eq!(kind, target.kind());
            assert_eq!("x", target.id());
        }
    }

    #[test]
    fn test_serialize_application() {
        let pa = PreferenceApplication::new(
            "pa1",
            PreferenceTarget::Argument("a1".to_string()),
            PreferenceTarget::Scheme("s1".to_string()),
        );
        let json = serde_json::to_string(&pa).unwrap();
        assert_eq!(
            r#"{"id":"pa1","preferred":{"kind":"argument","id":"a1"},"dispreferred":{"kind":"scheme","id":"s1"}}"#,
            json
        );
        assert!(!pa.is_premise_preference());
        assert!(!pa.is_scheme_preference());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(TargetKind::Scheme, "scheme".parse::<TargetKind>().unwrap());
        assert!("rule".parse::<TargetKind>().is_err());
    }
}
