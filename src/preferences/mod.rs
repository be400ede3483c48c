//! This module contains the translation between stored preference applications and abstract preference pairs.

mod graph_algorithms;
pub use graph_algorithms::detect_cycles;
pub use graph_algorithms::transitive_closure;

mod store;
pub use store::PreferenceStore;

mod target;
pub use target::PreferenceApplication;
pub use target::PreferenceTarget;
pub use target::TargetKind;

mod translation;
pub use translation::clear_preferences;
pub use translation::delete_preference;
pub use translation::populate;
pub use translation::preference_exists;
pub use translation::preference_statistics;
pub use translation::sync;
pub use translation::validate_round_trip;
pub use translation::PopulatedPreferences;
pub use translation::PreferenceStatistics;
pub use translation::RoundTripReport;
pub use translation::SyncReport;
