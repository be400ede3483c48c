//! The evaluation service: validated requests, the evaluation pipeline, response caching and output limits.

mod cache;
pub use cache::fingerprint;
pub use cache::Cache;
pub use cache::MemoryCache;
pub use cache::DEFAULT_CACHE_TTL;

mod error;
pub use error::ErrorBody;
pub use error::ErrorResponse;
pub use error::EvaluationError;

mod evaluator;
pub use evaluator::DefeatPair;
pub use evaluator::Evaluator;
pub use evaluator::OrderingComparison;
pub use evaluator::StatusDifference;

mod limits;
pub use limits::OutputLimits;
pub use limits::Truncation;
pub use limits::DEFAULT_MAX_RETURNED_ARGUMENTS;
pub use limits::DEFAULT_MAX_RETURNED_RELATIONS;

mod request;
pub use request::EvaluationRequest;
pub use request::MAX_ARGUMENTS_RANGE;
pub use request::MAX_DEPTH_RANGE;

mod response;
pub use response::ArgumentView;
pub use response::AttackView;
pub use response::DefeatView;
pub use response::EvaluationResponse;
pub use response::Metrics;
pub use response::RationalityView;
