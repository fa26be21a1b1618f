// Purpose: concurrent effect ownership - the layer above sample streams.
// The mixer owns every live effect and produces the final output stream.

pub mod context;
pub mod effect;
pub mod mixer;
pub mod rate_limit;

pub use context::TriggerContext;
pub use effect::EffectId;
pub use mixer::Mixer;
pub use rate_limit::RateLimiter;
