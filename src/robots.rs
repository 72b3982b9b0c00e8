mod agent_policy;
mod pattern_rule;
mod policy_document;
mod policy_error;
mod url_normalizer;

pub use agent_policy::{AgentPolicy, ROBOTS_TXT_PATH};
pub use pattern_rule::{PatternRule, Polarity};
pub use policy_document::{DEFAULT_AGENT, PolicyDocument};
pub use policy_error::PolicyError;
pub use url_normalizer::{NormalizedUrl, robots_url};
