//! group_config - Per-group gameplay policy.
//!
//! Defines the `GroupPolicy` trait the session engine consults before and
//! during games, plus a JSON-file-backed `ConfigStore` implementation with
//! the mutation operations exposed to group administrators.

pub mod error;
pub mod policy;
pub mod store;

pub use error::ConfigError;
pub use policy::GroupPolicy;
pub use store::{ConfigStore, GroupConfig};
