//! Bundle assembly: policies, bundles, and pool override registries.

pub mod bundle;
pub mod policy;
pub mod registry;

pub use bundle::{MapBundle, SequenceBundle, SetBundle};
pub use policy::{DirectPolicy, HybridPolicy, PooledPolicy};
pub use registry::{MapPools, SetPools};

/// Errors raised when a policy is configured with invalid arguments.
///
/// These fail fast at construction; nothing in the rent/recycle path
/// returns them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SetupError {
    /// An explicit array length bound of 0 was supplied.
    #[error("max array length must be at least 1")]
    ZeroMaxArrayLength,
}
