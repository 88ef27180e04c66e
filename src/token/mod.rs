//! Session-token lifecycle: per-credential authorities and their registry.

pub mod authority;
pub mod registry;

pub use authority::{RefreshOutcome, TokenAuthority};
pub use registry::AuthorityRegistry;
