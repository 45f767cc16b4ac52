//! Data models for the mentorship admin console.
//!
//! These are client-side projections of the platform backend's records. Field names follow
//! the backend's camelCase JSON so payloads decode without an intermediate layer.

mod codes;
mod match_record;
mod profile;
mod stats;
mod user;

pub use codes::*;
pub use match_record::*;
pub use profile::*;
pub use stats::*;
pub use user::*;
