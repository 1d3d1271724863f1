//! Politisian dashboard client.
//!
//! Resolves user identity through an ordered fallback chain (full
//! profile, session info, local backup) and exposes the result as a
//! small set of well-defined view states.

pub mod backup;
pub mod config;
pub mod logging;
pub mod presenter;
pub mod profile;
pub mod resolver;
pub mod transport;
