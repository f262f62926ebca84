//! Ambient plumbing shared by the oracle crates and binary.

pub mod logging;
pub mod retry;
