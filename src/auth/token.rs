//! Token bundle model and secret redaction.

pub mod bundle;
pub mod secret;
