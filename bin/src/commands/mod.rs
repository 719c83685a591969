//! CLI command implementations.

pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod show;
pub(crate) mod zones;
