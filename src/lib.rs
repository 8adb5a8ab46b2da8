//! `leakage-calc` library crate.
//!
//! Estimates the monthly cost of payment processing with an incumbent
//! provider and the savings from switching to the reference provider.
//!
//! The binary (`leak`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the calculation engine can sit behind any request front-end

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod registry;
pub mod report;
pub mod sweep;
