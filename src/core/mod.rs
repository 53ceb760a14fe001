//! Core library components.
//!
//! This module contains the reusable logic behind every command: repository
//! detection, the registries, the keychain, and the envelope engine.

pub mod blackbox;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod envelope;
pub mod erase;
pub mod keyring;
pub mod registry;
pub mod repo;
pub mod types;
