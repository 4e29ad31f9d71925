//! Shared utilities for the Bizcard backend.
//!
//! This crate provides functionality used across all other crates:
//! - Common validation logic for section keys and business types

pub mod validation;
