//! Domain layer for Bizcard.
//!
//! This crate contains:
//! - Domain models (BusinessTemplate, SectionDefinition, SectionOrderHint, VideoEntry)
//! - Section resolution, embed extraction and render planning services
//! - The business template catalog

pub mod models;
pub mod services;
