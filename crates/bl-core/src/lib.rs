//! # bl-core
//!
//! Core types, ID generation, and error types for Batchline.
//!
//! This crate provides the foundational types shared across all Batchline crates:
//! - Entity structs for batches, records, rules, projects and the field dictionary
//! - Status enums with state machine transitions
//! - ID prefix constants and generation helpers
//! - Cross-cutting error types
//! - Trail operation envelope for JSONL persistence
//! - CLI response types
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod trail;
