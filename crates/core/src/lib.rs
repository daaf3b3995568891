//! Core business logic for Polifund.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `journal` - Journal and entry domain types
//! - `closure` - Fiscal year closure checks and the year state machine
//! - `sync` - Hub synchronization: privacy redaction, payload
//!   transformation, and ledger aggregates

pub mod closure;
pub mod journal;
pub mod sync;
