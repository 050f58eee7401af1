//! Task lifecycle, comments and aggregate statistics.
//!
//! This module carries the core of the tracker: the task record and its
//! status state machine, the validation rules governing task fields, the
//! authorization policy deciding who may act on a task, append-only
//! comment threads, and grouped-count statistics. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Validation rules in [`validation`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;
