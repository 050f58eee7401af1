//! Gantt: role-based task tracking service.
//!
//! This crate provides the core functionality of a task tracker for small
//! teams: provisioning manager and employee accounts, a task lifecycle
//! with an authorized status state machine, append-only comment threads,
//! and aggregate statistics over the tasks an actor may see.
//!
//! # Architecture
//!
//! Gantt follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`identity`]: User accounts, roles, and provisioning
//! - [`task`]: Task lifecycle, comments, and aggregate statistics
//! - [`http`]: HTTP surface exposing both over Actix Web
//! - [`config`]: Environment-derived runtime configuration

pub mod config;
pub mod http;
pub mod identity;
pub mod task;
