//! User accounts and role management.
//!
//! This module provisions the accounts every task operation is authorized
//! against: managers, who direct work, and employees, who carry it out. A
//! user's elevated standing is readable from three coexisting signals (staff
//! flag, profile role, managers group membership); provisioning keeps them
//! consistent from the start. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
