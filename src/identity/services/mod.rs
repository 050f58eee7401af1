//! Application services for user account management.

mod provisioning;

pub use provisioning::{
    CreateUserRequest, ProvisioningConfig, ProvisioningError, ProvisioningResult,
    ProvisioningService,
};
