//! Datamart provisioning and the table load into it

pub mod loader;
pub mod provision;

pub use loader::append_table;
pub use provision::{ProvisionOutcome, provision_datamart};
