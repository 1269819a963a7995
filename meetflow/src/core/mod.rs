//! Core domain model types for meetflow.
//!
//! This module contains the small, dependency-free types shared by every
//! other module:
//! - Job identifiers and inputs
//! - Task state machine and pipeline stage names

mod ids;
mod input;
mod status;

pub use ids::JobId;
pub use input::JobInput;
pub use status::{StageName, TaskState};
