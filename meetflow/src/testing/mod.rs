//! Testing utilities for meetflow pipelines.
//!
//! This module provides:
//! - Scripted transcription and completion services
//! - An in-memory destination
//! - The sample meeting used across the test suite

mod fixtures;
mod mocks;

pub use fixtures::{
    default_catalog, meeting_assistant, two_commitment_assistant, wait_for_terminal,
    SAMPLE_ANALYSIS, SAMPLE_EXTRACTION, SAMPLE_SUMMARY, SAMPLE_TRANSCRIPT,
    TWO_COMMITMENT_EXTRACTION, TWO_COMMITMENT_TRANSCRIPT,
};
pub use mocks::{InMemoryDestination, ScriptedCompletion, ScriptedTranscriber};
