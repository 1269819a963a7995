//! # Meetflow
//!
//! An asynchronous pipeline that turns a recorded meeting into a structured
//! report and publishes its action items to a record store.
//!
//! Meetflow provides:
//!
//! - **Fire-and-poll jobs**: submit audio, then poll a forward-only task state
//! - **A fixed stage sequence**: transcribe, analyze, summarize, extract,
//!   structure and sync, each behind a typed [`stages::Stage`]
//! - **A canonical record**: untrusted model output is normalized and validated
//!   before anything is persisted
//! - **Schema-aware sync**: destination fields are discovered once and every
//!   action item is written independently
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use meetflow::prelude::*;
//!
//! let pipeline = MeetingPipeline::new(transcriber, completion)
//!     .connect_destination(destination, &config.fields)
//!     .await;
//! let service = JobService::new(Arc::new(TaskRegistry::new()), Arc::new(pipeline));
//!
//! let id = service.submit(JobInput::audio("standup.mp3"));
//! let status = service.status(id)?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod destination;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod record;
pub mod registry;
pub mod schema;
pub mod service;
pub mod stages;
pub mod sync;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{FieldNames, LoggingConfig, MeetflowConfig};
    pub use crate::core::{JobId, JobInput, StageName, TaskState};
    pub use crate::destination::{
        Destination, FieldCatalog, FieldType, PropertyValue, RecordHandle, RecordPayload,
    };
    pub use crate::errors::{
        DestinationError, InvalidTransitionError, MeetflowError, PipelineError,
        ResourceNotFound, StageError, UpstreamError, ValidationError,
    };
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent,
    };
    pub use crate::pipeline::{CanonicalOutput, MeetingPipeline};
    pub use crate::providers::{CompletionClient, CompletionRequest, Transcriber};
    pub use crate::record::{MeetingInfo, MeetingResult, TodoItem};
    pub use crate::registry::{Job, TaskRegistry};
    pub use crate::schema::{FieldRole, SchemaAdapter};
    pub use crate::service::{JobService, JobStatusView};
    pub use crate::stages::Stage;
    pub use crate::sync::{SyncEngine, SyncOutcome, SyncReport, SyncStatus};
}
