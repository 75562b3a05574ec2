#![forbid(unsafe_code)]

//! Core domain model and business logic for the nextworkout trainer.
//!
//! This crate provides:
//! - Domain types (plans, exercises, levels, workout modes)
//! - Built-in catalog and the custom plan store
//! - Plan schema validation and the chat prompt bridge
//! - Session configuration and the guided session engine
//! - Persistence (key-value storage, config file)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod media;
pub mod schema;
pub mod storage;
pub mod store;
pub mod prompt;
pub mod setup;
pub mod engine;
pub mod driver;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{builtin_plan, builtin_plans};
pub use config::Config;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::PlanStore;
pub use schema::{validate_plan_value, ValidationErrors};
pub use prompt::{build_prompt, chat_url, import_plan, PromptRequest};
pub use setup::SessionConfig;
pub use engine::{Cue, Event, Phase, Progress, Session, SessionState, Sound};
pub use driver::{CueSink, SessionDriver, SessionSummary, SilentCues};
