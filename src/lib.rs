//! # Reflection Client
//!
//! Submits reflection generation requests to a backend and follows the
//! resulting task until it completes or fails.
//!
//! This library provides:
//! - A task client for the submission and status endpoints
//! - A poller that turns one request into a sequence of status checks
//! - A mock backend serving the same endpoints for local work and tests
//!
//! ## Architecture
//!
//! ```text
//!   front end ──start()──▶ ┌──────────────────┐ ──submit()──────▶ ┌──────────┐
//!      ▲                   │    TaskPoller    │ ──fetch_status()─▶ │ TaskApi  │──▶ backend
//!      └──── PollerView ── │ (generation, fsm)│ ◀───────────────── └──────────┘
//!                          └──────────────────┘
//! ```
//!
//! ## Task Flow
//! 1. Front end validates input and calls `TaskPoller::start`
//! 2. Poller submits the request and receives a task id
//! 3. Poller fetches the status every interval until a terminal status
//! 4. Front end renders the settled reflection or error message
//!
//! ## Modules
//! - `task`: Requests, task status and the reflection payload
//! - `client`: `TaskApi` trait and its HTTP implementation
//! - `poller`: Generation state machine and poll loop
//! - `mock`: In-memory backend

pub mod client;
pub mod config;
pub mod mock;
pub mod poller;
pub mod task;

pub use client::{ClientError, HttpTaskClient, TaskApi, TaskApiRef};
pub use config::Config;
pub use poller::{GenerationError, Outcome, Phase, PollerView, StartError, TaskPoller};
pub use task::{Audience, AudienceSelection, GenerationRequest, Reflection, TaskStatus};
