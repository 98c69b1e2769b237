//! Task module - generation requests, task status and the generated reflection.
//!
//! These are plain data types shared by the HTTP client, the poller and the
//! mock backend:
//! - Requests are validated before anything touches the network
//! - `TaskSnapshot` mirrors what the status endpoint reports, unchecked;
//!   the poller decides what an inconsistent snapshot means

mod reflection;
mod request;
mod status;

pub use reflection::{Quotation, Reflection};
pub use request::{Audience, AudienceSelection, GenerationRequest, RequestError};
pub use status::{TaskHandle, TaskSnapshot, TaskStatus};
