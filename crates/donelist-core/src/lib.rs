//! # Donelist Core
//!
//! Domain model and query contract for the donelist task service.
//! This crate defines the task record plus the filter vocabulary and
//! pagination arithmetic shared by the storage backends, the HTTP
//! service, and the client.

pub mod error;
pub mod id;
pub mod query;
pub mod task;

pub use error::{StoreError, StoreResult};
pub use id::{IdValidationError, RequestId, TaskId};
pub use query::{DayWindow, InvalidFilter, Pagination, TaskFilter, TaskQuery};
pub use task::{InvalidTitle, NewTask, Task, TaskPatch};
