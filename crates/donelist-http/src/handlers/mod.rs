//! HTTP request handlers

pub mod health;
pub mod tasks;

pub use health::health_check;
pub use tasks::{create_task, delete_task, list_tasks, update_task};
