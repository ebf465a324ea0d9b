//! Handler functions for the HTTP surface (§6).

pub mod chat;
pub mod execute_workflow;
pub mod health;
pub mod stream;
