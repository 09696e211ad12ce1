//! Use-case services called by the presentation layer.
//!
//! # Responsibility
//! - Turn raw user input into normalized, validated store writes.
//! - Keep UI callers decoupled from storage details.

pub mod list_service;
