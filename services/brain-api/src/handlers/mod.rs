//! HTTP request handlers for the animation service.
//!
//! - `page`: the single-page upload form
//! - `generate`: multipart upload to GIF attachment
//! - `health`: liveness, readiness, and Prometheus metrics

pub mod generate;
pub mod health;
pub mod page;

pub use generate::generate_handler;
pub use health::{health_handler, metrics_handler, ready_handler};
pub use page::page_handler;
