//! Health assistant service.
//!
//! Two pipelines over hosted inference: `POST /chat` forwards a message to a
//! Gradio Space, and the retrieval assistant answers from a prebuilt vector
//! index through a hosted text-generation model.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
