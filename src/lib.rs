//! Contact relay: drafts replies to contact-form messages and emails them
//! to the site operator.

pub mod config;
pub mod error;
pub mod llm;
pub mod notify;
pub mod relay;
pub mod routes;
