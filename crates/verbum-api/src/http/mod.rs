//! HTTP/REST API layer for Verbum.
//!
//! Axum-based API: the unversioned `/api/process_audio` and `/api/health`
//! routes used by the voice front end, plus session management under
//! `/api/v1/` with the envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
