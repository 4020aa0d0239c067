//! Typed client for the contact submission pipeline.
//!
//! Embedders drive a [`form::FormController`] from their UI events; the
//! controller validates input as the user types and hands completed
//! submissions to a [`submit::SubmitService`] (usually the HTTP client in
//! [`submit`]) which talks to the relay endpoint.

pub mod form;
pub mod prefs;
pub mod submit;
pub mod validate;
