//! HTTP request handlers.

pub(crate) mod document;
