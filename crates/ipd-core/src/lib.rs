//! Core data structures and errors for IPD backup decoding.
//!
//! This crate defines the closed field-type table, the projected contact
//! mapping, and the error taxonomy shared by the reader and the renderer.

pub mod error;
pub mod types;
