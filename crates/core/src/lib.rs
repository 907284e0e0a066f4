//! Functional core of the bookstore persistence layer.
//!
//! Entity schema, view templates, validation and the storage contracts.
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod storage;
