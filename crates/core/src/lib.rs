//! Functional core for todosync.
//!
//! Domain types, validation, reconciliation and the traits at the I/O seams.
//! Nothing in this crate talks to the network or the disk.

pub mod error;
pub mod photo;
pub mod remote;
pub mod repository;
pub mod storage;
pub mod task;
pub mod usecases;

pub use error::{Error, Result};
