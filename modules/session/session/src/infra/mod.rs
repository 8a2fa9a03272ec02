//! Infrastructure adapters for the session module.

pub mod storage;
