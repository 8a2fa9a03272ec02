//! Credential persistence backends.

pub mod file;
pub mod memory;

pub use file::FileTokenPersistence;
pub use memory::MemoryTokenPersistence;
