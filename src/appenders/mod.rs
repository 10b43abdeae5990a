//! Writer implementations

pub mod file;
pub mod memory;

pub use file::FileWriter;
pub use memory::MemoryWriter;

pub use crate::core::{Destination, Writer};
