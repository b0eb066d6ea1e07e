//! Storage backend implementations

pub mod file;
pub mod memory;
pub mod s3;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use s3::S3Backend;
