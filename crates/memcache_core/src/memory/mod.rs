//! # Memory Management
//!
//! Size-partitioned pooling for hot paths that allocate and free the same
//! few object sizes over and over.
//!
//! ## Design Philosophy
//!
//! Freed memory is kept, not returned. After warm-up:
//! - A request is served from its bucket's free list
//! - A free parks the block on that list
//! - The system allocator is not involved at all

mod block;
mod bucket;
mod cache;
mod index;
mod node;
mod report;

pub use block::Block;
pub use cache::MemCache;
pub use report::{BucketSnapshot, TeardownReport};
