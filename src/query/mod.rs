pub mod builder;
pub mod filter;

// Re-exports for convenience
pub use builder::{plan_queries, TileQuery};
pub use filter::{FilterState, GenusDimension};
