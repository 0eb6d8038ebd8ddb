//! Multi-threaded in-place products.
//!
//! Block ranges of the big operand never overlap, so blocks can be processed
//! concurrently without any synchronization. These wrap the blocked routines
//! with a `rayon` pool. Thread count adapts to the work size: small products
//! run on the calling thread.
//!
//! Available implementations:
//! - `inplace_mt::dot_inplace_left_mt`: row blocks of A in parallel
//! - `inplace_mt::dot_inplace_right_mt`: result rows of each column band in parallel

pub mod inplace_mt;

pub use inplace_mt::choose_thread_count;
