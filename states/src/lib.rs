//! Query runtime for the user directory.
//!
//! Holds the pieces that are not specific to users: query keys, task identity with
//! cooperative cancellation, the observable status tag, and the keyed cache that
//! coalesces requests and applies freshness/eviction windows.

mod cache;
mod error;
mod key;
mod status;
mod task;

pub use cache::{CachePolicy, QueryCache};
pub use error::Cancelled;
pub use key::QueryKey;
pub use status::QueryStatus;
pub use task::{TaskHandle, TaskId};
