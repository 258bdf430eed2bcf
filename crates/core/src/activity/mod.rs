//! Activity notifications for board changes.
//!
//! Board writes emit [`ActivityEvent`]s through an [`ActivityHandle`]; an
//! [`ActivityWriter`] task drains the queue into an [`ActivityStore`].
//! Delivery is best effort and never affects the write that produced it.

mod events;
mod handle;
mod sqlite;
mod store;
mod writer;

pub use events::*;
pub use handle::*;
pub use sqlite::*;
pub use store::*;
pub use writer::*;
