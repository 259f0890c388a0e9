//! Diff records, the per-session store and report rendering.
//!
//! A [`Diff`] is created only by the engine while traversing and is never
//! mutated afterwards. The [`DiffStore`] keeps records in the order they were
//! found; [`Template`] turns each one into a report line.

pub mod model;
pub mod render;
pub mod store;

pub use model::{Diff, DiffValue, Presence};
pub use render::{Template, DEFAULT_TEMPLATE};
pub use store::DiffStore;
