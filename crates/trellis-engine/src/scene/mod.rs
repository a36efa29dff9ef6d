//! Scene (draw stream) types.
//!
//! The UI layer records one [`QuadDraw`] per visible node into a
//! [`DrawList`]; the quad renderer replays it. Paint order is insertion
//! order, with no sorting.

mod list;

pub use list::{DrawList, QuadBatch, QuadDraw};
