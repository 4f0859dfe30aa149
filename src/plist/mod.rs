//! Apple binary property list support (decode only).
//!
//! [`decode`] turns raw `bplist00` bytes into a [`Plist`]: a flat arena of
//! [`Value`] nodes addressed by [`NodeId`]. The decoder has no knowledge of
//! note semantics; see [`crate::note`] for that.

mod decode;
mod value;

pub use decode::{decode, MAGIC, MAX_NESTING};
pub use value::{Dict, NodeId, Plist, Value};
