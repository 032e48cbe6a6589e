//! Codec for the tagged, recursive, big-endian binary tree format the legacy
//! server persists world and entity data in (NBT).
//!
//! The crate operates on fully materialized byte buffers; callers hand in
//! already-decompressed bytes and own the resulting [`NbtTag`] tree.
//!
//! - [`decode`] parses a byte slice into a tag tree, strictly: every length
//!   is checked before the cursor moves, and the whole input must be
//!   consumed.
//! - [`NbtTag::encode`] serializes a tree back to bytes, byte-for-byte for
//!   trees that came out of [`decode`] (compound order is preserved).
//! - [`print()`] renders a tree in the classic depth-indented `TAG_*` layout.
//! - [`json`] converts a tree into `serde_json` values.

use thiserror::Error;

pub mod json;
pub mod print;

mod encode;
mod parse;
mod tag;
mod value;

pub use json::to_json;
pub use parse::decode;
pub use print::{print, Printer};
pub use tag::Tag;
pub use value::{NbtCompound, NbtList, NbtTag, NbtValue};

/// An error while decoding or constructing NBT data.
#[derive(Debug, Error)]
pub enum NbtError {
    /// The cursor would run past the end of the input.
    #[error("input truncated at byte {pos}: need {needed} more byte(s)")]
    Truncated { pos: usize, needed: usize },
    /// A type id outside `0..=12`.
    #[error("unknown tag id {id} at byte {pos}")]
    UnknownTagId { id: u8, pos: usize },
    /// Two compound children share a name.
    #[error("duplicate compound key {0:?}")]
    DuplicateCompoundKey(String),
    /// Bytes were left over after the root tag.
    #[error("{0} byte(s) of trailing data after the root tag")]
    TrailingData(usize),
    /// A tag violates a structural bound.
    #[error(transparent)]
    InvalidTag(#[from] InvalidTagError),
}

/// A structural violation raised by the tag constructors.
#[derive(Debug, Error)]
pub enum InvalidTagError {
    #[error("tag name is {0} bytes, limit is 65535")]
    NameTooLong(usize),
    #[error("string payload is {0} bytes, limit is 65535")]
    StringTooLong(usize),
    #[error("sequence has {0} elements, limit is 2147483647")]
    SequenceTooLong(usize),
    #[error("list declared as {expected} but holds a {found}")]
    MixedList { expected: Tag, found: Tag },
    #[error("end tag is only valid as a compound terminator or as the element type of an empty list")]
    UnexpectedEnd,
}
