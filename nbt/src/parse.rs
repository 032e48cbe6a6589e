use bytes::Buf;

use crate::{InvalidTagError, NbtCompound, NbtError, NbtList, NbtTag, NbtValue, Tag};

/// Decodes a single named tag occupying the entire input.
///
/// The input must be already decompressed. Leftover bytes after the root tag
/// fail with [`NbtError::TrailingData`]; a bare End byte is not a tag.
pub fn decode(data: &[u8]) -> Result<NbtTag, NbtError> {
    let mut cursor = Cursor::new(data);
    let tag = match cursor.decode_tag()? {
        Some(tag) => tag,
        None => return Err(InvalidTagError::UnexpectedEnd.into()),
    };
    if cursor.remaining() != 0 {
        return Err(NbtError::TrailingData(cursor.remaining()));
    }
    Ok(tag)
}

/// Pull-style cursor over the input slice.
///
/// The `&[u8]` is advanced by the `Buf` reads; `full_len` keeps absolute byte
/// positions for error reporting. Every length is checked with [`Cursor::need`]
/// before the matching read.
struct Cursor<'a> {
    buf: &'a [u8],
    full_len: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            full_len: data.len(),
        }
    }

    fn pos(&self) -> usize {
        self.full_len - self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn need(&self, count: usize) -> Result<(), NbtError> {
        if self.buf.remaining() < count {
            return Err(NbtError::Truncated {
                pos: self.pos(),
                needed: count - self.buf.remaining(),
            });
        }
        Ok(())
    }

    /// Copies `count` bytes out; the caller has already checked the length.
    fn take(&mut self, count: usize) -> Vec<u8> {
        let (head, rest) = self.buf.split_at(count);
        self.buf = rest;
        head.to_vec()
    }

    fn read_tag_id(&mut self) -> Result<Tag, NbtError> {
        self.need(1)?;
        let pos = self.pos();
        let id = self.buf.get_u8();
        Tag::try_from(id).map_err(|id| NbtError::UnknownTagId { id, pos })
    }

    /// One named tag. `None` is the end marker terminating a compound.
    fn decode_tag(&mut self) -> Result<Option<NbtTag>, NbtError> {
        let tag = self.read_tag_id()?;
        if tag == Tag::End {
            return Ok(None);
        }
        self.need(2)?;
        let name_len = self.buf.get_u16() as usize;
        self.need(name_len)?;
        let name = self.take(name_len);
        let value = self.decode_payload(tag)?;
        NbtTag::new(name, value).map(Some)
    }

    fn decode_payload(&mut self, tag: Tag) -> Result<NbtValue, NbtError> {
        Ok(match tag {
            Tag::End => return Err(InvalidTagError::UnexpectedEnd.into()),
            Tag::Byte => {
                self.need(1)?;
                NbtValue::Byte(self.buf.get_i8())
            }
            Tag::Short => {
                self.need(2)?;
                NbtValue::Short(self.buf.get_i16())
            }
            Tag::Int => {
                self.need(4)?;
                NbtValue::Int(self.buf.get_i32())
            }
            Tag::Long => {
                self.need(8)?;
                NbtValue::Long(self.buf.get_i64())
            }
            Tag::Float => {
                self.need(4)?;
                NbtValue::Float(self.buf.get_f32())
            }
            Tag::Double => {
                self.need(8)?;
                NbtValue::Double(self.buf.get_f64())
            }
            Tag::ByteArray => NbtValue::ByteArray(self.decode_byte_array()?),
            Tag::String => NbtValue::String(self.decode_string()?),
            Tag::List => NbtValue::List(self.decode_list()?),
            Tag::Compound => NbtValue::Compound(self.decode_compound()?),
            Tag::IntArray => NbtValue::IntArray(self.decode_int_array()?),
            Tag::LongArray => NbtValue::LongArray(self.decode_long_array()?),
        })
    }

    /// Array and list counts are a signed 32-bit field on the wire, read
    /// unsigned here; the tag constructor enforces the 2^31 - 1 cap.
    fn read_count(&mut self) -> Result<usize, NbtError> {
        self.need(4)?;
        Ok(self.buf.get_u32() as usize)
    }

    fn decode_byte_array(&mut self) -> Result<Vec<i8>, NbtError> {
        let len = self.read_count()?;
        self.need(len)?;
        let bytes = self.take(len);
        Ok(bytemuck::cast_slice(&bytes).to_vec())
    }

    fn decode_string(&mut self) -> Result<Vec<u8>, NbtError> {
        self.need(2)?;
        let len = self.buf.get_u16() as usize;
        self.need(len)?;
        Ok(self.take(len))
    }

    fn decode_int_array(&mut self) -> Result<Vec<i32>, NbtError> {
        let len = self.read_count()?;
        self.need(len * 4)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.buf.get_i32());
        }
        Ok(items)
    }

    fn decode_long_array(&mut self) -> Result<Vec<i64>, NbtError> {
        let len = self.read_count()?;
        self.need(len * 8)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.buf.get_i64());
        }
        Ok(items)
    }

    /// List payload: element type byte, count, then that many bare payloads.
    fn decode_list(&mut self) -> Result<NbtList, NbtError> {
        self.need(1)?;
        let pos = self.pos();
        let id = self.buf.get_u8();
        let element = Tag::try_from(id).map_err(|id| NbtError::UnknownTagId { id, pos })?;
        let len = self.read_count()?;
        Ok(match element {
            Tag::End => {
                // The element type may only be End while the list is empty.
                if len != 0 {
                    return Err(InvalidTagError::UnexpectedEnd.into());
                }
                NbtList::Empty
            }
            Tag::Byte => {
                self.need(len)?;
                let bytes = self.take(len);
                NbtList::Byte(bytemuck::cast_slice(&bytes).to_vec())
            }
            Tag::Short => {
                self.need(len * 2)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.buf.get_i16());
                }
                NbtList::Short(items)
            }
            Tag::Int => {
                self.need(len * 4)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.buf.get_i32());
                }
                NbtList::Int(items)
            }
            Tag::Long => {
                self.need(len * 8)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.buf.get_i64());
                }
                NbtList::Long(items)
            }
            Tag::Float => {
                self.need(len * 4)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.buf.get_f32());
                }
                NbtList::Float(items)
            }
            Tag::Double => {
                self.need(len * 8)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.buf.get_f64());
                }
                NbtList::Double(items)
            }
            Tag::ByteArray => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_byte_array()?);
                }
                NbtList::ByteArray(items)
            }
            Tag::String => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_string()?);
                }
                NbtList::String(items)
            }
            Tag::List => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_list()?);
                }
                NbtList::List(items)
            }
            Tag::Compound => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_compound()?);
                }
                NbtList::Compound(items)
            }
            Tag::IntArray => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_int_array()?);
                }
                NbtList::IntArray(items)
            }
            Tag::LongArray => {
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_long_array()?);
                }
                NbtList::LongArray(items)
            }
        })
    }

    /// Compound payload: nested named tags until the end marker. A missing
    /// marker runs into the end of input and reports truncation.
    fn decode_compound(&mut self) -> Result<NbtCompound, NbtError> {
        let mut compound = NbtCompound::new();
        while let Some(tag) = self.decode_tag()? {
            compound.insert(tag)?;
        }
        Ok(compound)
    }
}
