//! Size computation and serialization of a tag tree back to wire bytes.

use bytes::BufMut;

use crate::{NbtCompound, NbtList, NbtTag, NbtValue, Tag};

impl NbtTag {
    /// Serialized length of the whole named tag: id, name length, name,
    /// payload.
    pub fn size(&self) -> usize {
        1 + 2 + self.name().len() + self.value().payload_size()
    }

    /// Serializes into a fresh exact-capacity buffer. The tree is not
    /// modified; compound children are written in insertion order.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.write(&mut out);
        debug_assert_eq!(out.len(), self.size());
        out
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.value().tag().to_u8());
        out.put_u16(self.name().len() as u16);
        out.put_slice(self.name());
        self.value().write_payload(out);
    }
}

impl NbtValue {
    /// Number of bytes the payload occupies on the wire.
    pub fn payload_size(&self) -> usize {
        match self {
            NbtValue::Byte(_) => 1,
            NbtValue::Short(_) => 2,
            NbtValue::Int(_) => 4,
            NbtValue::Long(_) => 8,
            NbtValue::Float(_) => 4,
            NbtValue::Double(_) => 8,
            NbtValue::ByteArray(items) => 4 + items.len(),
            NbtValue::String(bytes) => 2 + bytes.len(),
            NbtValue::List(list) => list.payload_size(),
            NbtValue::Compound(compound) => compound.payload_size(),
            NbtValue::IntArray(items) => 4 + 4 * items.len(),
            NbtValue::LongArray(items) => 4 + 8 * items.len(),
        }
    }

    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) {
        match self {
            NbtValue::Byte(v) => out.put_i8(*v),
            NbtValue::Short(v) => out.put_i16(*v),
            NbtValue::Int(v) => out.put_i32(*v),
            NbtValue::Long(v) => out.put_i64(*v),
            NbtValue::Float(v) => out.put_f32(*v),
            NbtValue::Double(v) => out.put_f64(*v),
            NbtValue::ByteArray(items) => {
                out.put_i32(items.len() as i32);
                out.put_slice(bytemuck::cast_slice(items));
            }
            NbtValue::String(bytes) => {
                out.put_u16(bytes.len() as u16);
                out.put_slice(bytes);
            }
            NbtValue::List(list) => list.write_payload(out),
            NbtValue::Compound(compound) => compound.write_payload(out),
            NbtValue::IntArray(items) => {
                out.put_i32(items.len() as i32);
                for v in items {
                    out.put_i32(*v);
                }
            }
            NbtValue::LongArray(items) => {
                out.put_i32(items.len() as i32);
                for v in items {
                    out.put_i64(*v);
                }
            }
        }
    }
}

impl NbtList {
    /// Element type byte, 4-byte count, then the element payloads.
    pub fn payload_size(&self) -> usize {
        5 + match self {
            NbtList::Empty => 0,
            NbtList::Byte(items) => items.len(),
            NbtList::Short(items) => 2 * items.len(),
            NbtList::Int(items) => 4 * items.len(),
            NbtList::Long(items) => 8 * items.len(),
            NbtList::Float(items) => 4 * items.len(),
            NbtList::Double(items) => 8 * items.len(),
            NbtList::ByteArray(items) => items.iter().map(|item| 4 + item.len()).sum(),
            NbtList::String(items) => items.iter().map(|item| 2 + item.len()).sum(),
            NbtList::List(items) => items.iter().map(NbtList::payload_size).sum(),
            NbtList::Compound(items) => items.iter().map(NbtCompound::payload_size).sum(),
            NbtList::IntArray(items) => items.iter().map(|item| 4 + 4 * item.len()).sum(),
            NbtList::LongArray(items) => items.iter().map(|item| 4 + 8 * item.len()).sum(),
        }
    }

    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) {
        out.put_u8(self.element_tag().to_u8());
        out.put_i32(self.len() as i32);
        match self {
            NbtList::Empty => {}
            NbtList::Byte(items) => out.put_slice(bytemuck::cast_slice(items)),
            NbtList::Short(items) => {
                for v in items {
                    out.put_i16(*v);
                }
            }
            NbtList::Int(items) => {
                for v in items {
                    out.put_i32(*v);
                }
            }
            NbtList::Long(items) => {
                for v in items {
                    out.put_i64(*v);
                }
            }
            NbtList::Float(items) => {
                for v in items {
                    out.put_f32(*v);
                }
            }
            NbtList::Double(items) => {
                for v in items {
                    out.put_f64(*v);
                }
            }
            NbtList::ByteArray(items) => {
                for item in items {
                    out.put_i32(item.len() as i32);
                    out.put_slice(bytemuck::cast_slice(item));
                }
            }
            NbtList::String(items) => {
                for item in items {
                    out.put_u16(item.len() as u16);
                    out.put_slice(item);
                }
            }
            NbtList::List(items) => {
                for item in items {
                    item.write_payload(out);
                }
            }
            NbtList::Compound(items) => {
                for item in items {
                    item.write_payload(out);
                }
            }
            NbtList::IntArray(items) => {
                for item in items {
                    out.put_i32(item.len() as i32);
                    for v in item {
                        out.put_i32(*v);
                    }
                }
            }
            NbtList::LongArray(items) => {
                for item in items {
                    out.put_i32(item.len() as i32);
                    for v in item {
                        out.put_i64(*v);
                    }
                }
            }
        }
    }
}

impl NbtCompound {
    /// Children in insertion order plus the trailing End byte.
    pub fn payload_size(&self) -> usize {
        1 + self.iter().map(NbtTag::size).sum::<usize>()
    }

    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) {
        for child in self.iter() {
            child.write(out);
        }
        out.put_u8(Tag::End.to_u8());
    }
}
