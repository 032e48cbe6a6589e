//! Conversion of tag trees into JSON values.
//!
//! Compounds become objects, lists and arrays become arrays, strings and
//! names are rendered lossy-UTF-8. The top-level shape is `{name: payload}`,
//! matching the world-dump tooling this replaces.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{NbtCompound, NbtList, NbtTag, NbtValue};

/// Converts a tag tree into a `serde_json` value.
pub fn to_json(tag: &NbtTag) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(tag)
}

impl Serialize for NbtTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&String::from_utf8_lossy(self.name()), self.value())?;
        map.end()
    }
}

impl Serialize for NbtValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NbtValue::Byte(v) => serializer.serialize_i8(*v),
            NbtValue::Short(v) => serializer.serialize_i16(*v),
            NbtValue::Int(v) => serializer.serialize_i32(*v),
            NbtValue::Long(v) => serializer.serialize_i64(*v),
            NbtValue::Float(v) => serializer.serialize_f32(*v),
            NbtValue::Double(v) => serializer.serialize_f64(*v),
            NbtValue::ByteArray(items) => items.serialize(serializer),
            NbtValue::String(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            NbtValue::List(list) => list.serialize(serializer),
            NbtValue::Compound(compound) => compound.serialize(serializer),
            NbtValue::IntArray(items) => items.serialize(serializer),
            NbtValue::LongArray(items) => items.serialize(serializer),
        }
    }
}

impl Serialize for NbtList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NbtList::Empty => serializer.serialize_seq(Some(0))?.end(),
            NbtList::Byte(items) => items.serialize(serializer),
            NbtList::Short(items) => items.serialize(serializer),
            NbtList::Int(items) => items.serialize(serializer),
            NbtList::Long(items) => items.serialize(serializer),
            NbtList::Float(items) => items.serialize(serializer),
            NbtList::Double(items) => items.serialize(serializer),
            NbtList::ByteArray(items) => items.serialize(serializer),
            NbtList::String(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&String::from_utf8_lossy(item))?;
                }
                seq.end()
            }
            NbtList::List(items) => items.serialize(serializer),
            NbtList::Compound(items) => items.serialize(serializer),
            NbtList::IntArray(items) => items.serialize(serializer),
            NbtList::LongArray(items) => items.serialize(serializer),
        }
    }
}

impl Serialize for NbtCompound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for child in self.iter() {
            map.serialize_entry(&String::from_utf8_lossy(child.name()), child.value())?;
        }
        map.end()
    }
}
