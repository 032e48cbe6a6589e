//! The in-memory NBT tag tree.
//!
//! Names and string payloads are raw byte sequences; the wire format
//! nominally uses a modified UTF-8 but this crate leaves encoding policy to
//! callers and only renders lossily where text is needed.

use indexmap::IndexMap;

use crate::{InvalidTagError, NbtError, Tag};

/// A named node of the tag tree.
///
/// Construction validates the structural bounds: names and strings shorter
/// than 2^16 bytes, arrays and lists shorter than 2^31 elements.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtTag {
    name: Vec<u8>,
    value: NbtValue,
}

/// A tag payload. The End sentinel has no payload and therefore no variant;
/// it only exists on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(Vec<u8>),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// List payload with typed storage, one variant per element type.
///
/// Elements are stored as bare payloads, so lists are homogeneous and their
/// elements unnamed by construction. `Empty` is the conventional zero-length
/// list with declared element type End.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtList {
    Empty,
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ByteArray(Vec<Vec<i8>>),
    String(Vec<Vec<u8>>),
    List(Vec<NbtList>),
    Compound(Vec<NbtCompound>),
    IntArray(Vec<Vec<i32>>),
    LongArray(Vec<Vec<i64>>),
}

/// Compound payload: an insertion-ordered name → tag map.
///
/// Children carry their own names; the map key always matches the child's
/// name. Preserving insertion order keeps decode → encode byte-identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbtCompound {
    entries: IndexMap<Vec<u8>, NbtTag>,
}

impl NbtTag {
    /// Builds a named tag, validating the name and payload bounds.
    pub fn new(name: impl Into<Vec<u8>>, value: NbtValue) -> Result<Self, NbtError> {
        let name = name.into();
        if name.len() > u16::MAX as usize {
            return Err(InvalidTagError::NameTooLong(name.len()).into());
        }
        validate_value(&value)?;
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &NbtValue {
        &self.value
    }

    pub fn into_value(self) -> NbtValue {
        self.value
    }
}

impl NbtValue {
    /// The type id this payload serializes under.
    pub fn tag(&self) -> Tag {
        match self {
            NbtValue::Byte(_) => Tag::Byte,
            NbtValue::Short(_) => Tag::Short,
            NbtValue::Int(_) => Tag::Int,
            NbtValue::Long(_) => Tag::Long,
            NbtValue::Float(_) => Tag::Float,
            NbtValue::Double(_) => Tag::Double,
            NbtValue::ByteArray(_) => Tag::ByteArray,
            NbtValue::String(_) => Tag::String,
            NbtValue::List(_) => Tag::List,
            NbtValue::Compound(_) => Tag::Compound,
            NbtValue::IntArray(_) => Tag::IntArray,
            NbtValue::LongArray(_) => Tag::LongArray,
        }
    }
}

macro_rules! collect_list {
    ($element:expr, $values:expr, $variant:ident) => {{
        let mut items = Vec::with_capacity($values.len());
        for value in $values {
            match value {
                NbtValue::$variant(item) => items.push(item),
                other => {
                    return Err(InvalidTagError::MixedList {
                        expected: $element,
                        found: other.tag(),
                    }
                    .into())
                }
            }
        }
        NbtList::$variant(items)
    }};
}

impl NbtList {
    /// Builds a list of `element`-typed payloads, rejecting mixed types.
    ///
    /// `Tag::End` is only accepted with no values and produces [`NbtList::Empty`].
    pub fn from_values(element: Tag, values: Vec<NbtValue>) -> Result<Self, NbtError> {
        check_sequence(values.len())?;
        for value in &values {
            validate_value(value)?;
        }
        Ok(match element {
            Tag::End => {
                if !values.is_empty() {
                    return Err(InvalidTagError::UnexpectedEnd.into());
                }
                NbtList::Empty
            }
            Tag::Byte => collect_list!(element, values, Byte),
            Tag::Short => collect_list!(element, values, Short),
            Tag::Int => collect_list!(element, values, Int),
            Tag::Long => collect_list!(element, values, Long),
            Tag::Float => collect_list!(element, values, Float),
            Tag::Double => collect_list!(element, values, Double),
            Tag::ByteArray => collect_list!(element, values, ByteArray),
            Tag::String => collect_list!(element, values, String),
            Tag::List => collect_list!(element, values, List),
            Tag::Compound => collect_list!(element, values, Compound),
            Tag::IntArray => collect_list!(element, values, IntArray),
            Tag::LongArray => collect_list!(element, values, LongArray),
        })
    }

    /// The declared element type.
    pub fn element_tag(&self) -> Tag {
        match self {
            NbtList::Empty => Tag::End,
            NbtList::Byte(_) => Tag::Byte,
            NbtList::Short(_) => Tag::Short,
            NbtList::Int(_) => Tag::Int,
            NbtList::Long(_) => Tag::Long,
            NbtList::Float(_) => Tag::Float,
            NbtList::Double(_) => Tag::Double,
            NbtList::ByteArray(_) => Tag::ByteArray,
            NbtList::String(_) => Tag::String,
            NbtList::List(_) => Tag::List,
            NbtList::Compound(_) => Tag::Compound,
            NbtList::IntArray(_) => Tag::IntArray,
            NbtList::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NbtList::Empty => 0,
            NbtList::Byte(items) => items.len(),
            NbtList::Short(items) => items.len(),
            NbtList::Int(items) => items.len(),
            NbtList::Long(items) => items.len(),
            NbtList::Float(items) => items.len(),
            NbtList::Double(items) => items.len(),
            NbtList::ByteArray(items) => items.len(),
            NbtList::String(items) => items.len(),
            NbtList::List(items) => items.len(),
            NbtList::Compound(items) => items.len(),
            NbtList::IntArray(items) => items.len(),
            NbtList::LongArray(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NbtCompound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a child under its own name, rejecting duplicates.
    pub fn insert(&mut self, tag: NbtTag) -> Result<(), NbtError> {
        if self.entries.contains_key(tag.name()) {
            return Err(NbtError::DuplicateCompoundKey(
                String::from_utf8_lossy(tag.name()).into_owned(),
            ));
        }
        self.entries.insert(tag.name().to_vec(), tag);
        Ok(())
    }

    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&NbtTag> {
        self.entries.get(name.as_ref())
    }

    /// Shorthand for `get(name)` followed by [`NbtTag::value`].
    pub fn get_value(&self, name: impl AsRef<[u8]>) -> Option<&NbtValue> {
        self.get(name).map(NbtTag::value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NbtTag> {
        self.entries.values()
    }
}

fn check_sequence(len: usize) -> Result<(), InvalidTagError> {
    if len > i32::MAX as usize {
        return Err(InvalidTagError::SequenceTooLong(len));
    }
    Ok(())
}

/// Walks a payload checking every length bound. Compound children were
/// validated when they were constructed, so recursion stops there.
fn validate_value(value: &NbtValue) -> Result<(), InvalidTagError> {
    match value {
        NbtValue::String(bytes) => {
            if bytes.len() > u16::MAX as usize {
                return Err(InvalidTagError::StringTooLong(bytes.len()));
            }
            Ok(())
        }
        NbtValue::ByteArray(items) => check_sequence(items.len()),
        NbtValue::IntArray(items) => check_sequence(items.len()),
        NbtValue::LongArray(items) => check_sequence(items.len()),
        NbtValue::List(list) => validate_list(list),
        _ => Ok(()),
    }
}

fn validate_list(list: &NbtList) -> Result<(), InvalidTagError> {
    check_sequence(list.len())?;
    match list {
        NbtList::ByteArray(items) => {
            for item in items {
                check_sequence(item.len())?;
            }
        }
        NbtList::String(items) => {
            for item in items {
                if item.len() > u16::MAX as usize {
                    return Err(InvalidTagError::StringTooLong(item.len()));
                }
            }
        }
        NbtList::List(items) => {
            for item in items {
                validate_list(item)?;
            }
        }
        NbtList::IntArray(items) => {
            for item in items {
                check_sequence(item.len())?;
            }
        }
        NbtList::LongArray(items) => {
            for item in items {
                check_sequence(item.len())?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_is_bounded() {
        assert!(NbtTag::new(vec![b'a'; 65535], NbtValue::Byte(0)).is_ok());
        let err = NbtTag::new(vec![b'a'; 65536], NbtValue::Byte(0)).unwrap_err();
        assert!(matches!(
            err,
            NbtError::InvalidTag(InvalidTagError::NameTooLong(65536))
        ));
    }

    #[test]
    fn string_length_is_bounded() {
        assert!(NbtTag::new("s", NbtValue::String(vec![0; 65535])).is_ok());
        let err = NbtTag::new("s", NbtValue::String(vec![0; 65536])).unwrap_err();
        assert!(matches!(
            err,
            NbtError::InvalidTag(InvalidTagError::StringTooLong(65536))
        ));
    }

    #[test]
    fn string_bound_applies_inside_lists() {
        let err = NbtTag::new(
            "l",
            NbtValue::List(NbtList::String(vec![vec![0; 65536]])),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NbtError::InvalidTag(InvalidTagError::StringTooLong(65536))
        ));
    }

    #[test]
    fn mixed_lists_are_rejected() {
        let err = NbtList::from_values(
            Tag::Int,
            vec![NbtValue::Int(1), NbtValue::Byte(2), NbtValue::Int(3)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NbtError::InvalidTag(InvalidTagError::MixedList {
                expected: Tag::Int,
                found: Tag::Byte,
            })
        ));
    }

    #[test]
    fn homogeneous_list_construction() {
        let list =
            NbtList::from_values(Tag::Int, vec![NbtValue::Int(1), NbtValue::Int(2)]).unwrap();
        assert_eq!(list, NbtList::Int(vec![1, 2]));
        assert_eq!(list.element_tag(), Tag::Int);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn end_lists_must_be_empty() {
        assert_eq!(
            NbtList::from_values(Tag::End, Vec::new()).unwrap(),
            NbtList::Empty
        );
        let err = NbtList::from_values(Tag::End, vec![NbtValue::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            NbtError::InvalidTag(InvalidTagError::UnexpectedEnd)
        ));
    }

    #[test]
    fn compound_rejects_duplicate_names() {
        let mut compound = NbtCompound::new();
        compound
            .insert(NbtTag::new("x", NbtValue::Int(1)).unwrap())
            .unwrap();
        let err = compound
            .insert(NbtTag::new("x", NbtValue::Int(2)).unwrap())
            .unwrap_err();
        assert!(matches!(err, NbtError::DuplicateCompoundKey(name) if name == "x"));
        assert_eq!(compound.len(), 1);
    }

    #[test]
    fn compound_preserves_insertion_order() {
        let mut compound = NbtCompound::new();
        for name in ["zebra", "apple", "mango"] {
            compound
                .insert(NbtTag::new(name, NbtValue::Byte(0)).unwrap())
                .unwrap();
        }
        let names: Vec<&[u8]> = compound.iter().map(NbtTag::name).collect();
        assert_eq!(names, [b"zebra".as_slice(), b"apple", b"mango"]);
        assert_eq!(
            compound.get_value("apple"),
            Some(&NbtValue::Byte(0))
        );
        assert!(compound.get("missing").is_none());
    }
}
