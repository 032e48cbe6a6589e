//! Human readable, depth-indented rendering of a tag tree, in the classic
//! `TAG_Type('name'): value` layout.
//!
//! Names and strings are rendered lossy-UTF-8 and are not escaped; callers
//! that need escaping should post-process.

use std::fmt::Display;

use crate::{NbtCompound, NbtList, NbtTag, NbtValue};

/// Renders a tag tree with the default indentation width of 4.
pub fn print(tag: &NbtTag) -> String {
    Printer::default().print(tag)
}

/// Pretty printer with a configurable indentation width.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    space: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self { space: 4 }
    }
}

impl Printer {
    pub fn new(space: usize) -> Self {
        Self { space }
    }

    pub fn print(&self, tag: &NbtTag) -> String {
        let mut out = String::new();
        self.write_tag(&mut out, tag, 0);
        out
    }

    fn pad(&self, out: &mut String, depth: usize) {
        for _ in 0..self.space * depth {
            out.push(' ');
        }
    }

    fn write_tag(&self, out: &mut String, tag: &NbtTag, depth: usize) {
        self.pad(out, depth);
        out.push_str(&format!(
            "{}('{}'): ",
            tag.value().tag().type_name(),
            String::from_utf8_lossy(tag.name())
        ));
        self.write_value(out, tag.value(), depth);
    }

    fn write_value(&self, out: &mut String, value: &NbtValue, depth: usize) {
        match value {
            NbtValue::Byte(v) => out.push_str(&v.to_string()),
            NbtValue::Short(v) => out.push_str(&v.to_string()),
            NbtValue::Int(v) => out.push_str(&v.to_string()),
            NbtValue::Long(v) => out.push_str(&v.to_string()),
            NbtValue::Float(v) => out.push_str(&v.to_string()),
            NbtValue::Double(v) => out.push_str(&v.to_string()),
            NbtValue::ByteArray(items) => out.push_str(&array_string(items)),
            NbtValue::String(bytes) => push_quoted(out, bytes),
            NbtValue::List(list) => self.write_list(out, list, depth),
            NbtValue::Compound(compound) => self.write_compound(out, compound, depth),
            NbtValue::IntArray(items) => out.push_str(&array_string(items)),
            NbtValue::LongArray(items) => out.push_str(&array_string(items)),
        }
    }

    fn open_entries(&self, out: &mut String, len: usize, depth: usize) {
        out.push_str(&format!("{len} entries\n"));
        self.pad(out, depth);
        out.push_str("{\n");
    }

    fn close_entries(&self, out: &mut String, depth: usize) {
        self.pad(out, depth);
        out.push('}');
    }

    fn write_compound(&self, out: &mut String, compound: &NbtCompound, depth: usize) {
        self.open_entries(out, compound.len(), depth);
        for child in compound.iter() {
            self.write_tag(out, child, depth + 1);
            out.push('\n');
        }
        self.close_entries(out, depth);
    }

    // List elements are unnamed payloads; each renders as a bare value line.
    fn write_list(&self, out: &mut String, list: &NbtList, depth: usize) {
        self.open_entries(out, list.len(), depth);
        match list {
            NbtList::Empty => {}
            NbtList::Byte(items) => self.scalar_lines(out, items, depth),
            NbtList::Short(items) => self.scalar_lines(out, items, depth),
            NbtList::Int(items) => self.scalar_lines(out, items, depth),
            NbtList::Long(items) => self.scalar_lines(out, items, depth),
            NbtList::Float(items) => self.scalar_lines(out, items, depth),
            NbtList::Double(items) => self.scalar_lines(out, items, depth),
            NbtList::ByteArray(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    out.push_str(&array_string(item));
                    out.push('\n');
                }
            }
            NbtList::String(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    push_quoted(out, item);
                    out.push('\n');
                }
            }
            NbtList::List(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    self.write_list(out, item, depth + 1);
                    out.push('\n');
                }
            }
            NbtList::Compound(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    self.write_compound(out, item, depth + 1);
                    out.push('\n');
                }
            }
            NbtList::IntArray(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    out.push_str(&array_string(item));
                    out.push('\n');
                }
            }
            NbtList::LongArray(items) => {
                for item in items {
                    self.pad(out, depth + 1);
                    out.push_str(&array_string(item));
                    out.push('\n');
                }
            }
        }
        self.close_entries(out, depth);
    }

    fn scalar_lines<T: Display>(&self, out: &mut String, items: &[T], depth: usize) {
        for item in items {
            self.pad(out, depth + 1);
            out.push_str(&item.to_string());
            out.push('\n');
        }
    }
}

fn push_quoted(out: &mut String, bytes: &[u8]) {
    out.push('\'');
    out.push_str(&String::from_utf8_lossy(bytes));
    out.push('\'');
}

fn array_string<T: Display>(items: &[T]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&item.to_string());
    }
    out.push(']');
    out
}
