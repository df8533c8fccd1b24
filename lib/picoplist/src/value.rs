use alloc::{borrow::Cow, vec::Vec};

/// A node of a parsed property list. Strings borrow from the input document unless they contained character
/// entities that had to be decoded.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Dict(Dict<'a>),
    Array(Vec<Value<'a>>),
    String(Cow<'a, str>),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// The base64 text of a `<data>` element. It is not decoded.
    Data(Cow<'a, str>),
    Date(Cow<'a, str>),
}

impl<'a> Value<'a> {
    pub fn as_dict(&self) -> Option<&Dict<'a>> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

/// A `<dict>`. Entries are kept in document order, and lookups are linear - property lists we read at boot are
/// small enough that this doesn't matter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dict<'a> {
    entries: Vec<(Cow<'a, str>, Value<'a>)>,
}

impl<'a> Dict<'a> {
    pub fn new() -> Dict<'a> {
        Dict { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: Cow<'a, str>, value: Value<'a>) {
        self.entries.push((key, value));
    }

    /// Find the first entry with the given key. Later duplicates are ignored.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.entries.iter().find(|(k, _)| k.as_ref() == key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'a>)> {
        self.entries.iter().map(|(key, value)| (key.as_ref(), value))
    }

    pub(crate) fn entries(&self) -> &[(Cow<'a, str>, Value<'a>)] {
        &self.entries
    }
}
