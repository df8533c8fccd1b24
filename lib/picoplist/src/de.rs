use crate::{
    error::{Error, Result},
    parser,
    value::Value,
};
use alloc::borrow::Cow;
use serde::{
    de::{DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor},
    forward_to_deserialize_any,
    Deserializer as SerdeDeserializer,
};

/// Parse a property list and deserialize its root value into `T`.
pub fn from_slice<T>(input: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let root = parser::parse_slice(input)?;
    from_value(&root)
}

pub fn from_str<T>(input: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let root = parser::parse(input)?;
    from_value(&root)
}

/// Deserialize `T` from an already-parsed value. Dictionary keys that `T` doesn't know about are skipped, so a
/// structure can pick the fields it wants out of a larger document.
pub fn from_value<T>(value: &Value<'_>) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

impl<'de, 'v, 'a> SerdeDeserializer<'de> for &'v Value<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Dict(dict) => visitor.visit_map(DictAccess { entries: dict.entries().iter(), value: None }),
            Value::Array(items) => visitor.visit_seq(ArrayAccess { items: items.iter() }),
            Value::String(s) => visitor.visit_str(s),
            Value::Integer(value) => visitor.visit_i64(*value),
            Value::Real(value) => visitor.visit_f64(*value),
            Value::Boolean(value) => visitor.visit_bool(*value),
            Value::Data(text) | Value::Date(text) => visitor.visit_str(text),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        // A key that is present always has a value; absent keys never reach us
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

struct DictAccess<'v, 'a> {
    entries: core::slice::Iter<'v, (Cow<'a, str>, Value<'a>)>,
    value: Option<&'v Value<'a>>,
}

impl<'de, 'v, 'a> MapAccess<'de> for DictAccess<'v, 'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let key: &str = key;
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(serde::de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct ArrayAccess<'v, 'a> {
    items: core::slice::Iter<'v, Value<'a>>,
}

impl<'de, 'v, 'a> SeqAccess<'de> for ArrayAccess<'v, 'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec, vec::Vec};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Boot {
        picker_attributes: u32,
        #[serde(default)]
        timeout: u32,
        picker_variant: Option<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Misc {
        boot: Boot,
        #[serde(default)]
        entries: Vec<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Config {
        misc: Misc,
    }

    #[test]
    fn nested_structs() {
        let config: Config = from_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>ACPI</key>
    <dict><key>Add</key><array/></dict>
    <key>Misc</key>
    <dict>
        <key>Boot</key>
        <dict>
            <key>PickerAttributes</key>
            <integer>145</integer>
            <key>PickerVariant</key>
            <string>Auto</string>
            <key>HideAuxiliary</key>
            <true/>
        </dict>
        <key>Entries</key>
        <array><string>a</string><string>b</string></array>
    </dict>
</dict>
</plist>"#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                misc: Misc {
                    boot: Boot { picker_attributes: 145, timeout: 0, picker_variant: Some(String::from("Auto")) },
                    entries: vec![String::from("a"), String::from("b")],
                }
            }
        );
    }

    #[test]
    fn type_mismatch() {
        assert!(from_str::<Boot>("<dict><key>PickerAttributes</key><string>lots</string></dict>").is_err());
        assert!(from_str::<Boot>("<dict><key>PickerAttributes</key><integer>-1</integer></dict>").is_err());
        assert!(from_str::<Boot>("<dict/>").is_err());
    }
}
