use crate::{
    error::{Error, ErrorKind, Expected, Result},
    lexer::{cdata_content, Tag, Token, TokenItem, TokenStream},
    value::{Dict, Value},
};
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::ops::Range;

/// How deeply containers may be nested before we give up on a document. Property lists read at boot are flat, and
/// this bounds our stack usage on hostile input.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parse a property list from raw bytes. The document must be UTF-8 (or plain ASCII), and may start with a byte
/// order mark.
pub fn parse_slice(input: &[u8]) -> Result<Value<'_>> {
    match core::str::from_utf8(input) {
        // Files read off disk are often NUL-terminated
        Ok(s) => parse(s.trim_end_matches('\0')),
        Err(err) => Err(Error::new(err.valid_up_to()..input.len(), ErrorKind::InvalidUtf8)),
    }
}

/// Parse a property list, returning its root value. If the root element is `<plist>`, the value it contains is
/// returned; a bare root value is accepted as well.
pub fn parse(input: &str) -> Result<Value<'_>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut parser = Parser { tokens: TokenStream::new(input), depth: 0 };

    let (item, tag) = parser.next_start_tag(Expected::Element)?;
    let root = if tag.name == "plist" {
        if tag.empty {
            return Err(Error::new(item.range, ErrorKind::EmptyDocument));
        }

        if !parser.at_start_tag()? {
            return Err(Error::new(item.range, ErrorKind::EmptyDocument));
        }
        let (item, tag) = parser.next_start_tag(Expected::Element)?;
        let root = parser.parse_value(item, tag)?;
        parser.expect_end_tag("plist")?;
        root
    } else {
        parser.parse_value(item, tag)?
    };

    parser.expect_end_of_document()?;
    Ok(root)
}

struct Parser<'a> {
    tokens: TokenStream<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn input(&self) -> &'a str {
        self.tokens.input()
    }

    fn slice(&self, item: &TokenItem) -> &'a str {
        &self.input()[item.range.clone()]
    }

    fn missing(&self) -> Error {
        Error::end(self.input(), ErrorKind::MissingToken)
    }

    /// Skip over anything that can appear between elements: whitespace, the XML declaration, the doctype, and
    /// comments.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            let skip = match self.tokens.peek()?.cloned() {
                Some(item) => match item.token {
                    Token::Declaration | Token::Markup | Token::Comment => true,
                    Token::Text => self.slice(&item).trim().is_empty(),
                    Token::StartTag | Token::EndTag | Token::CData => false,
                },
                None => false,
            };

            if !skip {
                return Ok(());
            }
            self.tokens.next()?;
        }
    }

    /// Whether the next meaningful token is a start tag. Doesn't consume it.
    fn at_start_tag(&mut self) -> Result<bool> {
        self.skip_misc()?;
        Ok(matches!(self.tokens.peek()?, Some(item) if item.token == Token::StartTag))
    }

    fn next_start_tag(&mut self, expected: Expected) -> Result<(TokenItem, Tag<'a>)> {
        self.skip_misc()?;
        match self.tokens.next()? {
            Some(item) if item.token == Token::StartTag => {
                let tag = Tag::from_slice(self.slice(&item));
                Ok((item, tag))
            }
            Some(item) => Err(Error::new(item.range, ErrorKind::UnexpectedToken(item.token, expected))),
            None => Err(self.missing()),
        }
    }

    fn expect_end_tag(&mut self, name: &str) -> Result<()> {
        self.skip_misc()?;
        match self.tokens.next()? {
            Some(item) if item.token == Token::EndTag => {
                if Tag::from_slice(self.slice(&item)).name == name {
                    Ok(())
                } else {
                    Err(Error::new(item.range, ErrorKind::MismatchedEndTag))
                }
            }
            Some(item) => Err(Error::new(item.range, ErrorKind::UnexpectedToken(item.token, Expected::EndTag))),
            None => Err(self.missing()),
        }
    }

    fn expect_end_of_document(&mut self) -> Result<()> {
        self.skip_misc()?;
        match self.tokens.next()? {
            Some(item) => Err(Error::new(item.range, ErrorKind::TrailingContent)),
            None => Ok(()),
        }
    }

    /// Read the character data of a simple element such as `<string>`, consuming its end tag. Entities are
    /// decoded, CDATA sections are kept as written, and comments are dropped. Also returns where the content sits
    /// in the input.
    fn element_text(&mut self, tag: Tag<'a>, start: usize) -> Result<(Cow<'a, str>, Range<usize>)> {
        let mut text = Cow::Borrowed("");
        if tag.empty {
            return Ok((text, start..start));
        }

        let mut end = start;
        loop {
            let item = self.tokens.next()?.ok_or_else(|| self.missing())?;
            let piece = match item.token {
                Token::Text => decode_entities(self.slice(&item), item.range.start)?,
                Token::CData => Cow::Borrowed(cdata_content(self.slice(&item))),
                Token::Comment => Cow::Borrowed(""),
                Token::EndTag => {
                    if Tag::from_slice(self.slice(&item)).name != tag.name {
                        return Err(Error::new(item.range, ErrorKind::MismatchedEndTag));
                    }
                    return Ok((text, start..end));
                }
                token => return Err(Error::new(item.range, ErrorKind::UnexpectedToken(token, Expected::Text))),
            };

            end = item.range.end;
            if text.is_empty() {
                text = piece;
            } else if !piece.is_empty() {
                text.to_mut().push_str(&piece);
            }
        }
    }

    fn parse_value(&mut self, item: TokenItem, tag: Tag<'a>) -> Result<Value<'a>> {
        match tag.name {
            "dict" => self.nested(&item, |parser| parser.parse_dict(tag)),
            "array" => self.nested(&item, |parser| parser.parse_array(tag)),
            "string" => Ok(Value::String(self.element_text(tag, item.range.end)?.0)),
            "integer" => {
                let (text, range) = self.element_text(tag, item.range.end)?;
                parse_integer(text.trim())
                    .map(Value::Integer)
                    .map_err(|err| Error::new(range, ErrorKind::InvalidInteger(err)))
            }
            "real" => {
                let (text, range) = self.element_text(tag, item.range.end)?;
                text.trim()
                    .parse::<f64>()
                    .map(Value::Real)
                    .map_err(|err| Error::new(range, ErrorKind::InvalidReal(err)))
            }
            "true" | "false" => {
                let (text, range) = self.element_text(tag, item.range.end)?;
                if !text.trim().is_empty() {
                    return Err(Error::new(range, ErrorKind::UnexpectedToken(Token::Text, Expected::EndTag)));
                }
                Ok(Value::Boolean(tag.name == "true"))
            }
            "data" => Ok(Value::Data(trim(self.element_text(tag, item.range.end)?.0))),
            "date" => Ok(Value::Date(trim(self.element_text(tag, item.range.end)?.0))),
            _ => Err(Error::new(item.range, ErrorKind::UnknownElement)),
        }
    }

    fn nested<F>(&mut self, item: &TokenItem, f: F) -> Result<Value<'a>>
    where
        F: FnOnce(&mut Self) -> Result<Value<'a>>,
    {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(item.range.clone(), ErrorKind::NestingTooDeep));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_dict(&mut self, tag: Tag<'a>) -> Result<Value<'a>> {
        let mut dict = Dict::new();
        if tag.empty {
            return Ok(Value::Dict(dict));
        }

        while self.at_start_tag()? {
            let (key_item, key_tag) = self.next_start_tag(Expected::Key)?;
            if key_tag.name != "key" {
                return Err(Error::new(key_item.range, ErrorKind::UnexpectedToken(Token::StartTag, Expected::Key)));
            }
            let (key, _) = self.element_text(key_tag, key_item.range.end)?;

            let (value_item, value_tag) = self.next_start_tag(Expected::Element)?;
            let value = self.parse_value(value_item, value_tag)?;
            dict.insert(key, value);
        }

        self.expect_end_tag("dict")?;
        Ok(Value::Dict(dict))
    }

    fn parse_array(&mut self, tag: Tag<'a>) -> Result<Value<'a>> {
        let mut items = Vec::new();
        if tag.empty {
            return Ok(Value::Array(items));
        }

        while self.at_start_tag()? {
            let (item, tag) = self.next_start_tag(Expected::Element)?;
            items.push(self.parse_value(item, tag)?);
        }

        self.expect_end_tag("array")?;
        Ok(Value::Array(items))
    }
}

fn trim(text: Cow<'_, str>) -> Cow<'_, str> {
    match text {
        Cow::Borrowed(text) => Cow::Borrowed(text.trim()),
        Cow::Owned(text) => Cow::Owned(String::from(text.trim())),
    }
}

/// Parse the content of an `<integer>` element. Hexadecimal values (`0x...`) are accepted, as are negative
/// numbers.
fn parse_integer(text: &str) -> core::result::Result<i64, core::num::ParseIntError> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16)? as i64,
        None => digits.parse::<i64>()?,
    };

    Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

/// Replace the predefined XML entities and numeric character references. Text without any `&` is borrowed
/// untouched.
fn decode_entities(text: &str, offset: usize) -> Result<Cow<'_, str>> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let entity_start = offset + (text.len() - rest.len()) + start;
        let error = || Error::new(entity_start..(offset + text.len()), ErrorKind::InvalidEntity);

        let end = rest[start..].find(';').ok_or_else(error)?;
        let entity = &rest[(start + 1)..(start + end)];
        let c = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(decimal) = entity.strip_prefix('#') {
                    decimal.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32).ok_or_else(error)?
            }
        };

        decoded.push(c);
        rest = &rest[(start + end + 1)..];
    }
    decoded.push_str(rest);

    Ok(Cow::Owned(decoded))
}
