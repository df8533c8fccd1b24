use crate::{Error, ErrorKind};
use core::ops::Range;
use logos::Logos;

pub type Lexer<'a> = logos::Lexer<'a, Token>;

/// The markup we need to recognise in a property list. We don't try to be a general XML lexer: anything that isn't
/// a tag is treated as character data, and the parser decides whether it's allowed where it appears.
#[derive(Logos, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `<?xml version="1.0" encoding="UTF-8"?>`
    #[regex(r"<\?[^>]*>")]
    Declaration,

    /// `<!DOCTYPE ...>`
    #[regex(r"<![A-Za-z][^>]*>")]
    Markup,

    /// `<!-- ... -->`. The body may contain `>`.
    #[token("<!--", |lex| skip_past(lex, "-->"))]
    Comment,

    /// `<![CDATA[ ... ]]>`, whose body is character data that is not decoded.
    #[token("<![CDATA[", |lex| skip_past(lex, "]]>"))]
    CData,

    /// `<key>`, `<plist version="1.0">` or an empty element such as `<true/>`
    #[regex(r"<[A-Za-z][^>]*>")]
    StartTag,

    #[regex(r"</[A-Za-z][^>]*>")]
    EndTag,

    #[regex(r"[^<]+")]
    Text,
}

/// Extend the current token up to and including `terminator`. Fails if the document ends first.
fn skip_past(lex: &mut Lexer<'_>, terminator: &str) -> bool {
    match lex.remainder().find(terminator) {
        Some(end) => {
            lex.bump(end + terminator.len());
            true
        }
        None => false,
    }
}

/// The text inside a `CData` token.
pub fn cdata_content(slice: &str) -> &str {
    slice.strip_prefix("<![CDATA[").and_then(|inner| inner.strip_suffix("]]>")).unwrap_or("")
}

pub fn lex(input: &str) -> Lexer<'_> {
    Token::lexer(input)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenItem {
    pub token: Token,
    pub range: Range<usize>,
}

impl TokenItem {
    pub fn new(token: Token, range: Range<usize>) -> TokenItem {
        TokenItem { token, range }
    }
}

/// A lexer that can look one token ahead. The parser never needs more than that.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    peeked: Option<TokenItem>,
}

impl<'a> TokenStream<'a> {
    pub fn new(input: &'a str) -> TokenStream<'a> {
        TokenStream { lexer: lex(input), peeked: None }
    }

    pub fn input(&self) -> &'a str {
        self.lexer.source()
    }

    pub fn peek(&mut self) -> Result<Option<&TokenItem>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.as_ref())
    }

    pub fn next(&mut self) -> Result<Option<TokenItem>, Error> {
        match self.peeked.take() {
            Some(item) => Ok(Some(item)),
            None => self.advance(),
        }
    }

    fn advance(&mut self) -> Result<Option<TokenItem>, Error> {
        match self.lexer.next() {
            Some(Ok(token)) => Ok(Some(TokenItem::new(token, self.lexer.span()))),
            Some(Err(())) => Err(Error::new(self.lexer.span(), ErrorKind::FailedToLex)),
            None => Ok(None),
        }
    }
}

/// The interesting parts of a start or end tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    /// Set for elements written as `<name/>`, which have no content and no matching end tag.
    pub empty: bool,
}

impl<'a> Tag<'a> {
    /// Pull the element name out of a `StartTag` or `EndTag` slice. Attributes are ignored.
    pub fn from_slice(slice: &'a str) -> Tag<'a> {
        let inner = slice.trim_start_matches('<').trim_start_matches('/').trim_end_matches('>');
        let empty = inner.ends_with('/');
        let name_end = inner.find(|c: char| c.is_ascii_whitespace() || c == '/').unwrap_or(inner.len());
        Tag { name: &inner[..name_end], empty }
    }
}
