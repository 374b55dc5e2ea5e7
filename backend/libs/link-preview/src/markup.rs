//! Lenient streaming tokenizer for HTML markup
//!
//! This is not a DOM parser. It yields start tags, end tags, text, comments
//! and doctypes in document order, which is all the metadata scan needs.
//! Malformed input never panics: a tag left open at end of input simply ends
//! the stream. Character references are decoded with `html_escape`, which
//! covers the full HTML5 named entity table.

use html_escape::decode_html_entities;
use std::borrow::Cow;

/// A start tag with lower-cased name and attribute keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag<'a> {
    pub name: String,
    pub attrs: Vec<(String, Cow<'a, str>)>,
    pub self_closing: bool,
}

impl<'a> Tag<'a> {
    #[cfg(test)]
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }
}

/// Payloads the metadata scan skips are kept for debugging and tests
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    StartTag(Tag<'a>),
    EndTag(String),
    Text(Cow<'a, str>),
    Comment(&'a str),
    Doctype(&'a str),
}

/// Elements whose content is read verbatim up to the matching end tag.
/// The flag marks escapable raw text (entities are decoded).
fn raw_text_mode(name: &str) -> Option<(&'static str, bool)> {
    match name {
        "title" => Some(("title", true)),
        "textarea" => Some(("textarea", true)),
        "script" => Some(("script", false)),
        "style" => Some(("style", false)),
        _ => None,
    }
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw: Option<(&'static str, bool)>,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        let bytes = self.bytes();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    fn find_byte(&self, from: usize, needle: u8) -> Option<usize> {
        self.bytes()[from.min(self.input.len())..]
            .iter()
            .position(|&b| b == needle)
            .map(|p| p + from)
    }

    /// Next `<` that opens a tag, comment or declaration
    fn find_tag_open(&self, from: usize) -> usize {
        let bytes = self.bytes();
        let mut i = from;
        while let Some(lt) = self.find_byte(i, b'<') {
            match bytes.get(lt + 1).copied() {
                Some(c) if c.is_ascii_alphabetic() || matches!(c, b'/' | b'!' | b'?') => {
                    return lt
                }
                _ => i = lt + 1,
            }
        }
        bytes.len()
    }

    /// Start of `</name` (case-insensitive) closing a raw text element
    fn find_raw_end(&self, name: &str) -> usize {
        let bytes = self.bytes();
        let mut i = self.pos;
        while let Some(lt) = self.find_byte(i, b'<') {
            let name_start = lt + 2;
            let name_end = name_start + name.len();
            if bytes.get(lt + 1) == Some(&b'/')
                && name_end <= bytes.len()
                && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
                && bytes
                    .get(name_end)
                    .map_or(true, |&c| c.is_ascii_whitespace() || matches!(c, b'/' | b'>'))
            {
                return lt;
            }
            i = lt + 1;
        }
        bytes.len()
    }

    fn read_text(&mut self) -> Token<'a> {
        let input = self.input;
        let start = self.pos;
        // A '<' at the current position did not open a tag, so it is text
        let end = self.find_tag_open(start + 1);
        self.pos = end;
        Token::Text(decode_html_entities(&input[start..end]))
    }

    fn read_comment_like(&mut self) -> Token<'a> {
        let input = self.input;
        let rest = &input[self.pos..];
        if rest.starts_with("<!--") {
            let body_start = self.pos + 4;
            return match input[body_start..].find("-->") {
                Some(end) => {
                    self.pos = body_start + end + 3;
                    Token::Comment(&input[body_start..body_start + end])
                }
                None => {
                    self.pos = input.len();
                    Token::Comment(&input[body_start..])
                }
            };
        }

        let is_doctype =
            rest.len() >= 9 && rest.as_bytes()[..9].eq_ignore_ascii_case(b"<!doctype");
        let body_start = self.pos + 2;
        let body = match self.find_byte(body_start, b'>') {
            Some(gt) => {
                self.pos = gt + 1;
                &input[body_start..gt]
            }
            None => {
                self.pos = input.len();
                &input[body_start..]
            }
        };

        if is_doctype {
            Token::Doctype(body)
        } else {
            Token::Comment(body)
        }
    }

    fn read_end_tag(&mut self) -> Option<Token<'a>> {
        let bytes = self.bytes();
        let name_start = self.pos + 2;
        let mut i = name_start;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'/' | b'>')
        {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        match self.find_byte(i, b'>') {
            Some(gt) => {
                self.pos = gt + 1;
                Some(Token::EndTag(name))
            }
            None => {
                self.pos = self.input.len();
                None
            }
        }
    }

    fn read_start_tag(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let bytes = self.bytes();
        let len = bytes.len();

        let name_start = self.pos + 1;
        let mut i = name_start;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'/' | b'>') {
            i += 1;
        }
        let name = input[name_start..i].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            i = self.skip_whitespace(i);
            if i >= len {
                self.pos = len;
                return None;
            }
            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'>') {
                        self_closing = true;
                        i += 1;
                        break;
                    }
                    continue;
                }
                _ => {}
            }

            let key_start = i;
            i += 1;
            while i < len
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            let key = input[key_start..i].to_ascii_lowercase();

            i = self.skip_whitespace(i);
            let mut value = Cow::Borrowed("");
            if i < len && bytes[i] == b'=' {
                i = self.skip_whitespace(i + 1);
                if i >= len {
                    self.pos = len;
                    return None;
                }
                match bytes[i] {
                    quote @ (b'"' | b'\'') => {
                        let value_start = i + 1;
                        let Some(value_end) = self.find_byte(value_start, quote) else {
                            self.pos = len;
                            return None;
                        };
                        value = decode_html_entities(&input[value_start..value_end]);
                        i = value_end + 1;
                    }
                    _ => {
                        let value_start = i;
                        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = decode_html_entities(&input[value_start..i]);
                    }
                }
            }
            attrs.push((key, value));
        }

        self.pos = i;
        if !self_closing {
            self.raw = raw_text_mode(&name);
        }

        Some(Token::StartTag(Tag {
            name,
            attrs,
            self_closing,
        }))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        if let Some((name, escapable)) = self.raw.take() {
            let end = self.find_raw_end(name);
            let text = &input[self.pos..end];
            self.pos = end;
            if !text.is_empty() {
                return Some(Token::Text(if escapable {
                    decode_html_entities(text)
                } else {
                    Cow::Borrowed(text)
                }));
            }
        }

        if self.pos >= self.input.len() {
            return None;
        }

        let bytes = self.bytes();
        if bytes[self.pos] == b'<' {
            match bytes.get(self.pos + 1).copied() {
                Some(b'!') | Some(b'?') => return Some(self.read_comment_like()),
                Some(b'/') => {
                    if bytes.get(self.pos + 2).is_some_and(|c| c.is_ascii_alphabetic()) {
                        return self.read_end_tag();
                    }
                    return Some(self.read_comment_like());
                }
                Some(c) if c.is_ascii_alphabetic() => return self.read_start_tag(),
                _ => {}
            }
        }

        Some(self.read_text())
    }
}
