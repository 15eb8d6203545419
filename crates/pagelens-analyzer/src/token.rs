//! Typed HTML token model consumed by the analysis engine.
//!
//! The engine never parses bytes itself: it consumes these tokens from a
//! [`TokenStream`](crate::token::TokenStream) produced by a
//! [`TokenSource`](crate::source::TokenSource).

use thiserror::Error;

/// One lexical unit of an HTML stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening tag, e.g. `<a href="/contact">`
    StartTag(Tag),
    /// A closing tag, e.g. `</form>`
    EndTag(Tag),
    /// A self-closed tag, e.g. `<input type="password"/>`
    SelfClosingTag(Tag),
    /// A run of character data
    Text(String),
    /// A doctype declaration, flattened to its classification string
    Doctype(String),
}

/// A tag name with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercase tag name
    pub name: String,
    /// Attribute `(name, value)` pairs, in the order they were written
    pub attrs: Vec<(String, String)>,
}

impl Tag {
    /// Build a tag from a name and attribute pairs.
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }

    /// The value of the first attribute called `name`, if any.
    ///
    /// Later duplicates of the same attribute are ignored by callers that
    /// only consult the first match (the login detector); callers that
    /// want every occurrence iterate [`Tag::attrs`] directly.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The token stream failed mid-scan (truncated transfer, undecodable
/// input). Facts emitted before the failure remain valid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("error tokenizing html: {0}")]
pub struct TokenizeError(pub String);

/// A finite stream of tokens for one page.
///
/// Normal end of input is plain iterator exhaustion. A genuine failure is
/// one final `Err` item after every token recovered from the partial body,
/// so consumers keep whatever facts were determined before the failure.
#[derive(Debug)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    terminal: Option<TokenizeError>,
}

impl TokenStream {
    /// Stream over `tokens`, optionally terminated by `terminal`.
    #[must_use]
    pub fn new(tokens: Vec<Token>, terminal: Option<TokenizeError>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            terminal,
        }
    }

    /// A well-formed stream ending in normal exhaustion.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::new(tokens, None)
    }
}

impl Iterator for TokenStream {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.tokens.next() {
            Some(token) => Some(Ok(token)),
            None => self.terminal.take().map(Err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attribute_wins() {
        let tag = Tag::new(
            "input",
            vec![
                ("type".to_string(), "password".to_string()),
                ("type".to_string(), "text".to_string()),
            ],
        );
        assert_eq!(tag.attr("type"), Some("password"));
        assert_eq!(tag.attr("name"), None);
    }

    #[test]
    fn test_stream_ends_cleanly() {
        let mut stream = TokenStream::from_tokens(vec![Token::Text("hi".to_string())]);
        assert_eq!(stream.next(), Some(Ok(Token::Text("hi".to_string()))));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_stream_yields_terminal_error_once() {
        let mut stream = TokenStream::new(
            vec![Token::Doctype("html".to_string())],
            Some(TokenizeError("truncated".to_string())),
        );
        assert_eq!(stream.next(), Some(Ok(Token::Doctype("html".to_string()))));
        assert!(matches!(stream.next(), Some(Err(_))));
        assert_eq!(stream.next(), None);
    }
}
