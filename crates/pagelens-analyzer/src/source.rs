//! Token source: turns fetched page bytes into the typed token stream.
//!
//! The html5ever tokenizer does the actual lexing; this module adapts its
//! callback-style sink into the pull-based [`TokenStream`] the scan loop
//! consumes, and folds body read errors into the stream's terminal error.

use crate::token::{Tag, Token, TokenStream, TokenizeError};
use async_trait::async_trait;
use futures::StreamExt;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Doctype, Tag as H5Tag, TagKind, Token as H5Token, TokenSink, TokenSinkResult,
    Tokenizer, TokenizerOpts,
};
use pagelens_fetch::{BodyFetcher, FetchError};
use std::cell::RefCell;
use std::sync::Arc;

/// Capability handed to the orchestrator: open the token stream for a URL.
///
/// Opening fails only when the page itself cannot be retrieved; failures
/// while reading the body surface later, as the stream's terminal error.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch `url` and tokenize its body.
    async fn open(&self, url: &str) -> Result<TokenStream, FetchError>;
}

/// Production token source: fetch through a [`BodyFetcher`], then run the
/// html5ever tokenizer over the collected body.
pub struct HtmlTokenSource {
    fetcher: Arc<dyn BodyFetcher>,
}

impl HtmlTokenSource {
    /// Wrap a fetch capability.
    #[must_use]
    pub fn new(fetcher: Arc<dyn BodyFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl TokenSource for HtmlTokenSource {
    async fn open(&self, url: &str) -> Result<TokenStream, FetchError> {
        let mut body_stream = self.fetcher.fetch_body(url).await?;

        let mut body = Vec::new();
        let mut terminal = None;
        while let Some(chunk) = body_stream.next().await {
            match chunk {
                Ok(bytes) => body.extend_from_slice(&bytes),
                Err(err) => {
                    // Keep what already arrived; the failure becomes the
                    // stream's terminal error after those tokens.
                    terminal = Some(TokenizeError(err.to_string()));
                    break;
                }
            }
        }

        let html = String::from_utf8_lossy(&body);
        Ok(TokenStream::new(tokenize(&html), terminal))
    }
}

/// Run the html5ever tokenizer over a complete HTML fragment.
#[must_use]
pub fn tokenize(html: &str) -> Vec<Token> {
    let tokenizer = Tokenizer::new(Collector::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.tokens.take()
}

/// Sink that collects html5ever tokens into the engine's token model.
#[derive(Default)]
struct Collector {
    tokens: RefCell<Vec<Token>>,
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&self, token: H5Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            H5Token::TagToken(tag) => {
                let converted = convert_tag(tag);
                let result = raw_data_switch(&converted);
                self.tokens.borrow_mut().push(converted);
                result
            }
            H5Token::CharacterTokens(text) => {
                self.tokens.borrow_mut().push(Token::Text(text.to_string()));
                TokenSinkResult::Continue
            }
            H5Token::DoctypeToken(doctype) => {
                self.tokens
                    .borrow_mut()
                    .push(Token::Doctype(describe_doctype(&doctype)));
                TokenSinkResult::Continue
            }
            H5Token::CommentToken(_)
            | H5Token::NullCharacterToken
            | H5Token::EOFToken
            | H5Token::ParseError(_) => TokenSinkResult::Continue,
        }
    }
}

fn convert_tag(tag: H5Tag) -> Token {
    let H5Tag {
        kind,
        name,
        self_closing,
        attrs,
    } = tag;

    let attrs = attrs
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect();
    let tag = Tag::new(name.to_string(), attrs);

    match (kind, self_closing) {
        (TagKind::StartTag, false) => Token::StartTag(tag),
        (TagKind::StartTag, true) => Token::SelfClosingTag(tag),
        (TagKind::EndTag, _) => Token::EndTag(tag),
    }
}

/// Without a tree builder the tokenizer must be told which elements hold
/// raw (non-markup) content, exactly as the html5ever tree builder would.
fn raw_data_switch(token: &Token) -> TokenSinkResult<()> {
    let Token::StartTag(tag) = token else {
        return TokenSinkResult::Continue;
    };
    match tag.name.as_str() {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        _ => TokenSinkResult::Continue,
    }
}

/// Flatten a doctype declaration into the string the version classifier
/// inspects: name, public identifier, and system identifier joined by
/// spaces. `<!DOCTYPE html>` flattens to exactly `html`.
fn describe_doctype(doctype: &Doctype) -> String {
    [&doctype.name, &doctype.public_id, &doctype.system_id]
        .into_iter()
        .flatten()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
