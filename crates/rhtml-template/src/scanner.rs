//! Template Scanner
//!
//! Drives html5ever's tokenizer with a sink that tracks the managed
//! element currently open and records its bindings.
//!
//! Only one managed node is tracked at a time. Any end tag, or any
//! unmanaged start tag, clears it, so text inside a nested element does
//! not bind to the enclosing managed node.
//!
//! Input is fed in chunks ending at each `>`, so a tag token always ends at
//! the current chunk end and its source can be located for re-reading.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::placeholder::{binding_expr, node_name, placeholder_expr};
use crate::raw_attrs::{find_start_tag, last_wins_tag};
use crate::{AttrBinding, ScanError, TemplateScan};

/// Scanner options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Treat every tokenizer parse error as malformed markup
    pub strict: bool,
}

/// Template binding scanner
#[derive(Debug, Clone, Default)]
pub struct TemplateScanner {
    options: ScanOptions,
}

impl TemplateScanner {
    /// Create a scanner with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with explicit options
    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Scan a template for managed nodes and their bindings
    pub fn scan(&self, html: &str) -> Result<TemplateScan, ScanError> {
        tracing::debug!("Scanning template ({} bytes)", html.len());

        let sink = BindingSink::new(html, self.options);
        let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let input = BufferQueue::default();
        let mut offset = 0;
        for chunk in html.split_inclusive('>') {
            offset += chunk.len();
            tokenizer.sink.chunk_end.set(offset);
            input.push_back(StrTendril::from_slice(chunk));
            let _ = tokenizer.feed(&input);
        }
        tokenizer.end();

        let scan = tokenizer.sink.finish()?;
        tracing::debug!(
            "Found {} managed nodes, {} attribute bindings, {} child bindings",
            scan.nodes.len(),
            scan.attrs.values().map(Vec::len).sum::<usize>(),
            scan.children.len(),
        );
        Ok(scan)
    }
}

/// Check whether a tokenizer error means the input ended inside a construct
fn is_eof_error(message: &str) -> bool {
    message.starts_with("Saw EOF") || message == "Unexpected EOF"
}

/// Token sink collecting bindings for one scan
struct BindingSink<'a> {
    source: &'a str,
    options: ScanOptions,
    /// Source offset just past the chunk being tokenized
    chunk_end: Cell<usize>,
    state: RefCell<ScanState>,
}

#[derive(Default)]
struct ScanState {
    scan: TemplateScan,
    current: Option<String>,
    text: String,
    error: Option<ScanError>,
    /// Source offset where the last tag, comment or doctype ended
    boundary: usize,
    /// A parse error arrived since `boundary`; the next start tag is re-read
    reread: bool,
}

impl<'a> BindingSink<'a> {
    fn new(source: &'a str, options: ScanOptions) -> Self {
        Self {
            source,
            options,
            chunk_end: Cell::new(0),
            state: RefCell::new(ScanState::default()),
        }
    }

    fn finish(&self) -> Result<TemplateScan, ScanError> {
        let state = self.state.take();
        match state.error {
            Some(err) => Err(err),
            None => Ok(state.scan),
        }
    }

    fn parse_error(&self, state: &mut ScanState, message: Cow<'static, str>, line: u64) {
        state.reread = true;
        if self.options.strict || is_eof_error(&message) {
            state.error = Some(ScanError::MalformedMarkup {
                line,
                message: message.into_owned(),
            });
        } else {
            tracing::warn!("Template parse error at line {}: {}", line, message);
        }
    }

    /// Replace the tokenizer's attributes with a last-value-wins reading of the tag source
    fn reread_attrs(&self, tag: &mut Tag, from: usize) {
        let end = self.chunk_end.get();
        let Some(start) = find_start_tag(self.source, from, end) else {
            return;
        };
        if let Some(reread) = tokenize_tag(&last_wins_tag(&self.source[start..end])) {
            tracing::trace!("Re-read attributes of <{}>", &*tag.name);
            tag.attrs = reread.attrs;
        }
    }
}

impl TokenSink for BindingSink<'_> {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        // Nothing past the first fatal error is recorded
        if state.error.is_some() {
            return TokenSinkResult::Continue;
        }

        match token {
            Token::CharacterTokens(chars) => state.text.push_str(&chars),
            Token::NullCharacterToken => state.text.push('\0'),
            Token::TagToken(mut tag) => {
                state.flush_text();
                if state.reread && matches!(tag.kind, TagKind::StartTag) {
                    self.reread_attrs(&mut tag, state.boundary);
                }
                state.boundary = self.chunk_end.get();
                state.reread = false;
                return state.handle_tag(&tag);
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) => {
                state.flush_text();
                state.boundary = self.chunk_end.get();
                state.reread = false;
            }
            Token::EOFToken => state.flush_text(),
            Token::ParseError(message) => self.parse_error(&mut state, message, line_number),
        }
        TokenSinkResult::Continue
    }
}

/// Sink keeping the first tag of a re-read fragment
#[derive(Default)]
struct TagCollector {
    tag: RefCell<Option<Tag>>,
}

impl TokenSink for TagCollector {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if let Token::TagToken(tag) = token {
            let mut slot = self.tag.borrow_mut();
            if slot.is_none() {
                *slot = Some(tag);
            }
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize a single start tag, decoding its attribute values
fn tokenize_tag(source: &str) -> Option<Tag> {
    let tokenizer = Tokenizer::new(TagCollector::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(source));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.tag.take()
}

impl ScanState {
    fn handle_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        match tag.kind {
            TagKind::StartTag => {
                self.start_tag(tag);
                if tag.self_closing {
                    self.end_tag();
                    return TokenSinkResult::Continue;
                }
                raw_content(&tag.name)
            }
            TagKind::EndTag => {
                self.end_tag();
                TokenSinkResult::Continue
            }
        }
    }

    fn start_tag(&mut self, tag: &Tag) {
        self.current = None;

        // html5ever already dropped duplicate attributes, keeping the first
        let dom_id = tag
            .attrs
            .iter()
            .find(|attr| &*attr.name.local == "id")
            .map(|attr| &*attr.value);
        let Some(node) = dom_id.and_then(node_name) else {
            return;
        };

        tracing::trace!("Managed node '{}' <{}>", node, &*tag.name);
        self.current = Some(node.to_string());
        self.scan.nodes.push(node.to_string());

        for attr in tag.attrs.iter().filter(|attr| &*attr.name.local != "id") {
            let Some(expr) = binding_expr(&attr.value) else {
                continue;
            };
            tracing::trace!("Attribute binding {}.{} = {}", node, &*attr.name.local, expr);
            self.scan
                .attrs
                .entry(node.to_string())
                .or_default()
                .push(AttrBinding::new(&*attr.name.local, expr));
        }
    }

    fn end_tag(&mut self) {
        self.current = None;
    }

    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.text);
        let Some(node) = self.current.as_deref().filter(|node| !node.is_empty()) else {
            return;
        };
        if let Some(expr) = placeholder_expr(&text) {
            tracing::trace!("Child binding {} = {}", node, expr);
            self.scan.children.insert(node.to_string(), expr.to_string());
        }
    }
}

/// Tokenizer state for elements whose content is not markup
fn raw_content(name: &str) -> TokenSinkResult<()> {
    match name {
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_basic_binding() {
        let scan = TemplateScanner::new()
            .scan(r#"<div id="box-${id}" title="${foo}">${bar}</div>"#)
            .unwrap();
        assert_eq!(scan.nodes, vec!["box"]);
        assert_eq!(scan.attrs["box"], vec![AttrBinding::new("title", "foo")]);
        assert_eq!(scan.children["box"], "bar");
    }

    #[test]
    fn test_text_split_by_char_refs_is_one_run() {
        let scan = TemplateScanner::new()
            .scan(r#"<p id="p-${id}">${a &amp; b}</p>"#)
            .unwrap();
        assert_eq!(scan.children["p"], "a & b");
    }

    #[test]
    fn test_empty_node_name_keeps_attrs_only() {
        let scan = TemplateScanner::new()
            .scan(r#"<div id="-${id}" title="${foo}">${bar}</div>"#)
            .unwrap();
        assert_eq!(scan.attrs[""], vec![AttrBinding::new("title", "foo")]);
        assert!(scan.children.is_empty());
    }

    #[test]
    fn test_unterminated_tag_is_malformed() {
        let err = TemplateScanner::new()
            .scan(r#"<div id="box-${id}" title="${foo}"#)
            .unwrap_err();
        assert!(matches!(err, ScanError::MalformedMarkup { .. }));
    }

    #[test]
    fn test_unterminated_comment_is_malformed() {
        let err = TemplateScanner::new()
            .scan("<div id=\"box-${id}\">x</div><!-- never closed")
            .unwrap_err();
        assert!(matches!(err, ScanError::MalformedMarkup { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let scan = TemplateScanner::new()
            .scan(r#"<div id="box-${id}" title="literal" title="${foo}">x</div>"#)
            .unwrap();
        assert_eq!(scan.attrs["box"], vec![AttrBinding::new("title", "foo")]);

        let scan = TemplateScanner::new()
            .scan(r#"<div id="box-${id}" title="${a}" title="static"></div>"#)
            .unwrap();
        assert_eq!(scan.nodes, vec!["box"]);
        assert!(scan.attrs.is_empty());
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let scan = TemplateScanner::new()
            .scan(r#"<div id="plain" id="box-${id}" title="${foo}">${bar}</div>"#)
            .unwrap();
        assert_eq!(scan.nodes, vec!["box"]);
        assert_eq!(scan.attrs["box"], vec![AttrBinding::new("title", "foo")]);
        assert_eq!(scan.children["box"], "bar");

        let scan = TemplateScanner::new()
            .scan(r#"<div id="box-${id}" id="plain" title="${foo}">${bar}</div>"#)
            .unwrap();
        assert!(scan.nodes.is_empty());
    }

    #[test]
    fn test_strict_rejects_duplicate_attributes() {
        let html = r#"<div id="box-${id}" title="${a}" title="${b}"></div>"#;
        let strict = TemplateScanner::with_options(ScanOptions { strict: true });
        assert!(matches!(
            strict.scan(html),
            Err(ScanError::MalformedMarkup { line: 1, .. })
        ));
    }
}
