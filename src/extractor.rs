use crate::models::PageFacts;
use futures::{Stream, StreamExt};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Doctype, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use std::cell::RefCell;
use std::fmt::Display;
use std::fmt::Write;

/// Where the extractor is in honoring the first `<title>`
#[derive(Debug, Default)]
enum TitleState {
    #[default]
    Unseen,
    /// `<title>` was the previous token, text may follow
    Awaiting,
    /// Collecting adjacent character tokens into one text token
    Capturing(String),
    Done,
}

#[derive(Debug, Default)]
struct SinkState {
    facts: PageFacts,
    title: TitleState,
    doctype_seen: bool,
}

impl SinkState {
    fn push_text(&mut self, text: &str) {
        if let TitleState::Capturing(buffer) = &mut self.title {
            buffer.push_str(text);
        } else if matches!(self.title, TitleState::Awaiting) {
            self.title = TitleState::Capturing(text.to_string());
        }
    }

    /// Ends any pending text token before a non-text token is handled
    fn close_text(&mut self) {
        match std::mem::take(&mut self.title) {
            TitleState::Capturing(text) => {
                self.facts.title = text;
                self.title = TitleState::Done;
            }
            TitleState::Awaiting => self.title = TitleState::Done,
            other => self.title = other,
        }
    }

    fn doctype(&mut self, doctype: &Doctype) {
        if self.doctype_seen {
            return;
        }
        self.doctype_seen = true;
        self.facts.html_version = render_doctype(doctype);
    }

    fn start_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        let name: &str = &tag.name;

        match name {
            "a" => {
                if let Some(href) = tag.attrs.iter().find(|attr| &*attr.name.local == "href") {
                    self.facts.links.push(href.value.to_string());
                }
            }
            "title" => {
                if matches!(self.title, TitleState::Unseen) {
                    self.title = TitleState::Awaiting;
                }
            }
            _ => {
                if let Some(count) = self.facts.headings.get_mut(name) {
                    *count += 1;
                }
            }
        }

        if tag.self_closing {
            return TokenSinkResult::Continue;
        }

        // The bare tokenizer has no tree builder to switch states for raw-text elements
        match name {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }
}

#[derive(Debug, Default)]
struct FactSink {
    state: RefCell<SinkState>,
}

impl TokenSink for FactSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();

        match &token {
            Token::CharacterTokens(text) => {
                state.push_text(text);
                return TokenSinkResult::Continue;
            }
            // Diagnostics arrive between character tokens and do not end a text run
            Token::ParseError(message) => {
                tracing::trace!(error = %message, "Recovered from malformed markup");
                return TokenSinkResult::Continue;
            }
            _ => state.close_text(),
        }

        match token {
            Token::DoctypeToken(doctype) => state.doctype(&doctype),
            Token::TagToken(tag) if tag.kind == TagKind::StartTag => {
                return state.start_tag(&tag);
            }
            _ => {}
        }

        TokenSinkResult::Continue
    }
}

/// Renders a doctype declaration in canonical case, e.g. `<!DOCTYPE html>`
fn render_doctype(doctype: &Doctype) -> String {
    let mut out = String::from("<!DOCTYPE");

    if let Some(name) = &doctype.name {
        let _ = write!(out, " {}", name);
    }

    match (&doctype.public_id, &doctype.system_id) {
        (Some(public_id), Some(system_id)) => {
            let _ = write!(out, " PUBLIC \"{}\" \"{}\"", public_id, system_id);
        }
        (Some(public_id), None) => {
            let _ = write!(out, " PUBLIC \"{}\"", public_id);
        }
        (None, Some(system_id)) => {
            let _ = write!(out, " SYSTEM \"{}\"", system_id);
        }
        (None, None) => {}
    }

    out.push('>');
    out
}

/// Single-pass, incremental extractor of page facts.
///
/// Bytes may be fed in arbitrary chunks; UTF-8 sequences split across chunk
/// boundaries are held back until complete.
pub struct Extractor {
    tokenizer: Tokenizer<FactSink>,
    input: BufferQueue,
    pending: Vec<u8>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(FactSink::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
            pending: Vec::new(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        // Decode everything except an incomplete trailing sequence
        let mut ready = 0;
        loop {
            match std::str::from_utf8(&self.pending[ready..]) {
                Ok(_) => {
                    ready = self.pending.len();
                    break;
                }
                Err(err) => match err.error_len() {
                    Some(invalid) => ready += err.valid_up_to() + invalid,
                    None => {
                        ready += err.valid_up_to();
                        break;
                    }
                },
            }
        }

        if ready == 0 {
            return;
        }

        let text = String::from_utf8_lossy(&self.pending[..ready]).into_owned();
        self.pending.drain(..ready);
        self.push_str(&text);
    }

    fn push_str(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from_slice(text));
        let _ = self.tokenizer.feed(&self.input);
    }

    /// Ends the token stream and returns everything gathered so far
    pub fn finish(mut self) -> PageFacts {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.push_str(&rest);
        }
        self.tokenizer.end();

        self.tokenizer.sink.state.take().facts
    }
}

/// Extracts page facts from a complete markup string
pub fn extract(html: &str) -> PageFacts {
    let mut extractor = Extractor::new();
    extractor.feed(html.as_bytes());
    extractor.finish()
}

/// Extracts page facts from a fallible stream of body chunks.
///
/// Each chunk is tokenized as it arrives. A read error ends the stream early;
/// the markup received before it is still extracted. The returned future is
/// not `Send`, since the tokenizer state is single-threaded.
pub async fn extract_stream<S, B, E>(stream: S) -> PageFacts
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut extractor = Extractor::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => extractor.feed(bytes.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Body stream interrupted, keeping partial markup");
                break;
            }
        }
    }

    extractor.finish()
}
