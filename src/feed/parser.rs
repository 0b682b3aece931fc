use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::types::{Feed, Item};

/// Maximum element nesting accepted before the document is rejected.
/// Keeps hostile inputs from growing the element stack without bound.
const MAX_XML_DEPTH: usize = 256;

/// How far into the document the XML declaration is searched for.
const MAX_DECL_SCAN: usize = 1024;

/// Errors that can occur while turning XML text into a [`Feed`].
///
/// Only malformed input produces an error. A well-formed document that
/// lacks RSS elements parses to a partially (or entirely) empty feed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The XML reader rejected the document (bad syntax, mismatched end
    /// tag, unknown entity reference, ...).
    #[error("XML parse error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// Input ended while elements were still open.
    #[error("Unclosed element <{0}> at end of input")]
    UnclosedElement(String),

    /// An end tag appeared with no open element to close.
    #[error("Unexpected closing tag at byte {0}")]
    UnmatchedEnd(u64),

    /// Input contains no element at all.
    #[error("Document has no root element")]
    NoRootElement,

    /// A second top-level element, or non-whitespace text, outside the root.
    #[error("Content found outside the root element: {0}")]
    OutsideRoot(String),

    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// Bytes are not valid under the document's encoding.
    #[error("Invalid {0} byte sequence in feed document")]
    Encoding(String),

    /// The XML declaration names an encoding nobody knows.
    #[error("Unsupported document encoding: {0}")]
    UnknownEncoding(String),
}

/// Parses raw feed bytes.
///
/// The encoding comes from a byte order mark if there is one, otherwise
/// from the `encoding` attribute of the XML declaration, otherwise UTF-8.
/// Bytes that do not decode under that encoding are a
/// [`ParseError::Encoding`]; nothing is replaced silently.
pub fn parse_feed_bytes(bytes: &[u8]) -> Result<Feed, ParseError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ParseError::Encoding(encoding.name().to_string()))?;
    tracing::trace!(encoding = encoding.name(), "Decoded feed document");
    parse_feed(&text)
}

/// Encoding named by the XML declaration, UTF-8 when there is none.
fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding, ParseError> {
    let Some(label) = declaration_encoding_label(bytes) else {
        return Ok(UTF_8);
    };
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ParseError::UnknownEncoding(label.to_string()))?;
    // A declaration readable as ASCII means the bytes are not really UTF-16
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok(UTF_8);
    }
    Ok(encoding)
}

fn declaration_encoding_label(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(MAX_DECL_SCAN)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    value.find(quote).map(|end| value[..end].trim())
}

/// Parses an RSS 2.0 document into a [`Feed`].
///
/// The first `<channel>` element supplies the feed metadata and each of its
/// direct `<item>` children becomes an [`Item`], in document order.
/// Recognized fields are matched by tag name; any other child is kept in the
/// owning record's `extra` map keyed by its qualified name.
///
/// # Errors
///
/// Returns [`ParseError`] when the input is not well-formed XML. Missing
/// RSS elements never cause an error.
///
/// # Security
///
/// `quick-xml` (0.37) never expands `<!ENTITY>` declarations from a DOCTYPE.
/// Only the five predefined XML entities and character references are
/// resolved, so a custom reference such as `&xxe;` fails to unescape and
/// surfaces as [`ParseError::Xml`].
pub fn parse_feed(xml: &str) -> Result<Feed, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    let mut builder = FeedBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Xml {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => builder.open(element_name(&e)?)?,
            Event::Empty(e) => {
                builder.open(element_name(&e)?)?;
                builder.close(reader.buffer_position() as u64)?;
            }
            Event::End(_) => builder.close(reader.buffer_position() as u64)?,
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                builder.text(&text)?;
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                builder.cdata(utf8(&raw)?);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DOCTYPE
            // carry nothing the feed model keeps.
            _ => {}
        }
    }

    builder.finish()
}

fn utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::Encoding(UTF_8.name().to_string()))
}

fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.name();
    Ok(utf8(name.as_ref())?.to_owned())
}

/// Text content of a single field element.
///
/// Text and CDATA runs are concatenated as they appear. Whitespace that
/// comes only from markup layout is dropped at the edges and shrinks to one
/// space between nested elements; CDATA is always kept verbatim.
#[derive(Debug)]
struct Capture {
    name: String,
    depth: usize,
    text: String,
    /// Trailing bytes of `text` that are layout whitespace from a text run.
    soft_tail: usize,
    pending_space: bool,
}

impl Capture {
    fn new(name: &str, depth: usize) -> Self {
        Self {
            name: name.to_owned(),
            depth,
            text: String::new(),
            soft_tail: 0,
            pending_space: false,
        }
    }

    fn push_text(&mut self, run: &str) {
        if run.trim().is_empty() {
            if !self.text.is_empty() {
                self.pending_space = true;
            }
            return;
        }
        let run = if self.text.is_empty() {
            run.trim_start()
        } else {
            run
        };
        self.flush_space();
        self.text.push_str(run);
        self.soft_tail = run.len() - run.trim_end().len();
    }

    fn push_cdata(&mut self, run: &str) {
        if run.is_empty() {
            return;
        }
        self.flush_space();
        self.text.push_str(run);
        self.soft_tail = 0;
    }

    fn flush_space(&mut self) {
        if std::mem::take(&mut self.pending_space) && !self.text.ends_with(char::is_whitespace) {
            self.text.push(' ');
        }
        self.soft_tail = 0;
    }

    fn into_field(mut self) -> (String, String) {
        let keep = self.text.len() - self.soft_tail;
        self.text.truncate(keep);
        (self.name, self.text)
    }
}

/// Single-pass state for [`parse_feed`].
///
/// `stack` mirrors the open elements. Depths are 1-based stack lengths, so
/// with `channel` at depth `c`, items sit at `c + 1` and item fields at
/// `c + 2`.
#[derive(Debug, Default)]
struct FeedBuilder {
    feed: Feed,
    stack: Vec<String>,
    seen_root: bool,
    channel_depth: Option<usize>,
    channel_done: bool,
    item: Option<Item>,
    capture: Option<Capture>,
}

impl FeedBuilder {
    fn open(&mut self, name: String) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(ParseError::OutsideRoot(format!("<{}>", name)));
            }
            self.seen_root = true;
        }
        if self.stack.len() >= MAX_XML_DEPTH {
            return Err(ParseError::MaxDepthExceeded(MAX_XML_DEPTH));
        }

        let depth = self.stack.len() + 1;
        if self.capture.is_none() && !self.channel_done {
            match self.channel_depth {
                // RSS puts the channel directly under the root element
                None if depth == 2 && name == "channel" => self.channel_depth = Some(depth),
                None => {}
                Some(channel) if depth == channel + 1 && self.item.is_none() => {
                    if name == "item" {
                        self.item = Some(Item::default());
                    } else {
                        self.capture = Some(Capture::new(&name, depth));
                    }
                }
                Some(channel) if depth == channel + 2 && self.item.is_some() => {
                    self.capture = Some(Capture::new(&name, depth));
                }
                Some(_) => {}
            }
        }

        self.stack.push(name);
        Ok(())
    }

    fn close(&mut self, position: u64) -> Result<(), ParseError> {
        let depth = self.stack.len();
        if self.stack.pop().is_none() {
            return Err(ParseError::UnmatchedEnd(position));
        }

        match self.capture.take() {
            Some(capture) if capture.depth == depth => self.store(capture),
            Some(capture) => self.capture = Some(capture),
            None => match self.channel_depth {
                Some(channel) if depth == channel + 1 => {
                    if let Some(item) = self.item.take() {
                        self.feed.items.push(item);
                    }
                }
                Some(channel) if depth == channel => self.channel_done = true,
                _ => {}
            },
        }
        Ok(())
    }

    fn text(&mut self, run: &str) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            let run = run.trim();
            if run.is_empty() {
                return Ok(());
            }
            return Err(ParseError::OutsideRoot(run.chars().take(32).collect()));
        }
        if let Some(capture) = self.capture.as_mut() {
            capture.push_text(run);
        }
        Ok(())
    }

    fn cdata(&mut self, run: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.push_cdata(run);
        }
    }

    fn store(&mut self, capture: Capture) {
        let (name, text) = capture.into_field();
        match self.item.as_mut() {
            Some(item) => match name.as_str() {
                "title" => item.title = Some(text),
                "link" => item.link = Some(text),
                "description" => item.description = Some(text),
                "pubDate" => item.pub_date = Some(text),
                "category" => item.categories.push(text),
                _ => {
                    item.extra.insert(name, text);
                }
            },
            None => match name.as_str() {
                "title" => self.feed.title = Some(text),
                "link" => self.feed.link = Some(text),
                "description" => self.feed.description = Some(text),
                "category" => self.feed.categories.push(text),
                _ => {
                    self.feed.extra.insert(name, text);
                }
            },
        }
    }

    fn finish(self) -> Result<Feed, ParseError> {
        if let Some(open) = self.stack.last() {
            return Err(ParseError::UnclosedElement(open.clone()));
        }
        if !self.seen_root {
            return Err(ParseError::NoRootElement);
        }
        if self.channel_depth.is_none() {
            tracing::debug!("Document has no <channel> element, returning empty feed");
        }
        tracing::debug!(items = self.feed.items.len(), "Parsed feed");
        Ok(self.feed)
    }
}
