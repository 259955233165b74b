//! Feed parser for RSS 2.0 and Atom documents
//!
//! Both dialects are read with a single quick-xml event loop and normalized
//! into the same [`ParsedFeed`] shape:
//! - Podcast-level metadata from `<channel>` (RSS) or `<feed>` (Atom)
//! - One [`ParsedEntry`] per `<item>` / `<entry>`, in document order
//! - iTunes namespace elements in either dialect
//!
//! Namespace prefixes are resolved against the declarations on the root
//! element, so `<itunes:summary>` is recognized under any prefix bound to the
//! iTunes namespace URI.
//!
//! Text is decoded with the encoding the document declares and HTML entities
//! are resolved. Free-text values are kept as written; identifiers, links,
//! dates and durations are trimmed. Description-like slots keep any child
//! markup (Atom `type="xhtml"`, raw HTML in RSS) as their value.

use crate::ParseError;
use html_escape::{decode_html_entities, encode_text};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;

const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Feed syntax the document was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedDialect {
    Rss,
    Atom,
}

/// Whether an entry carries a given optional slot at all
///
/// A slot can be exposed and still empty. Description fallback is decided by
/// exposure, not by the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntryField {
    #[default]
    Absent,
    Exposed(Option<String>),
}

impl EntryField {
    /// Outer `None` when the slot is absent, inner `None` when it is empty
    pub fn exposed(&self) -> Option<Option<&str>> {
        match self {
            Self::Absent => None,
            Self::Exposed(value) => Some(value.as_deref()),
        }
    }
}

/// Podcast-level fields as declared by the feed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodcastMetadata {
    pub title: Option<String>,
    /// RSS `<description>` or Atom `<subtitle>`
    pub description: Option<String>,
    pub language: Option<String>,
    /// Site link of the channel
    pub link: Option<String>,
    pub itunes_owner_name: Option<String>,
    pub itunes_owner_email: Option<String>,
    pub itunes_explicit: Option<bool>,
    pub itunes_subtitle: Option<String>,
    pub itunes_summary: Option<String>,
    pub itunes_author: Option<String>,
    /// Atom `<author><name>`
    pub author: Option<String>,
    /// `href` of `<itunes:image>`
    pub itunes_image: Option<String>,
    /// RSS `<image><url>` or Atom `<logo>`/`<icon>`
    pub image_url: Option<String>,
}

/// One feed entry before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedEntry {
    pub title: Option<String>,
    /// Entry link (RSS `<link>`, Atom alternate `<link href>`)
    pub url: Option<String>,
    /// RSS `<guid>` or Atom `<id>`
    pub entry_id: Option<String>,
    /// Raw publication timestamp text
    pub published: Option<String>,
    pub enclosure_url: Option<String>,
    pub enclosure_length: Option<String>,
    pub enclosure_type: Option<String>,
    pub itunes_summary: EntryField,
    pub content: EntryField,
    pub summary: EntryField,
    pub itunes_explicit: Option<bool>,
    /// Raw `<itunes:duration>` text
    pub itunes_duration: Option<String>,
}

/// A parsed feed document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed {
    pub dialect: FeedDialect,
    pub podcast: PodcastMetadata,
    pub entries: Vec<ParsedEntry>,
}

/// Parses a raw RSS or Atom document
///
/// # Arguments
///
/// * `bytes` - The feed body as fetched
///
/// # Returns
///
/// * `Ok(ParsedFeed)` - Metadata plus entries in document order
/// * `Err(ParseError)` - Malformed XML, text that cannot be decoded in the
///   declared encoding, or a root element that is neither `<rss>` nor `<feed>`
///
/// # Example
///
/// ```
/// use podcast_crawler::crawler::parse_feed;
///
/// let xml = br#"<rss version="2.0"><channel><title>Show</title>
///   <item><guid>ep-1</guid><title>Pilot</title></item>
/// </channel></rss>"#;
/// let feed = parse_feed(xml).unwrap();
/// assert_eq!(feed.podcast.title.as_deref(), Some("Show"));
/// assert_eq!(feed.entries.len(), 1);
/// ```
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, ParseError> {
    let mut reader = Reader::from_reader(bytes);

    let mut builder: Option<FeedBuilder> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ParseError::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;
        // Refined by the XML declaration once it has been read
        let decoder = reader.decoder();

        match event {
            Event::Start(e) => match builder.as_mut() {
                Some(b) => b.open(&e, false, decoder)?,
                None => builder = Some(FeedBuilder::from_root(&e, decoder)?),
            },
            Event::Empty(e) => match builder.as_mut() {
                Some(b) => b.open(&e, true, decoder)?,
                None => {
                    // A self-closing root carries no channel at all
                    let root = FeedBuilder::from_root(&e, decoder)?;
                    return Ok(root.finish());
                }
            },
            Event::End(e) => {
                if let Some(b) = builder.as_mut() {
                    if b.end(&e, decoder)? {
                        break;
                    }
                }
            }
            Event::Text(e) => {
                if let Some(b) = builder.as_mut() {
                    let text = decode(decoder, &e)?;
                    b.push_text(&decode_html_entities(&text));
                }
            }
            Event::CData(e) => {
                if let Some(b) = builder.as_mut() {
                    b.push_text(&decode(decoder, &e)?);
                }
            }
            Event::Eof => {
                return match builder {
                    Some(_) => Err(ParseError::Xml(
                        "unexpected end of document".to_string(),
                    )),
                    None => Err(ParseError::UnsupportedFormat("empty document".to_string())),
                };
            }
            _ => {}
        }
        buf.clear();
    }

    match builder {
        Some(b) => Ok(b.finish()),
        None => Err(ParseError::UnsupportedFormat("empty document".to_string())),
    }
}

/// Maps iTunes explicit markers onto a flag
///
/// Unknown values are treated as undeclared rather than guessed.
pub fn parse_explicit(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "explicit" => Some(true),
        "no" | "false" | "clean" => Some(false),
        _ => None,
    }
}

struct OpenElement {
    name: String,
    text: String,
    /// Description-like slot whose child elements are kept as markup
    rich: bool,
    markup: String,
    has_children: bool,
}

impl OpenElement {
    fn new(name: String, rich: bool) -> Self {
        Self {
            name,
            text: String::new(),
            rich,
            markup: String::new(),
            has_children: false,
        }
    }

    fn value(&self) -> &str {
        if self.has_children {
            &self.markup
        } else {
            &self.text
        }
    }
}

struct FeedBuilder {
    dialect: FeedDialect,
    prefixes: HashMap<String, &'static str>,
    itunes_declared: bool,
    podcast: PodcastMetadata,
    entries: Vec<ParsedEntry>,
    current: Option<ParsedEntry>,
    stack: Vec<OpenElement>,
    /// Open child elements inside the innermost rich slot
    nested: usize,
}

impl FeedBuilder {
    fn from_root(root: &BytesStart<'_>, decoder: Decoder) -> Result<Self, ParseError> {
        let mut prefixes = HashMap::new();
        let mut itunes_declared = false;
        let mut language = None;

        for (key, value) in read_attributes(root, decoder)? {
            if key == "xml:lang" {
                language = token(&value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                if let Some(canonical) = canonical_prefix(&value) {
                    itunes_declared |= canonical == "itunes";
                    prefixes.insert(prefix.to_string(), canonical);
                }
            }
        }

        let name = String::from_utf8_lossy(root.name().as_ref()).to_string();
        let local = name.rsplit(':').next().unwrap_or(&name);
        let dialect = match local {
            "rss" => FeedDialect::Rss,
            "feed" => FeedDialect::Atom,
            _ => return Err(ParseError::UnsupportedFormat(format!("<{}> root", name))),
        };

        let mut builder = Self {
            dialect,
            prefixes,
            itunes_declared,
            podcast: PodcastMetadata::default(),
            entries: Vec::new(),
            current: None,
            stack: Vec::new(),
            nested: 0,
        };
        if dialect == FeedDialect::Atom {
            builder.podcast.language = language;
        }
        builder.stack.push(OpenElement::new(local.to_string(), false));
        Ok(builder)
    }

    /// Element name with a known namespace prefix rewritten to its canonical form
    fn canonical_name(&self, raw: &[u8]) -> String {
        let name = String::from_utf8_lossy(raw);
        match name.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(canonical) => format!("{}:{}", canonical, local),
                None => name.to_string(),
            },
            None => name.to_string(),
        }
    }

    fn parent(&self) -> &str {
        self.stack.last().map(|e| e.name.as_str()).unwrap_or("")
    }

    fn open(
        &mut self,
        element: &BytesStart<'_>,
        self_closing: bool,
        decoder: Decoder,
    ) -> Result<(), ParseError> {
        if let Some(top) = self.stack.last_mut().filter(|top| top.rich) {
            let tag = decode(decoder, element)?;
            top.markup.push('<');
            top.markup.push_str(&tag);
            top.markup.push_str(if self_closing { "/>" } else { ">" });
            top.has_children = true;
            if !self_closing {
                self.nested += 1;
            }
            return Ok(());
        }

        let name = self.canonical_name(element.name().as_ref());

        if is_entry_tag(self.dialect, &name) && self.current.is_none() {
            self.current = Some(ParsedEntry {
                itunes_summary: if self.itunes_declared {
                    EntryField::Exposed(None)
                } else {
                    EntryField::Absent
                },
                summary: EntryField::Exposed(None),
                ..Default::default()
            });
        }

        let attrs = read_attributes(element, decoder)?;
        self.apply_attributes(&name, &attrs);

        let rich = is_rich_slot(self.dialect, self.parent(), &name);
        self.stack.push(OpenElement::new(name, rich));
        if self_closing {
            self.close();
        }
        Ok(())
    }

    fn end(&mut self, element: &BytesEnd<'_>, decoder: Decoder) -> Result<bool, ParseError> {
        if self.nested == 0 {
            return Ok(self.close());
        }

        let name = decode(decoder, element.name().as_ref())?;
        if let Some(top) = self.stack.last_mut() {
            top.markup.push_str("</");
            top.markup.push_str(&name);
            top.markup.push('>');
        }
        self.nested -= 1;
        Ok(false)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(top) = self.stack.last_mut() {
            top.text.push_str(text);
            if top.rich {
                top.markup.push_str(&encode_text(text));
            }
        }
    }

    /// Pops the innermost element; returns true once the root is closed
    fn close(&mut self) -> bool {
        let Some(element) = self.stack.pop() else {
            return true;
        };
        if self.stack.is_empty() {
            return true;
        }

        if self.current.is_some() && is_entry_tag(self.dialect, &element.name) {
            if let Some(entry) = self.current.take() {
                self.entries.push(entry);
            }
            return false;
        }

        let parent = self.parent().to_string();
        match self.current.as_mut() {
            Some(entry) => {
                if is_entry_tag(self.dialect, &parent) {
                    apply_entry_text(entry, self.dialect, &element.name, element.value());
                }
            }
            None => self.apply_feed_text(&parent, &element.name, element.value()),
        }
        false
    }

    fn apply_attributes(&mut self, name: &str, attrs: &HashMap<String, String>) {
        let in_entry = is_entry_tag(self.dialect, self.parent());
        let parent_is_head = matches!(
            (self.dialect, self.parent()),
            (FeedDialect::Rss, "channel") | (FeedDialect::Atom, "feed")
        );

        match self.current.as_mut() {
            Some(entry) if in_entry => match (self.dialect, name) {
                (_, "enclosure") => {
                    if entry.enclosure_url.is_none() {
                        entry.enclosure_url = attr(attrs, "url");
                        entry.enclosure_length = attr(attrs, "length");
                        entry.enclosure_type = attr(attrs, "type");
                    }
                }
                (FeedDialect::Atom, "link") => match attrs.get("rel").map(String::as_str) {
                    Some("enclosure") => {
                        if entry.enclosure_url.is_none() {
                            entry.enclosure_url = attr(attrs, "href");
                            entry.enclosure_length = attr(attrs, "length");
                            entry.enclosure_type = attr(attrs, "type");
                        }
                    }
                    None | Some("alternate") => {
                        if entry.url.is_none() {
                            entry.url = attr(attrs, "href");
                        }
                    }
                    _ => {}
                },
                _ => {}
            },
            Some(_) => {}
            None if parent_is_head => match (self.dialect, name) {
                (_, "itunes:image") => self.podcast.itunes_image = attr(attrs, "href"),
                (FeedDialect::Atom, "link") => {
                    let rel = attrs.get("rel").map(String::as_str);
                    if matches!(rel, None | Some("alternate")) && self.podcast.link.is_none() {
                        self.podcast.link = attr(attrs, "href");
                    }
                }
                _ => {}
            },
            None => {}
        }
    }

    fn apply_feed_text(&mut self, parent: &str, name: &str, text: &str) {
        let podcast = &mut self.podcast;

        match (self.dialect, parent, name) {
            (FeedDialect::Rss, "channel", "title") | (FeedDialect::Atom, "feed", "title") => {
                podcast.title = verbatim(text)
            }
            (FeedDialect::Rss, "channel", "description")
            | (FeedDialect::Atom, "feed", "subtitle") => podcast.description = verbatim(text),
            (FeedDialect::Rss, "channel", "language") => podcast.language = token(text),
            (FeedDialect::Rss, "channel", "link") => podcast.link = token(text),
            (FeedDialect::Rss, "image", "url") => podcast.image_url = token(text),
            (FeedDialect::Atom, "feed", "logo") => podcast.image_url = token(text),
            (FeedDialect::Atom, "feed", "icon") => {
                if podcast.image_url.is_none() {
                    podcast.image_url = token(text);
                }
            }
            (FeedDialect::Atom, "author", "name") => {
                if podcast.author.is_none() {
                    podcast.author = verbatim(text);
                }
            }
            (_, "itunes:owner", "itunes:name") => podcast.itunes_owner_name = verbatim(text),
            (_, "itunes:owner", "itunes:email") => podcast.itunes_owner_email = token(text),
            (_, "channel" | "feed", "itunes:explicit") => {
                podcast.itunes_explicit = parse_explicit(text)
            }
            (_, "channel" | "feed", "itunes:subtitle") => podcast.itunes_subtitle = verbatim(text),
            (_, "channel" | "feed", "itunes:summary") => podcast.itunes_summary = verbatim(text),
            (_, "channel" | "feed", "itunes:author") => podcast.itunes_author = verbatim(text),
            _ => {}
        }
    }

    fn finish(self) -> ParsedFeed {
        ParsedFeed {
            dialect: self.dialect,
            podcast: self.podcast,
            entries: self.entries,
        }
    }
}

fn apply_entry_text(entry: &mut ParsedEntry, dialect: FeedDialect, name: &str, text: &str) {
    match (dialect, name) {
        (_, "title") => entry.title = verbatim(text),
        (FeedDialect::Rss, "link") => entry.url = token(text),
        (FeedDialect::Rss, "guid") | (FeedDialect::Atom, "id") => entry.entry_id = token(text),
        (FeedDialect::Rss, "pubDate") | (FeedDialect::Atom, "published") => {
            entry.published = token(text)
        }
        (FeedDialect::Atom, "updated") => {
            if entry.published.is_none() {
                entry.published = token(text);
            }
        }
        (FeedDialect::Rss, "description") | (FeedDialect::Atom, "summary") => {
            entry.summary = EntryField::Exposed(verbatim(text))
        }
        (FeedDialect::Rss, "content:encoded") | (FeedDialect::Atom, "content") => {
            entry.content = EntryField::Exposed(verbatim(text))
        }
        (_, "itunes:summary") => entry.itunes_summary = EntryField::Exposed(verbatim(text)),
        (_, "itunes:duration") => entry.itunes_duration = token(text),
        (_, "itunes:explicit") => entry.itunes_explicit = parse_explicit(text),
        _ => {}
    }
}

fn is_entry_tag(dialect: FeedDialect, name: &str) -> bool {
    match dialect {
        FeedDialect::Rss => name == "item",
        FeedDialect::Atom => name == "entry",
    }
}

/// Slots that may carry markup: descriptions, summaries and content
fn is_rich_slot(dialect: FeedDialect, parent: &str, name: &str) -> bool {
    match (dialect, parent, name) {
        (FeedDialect::Rss, "item", "description" | "content:encoded")
        | (FeedDialect::Rss, "channel", "description")
        | (FeedDialect::Rss, "item" | "channel", "itunes:summary") => true,
        (FeedDialect::Atom, "entry", "summary" | "content")
        | (FeedDialect::Atom, "feed", "subtitle")
        | (FeedDialect::Atom, "entry" | "feed", "itunes:summary") => true,
        _ => false,
    }
}

fn canonical_prefix(uri: &str) -> Option<&'static str> {
    let uri = uri.trim();
    if uri.eq_ignore_ascii_case(ITUNES_NS) {
        Some("itunes")
    } else if uri == CONTENT_NS {
        Some("content")
    } else if uri == ATOM_NS {
        Some("atom")
    } else {
        None
    }
}

/// Decodes raw document bytes with the document's encoding
fn decode(decoder: Decoder, raw: &[u8]) -> Result<String, ParseError> {
    decoder
        .decode(raw)
        .map(|text| text.into_owned())
        .map_err(|e| ParseError::Xml(format!("undecodable text: {}", e)))
}

fn read_attributes(
    element: &BytesStart<'_>,
    decoder: Decoder,
) -> Result<HashMap<String, String>, ParseError> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml(e.to_string()))?;
        let key = decode(decoder, attr.key.as_ref())?;
        let value = decode(decoder, &attr.value)?;
        attrs.insert(key, decode_html_entities(&value).into_owned());
    }
    Ok(attrs)
}

fn attr(attrs: &HashMap<String, String>, key: &str) -> Option<String> {
    attrs.get(key).and_then(|v| token(v))
}

/// Free text as written; `None` only when there is nothing but whitespace
fn verbatim(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Identifier-like text with surrounding whitespace removed
fn token(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
