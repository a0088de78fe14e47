//! Entry ⇄ Atom XML.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::blog::{Entry, EntryFields};
use crate::config::SiteConfig;

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const APP_NS: &str = "http://www.w3.org/2007/app";

/// Errors raised while reading or writing Atom documents.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed XML: {0}")]
    Syntax(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("invalid date-time {0:?}")]
    Date(String),
    #[error("failed to write XML: {0}")]
    Write(String),
}

fn syntax(e: impl std::fmt::Display) -> CodecError {
    CodecError::Syntax(e.to_string())
}

/// First-level children whose text we keep.
#[derive(Debug, Clone, Copy)]
enum TextField {
    Title,
    Content,
    Updated,
    Published,
}

/// Serializes entries, feeds and the service document; parses submitted entries.
#[derive(Debug, Clone)]
pub struct AtomCodec {
    base_url: String,
    title: String,
    author: String,
    site: SiteConfig,
}

impl AtomCodec {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            base_url: site.base_url().to_string(),
            title: site.title.clone(),
            author: site.author.clone(),
            site: site.clone(),
        }
    }

    /// Human-facing URL: `{url}/YYYY/MM/DD/slug`.
    pub fn entry_url(&self, entry: &Entry) -> String {
        format!("{}/{}", self.base_url, entry.path())
    }

    /// AtomPub member URL: `{url}/atom/YYYY/MM/DD/slug`.
    pub fn edit_url(&self, entry: &Entry) -> String {
        format!("{}/atom/{}", self.base_url, entry.path())
    }

    pub fn collection_url(&self) -> String {
        format!("{}/atom/", self.base_url)
    }

    pub fn home_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// A standalone `<entry>` document.
    pub fn encode_entry(&self, entry: &Entry) -> Result<String, CodecError> {
        let mut writer = Writer::new(Vec::new());
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_entry(&mut writer, entry, true)?;
        finish(writer)
    }

    /// The collection feed. `now` stands in for `updated` when there are no entries.
    pub fn encode_feed(&self, entries: &[Entry], now: DateTime<Utc>) -> Result<String, CodecError> {
        let updated = entries
            .iter()
            .map(|e| e.updated)
            .max()
            .unwrap_or_else(|| self.site.localize(now));

        let mut writer = Writer::new(Vec::new());
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        emit(
            &mut writer,
            Event::Start(BytesStart::new("feed").with_attributes([("xmlns", ATOM_NS)])),
        )?;
        text_element(&mut writer, "title", &self.title)?;
        text_element(&mut writer, "id", &self.home_url())?;
        text_element(&mut writer, "updated", &timestamp(&updated))?;
        link(&mut writer, "self", Some("application/atom+xml"), &self.collection_url())?;
        link(&mut writer, "alternate", Some("text/html"), &self.home_url())?;
        self.write_author(&mut writer)?;
        for entry in entries {
            self.write_entry(&mut writer, entry, false)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("feed")))?;
        finish(writer)
    }

    /// The AtomPub service document advertising the single collection.
    pub fn encode_service(&self) -> Result<String, CodecError> {
        let mut writer = Writer::new(Vec::new());
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        emit(
            &mut writer,
            Event::Start(
                BytesStart::new("service")
                    .with_attributes([("xmlns", APP_NS), ("xmlns:atom", ATOM_NS)]),
            ),
        )?;
        emit(&mut writer, Event::Start(BytesStart::new("workspace")))?;
        text_element(&mut writer, "atom:title", &self.title)?;

        let href = self.collection_url();
        emit(
            &mut writer,
            Event::Start(BytesStart::new("collection").with_attributes([("href", href.as_str())])),
        )?;
        text_element(&mut writer, "atom:title", &self.title)?;
        text_element(&mut writer, "accept", "application/atom+xml;type=entry")?;
        emit(&mut writer, Event::End(BytesEnd::new("collection")))?;

        emit(&mut writer, Event::End(BytesEnd::new("workspace")))?;
        emit(&mut writer, Event::End(BytesEnd::new("service")))?;
        finish(writer)
    }

    fn write_author(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), CodecError> {
        emit(writer, Event::Start(BytesStart::new("author")))?;
        text_element(writer, "name", &self.author)?;
        emit(writer, Event::End(BytesEnd::new("author")))
    }

    fn write_entry(
        &self,
        writer: &mut Writer<Vec<u8>>,
        entry: &Entry,
        with_namespace: bool,
    ) -> Result<(), CodecError> {
        let start = if with_namespace {
            BytesStart::new("entry").with_attributes([("xmlns", ATOM_NS)])
        } else {
            BytesStart::new("entry")
        };
        emit(writer, Event::Start(start))?;

        text_element(writer, "id", &format!("urn:uuid:{}", entry.id))?;
        text_element(writer, "title", &entry.title)?;
        text_element(writer, "updated", &timestamp(&entry.updated))?;
        text_element(writer, "published", &timestamp(&entry.published))?;
        link(writer, "alternate", Some("text/html"), &self.entry_url(entry))?;
        link(writer, "edit", None, &self.edit_url(entry))?;
        self.write_author(writer)?;

        emit(
            writer,
            Event::Start(BytesStart::new("content").with_attributes([("type", "html")])),
        )?;
        emit(writer, Event::Text(BytesText::new(&entry.content)))?;
        emit(writer, Event::End(BytesEnd::new("content")))?;

        for tag in &entry.tags {
            emit(
                writer,
                Event::Empty(BytesStart::new("category").with_attributes([("term", tag.as_str())])),
            )?;
        }

        emit(writer, Event::End(BytesEnd::new("entry")))
    }

    /// Read a submitted entry document.
    ///
    /// Only first-level children of the root are considered: `title` and
    /// `content` text is copied verbatim, `updated`/`published` are parsed as
    /// date-times, every `category` contributes its `term`. Anything else is
    /// skipped. A field's text ends at its first nested element; markup meant
    /// as content must be escaped or wrapped in CDATA. `updated` defaults to
    /// `now` in the configured timezone.
    pub fn decode_entry(&self, xml: &str, now: DateTime<Utc>) -> Result<EntryFields, CodecError> {
        let mut reader = Reader::from_str(xml);
        let mut fields = EntryFields::new(self.site.localize(now));

        let mut depth = 0usize;
        let mut seen_root = false;
        let mut current: Option<(TextField, String)> = None;
        let mut text_closed = false;

        loop {
            match reader.read_event().map_err(syntax)? {
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        1 => {
                            if seen_root {
                                return Err(CodecError::Syntax("more than one root element".into()));
                            }
                            seen_root = true;
                        }
                        2 => {
                            text_closed = false;
                            current = match e.local_name().as_ref() {
                                b"title" => Some((TextField::Title, String::new())),
                                b"content" => Some((TextField::Content, String::new())),
                                b"updated" => Some((TextField::Updated, String::new())),
                                b"published" => Some((TextField::Published, String::new())),
                                b"category" => {
                                    push_category(&e, &mut fields)?;
                                    None
                                }
                                _ => None,
                            };
                        }
                        _ => text_closed = true,
                    }
                }
                Event::Empty(e) => match depth {
                    0 => {
                        if seen_root {
                            return Err(CodecError::Syntax("more than one root element".into()));
                        }
                        seen_root = true;
                    }
                    1 => match e.local_name().as_ref() {
                        b"title" => fields.title = Some(String::new()),
                        b"content" => fields.content = Some(String::new()),
                        b"updated" | b"published" => return Err(CodecError::Date(String::new())),
                        b"category" => push_category(&e, &mut fields)?,
                        _ => {}
                    },
                    _ => text_closed = true,
                },
                Event::Text(t) if depth == 2 && !text_closed => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&t.unescape().map_err(syntax)?);
                    }
                }
                Event::CData(c) if depth == 2 && !text_closed => {
                    if let Some((_, text)) = current.as_mut() {
                        let raw = c.into_inner();
                        text.push_str(std::str::from_utf8(&raw).map_err(syntax)?);
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some((field, text)) = current.take() {
                            store(&mut fields, field, text)?;
                        }
                    }
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| CodecError::Syntax("unexpected closing tag".into()))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(CodecError::NoRoot);
        }
        if depth != 0 {
            return Err(CodecError::Syntax("unclosed element".into()));
        }
        Ok(fields)
    }
}

fn push_category(e: &BytesStart<'_>, fields: &mut EntryFields) -> Result<(), CodecError> {
    if let Some(term) = e.try_get_attribute("term").map_err(syntax)? {
        let term = term.unescape_value().map_err(syntax)?;
        fields.tags.get_or_insert_with(Vec::new).push(term.into_owned());
    }
    Ok(())
}

fn store(fields: &mut EntryFields, field: TextField, text: String) -> Result<(), CodecError> {
    match field {
        TextField::Title => fields.title = Some(text),
        TextField::Content => fields.content = Some(text),
        TextField::Updated => fields.updated = parse_date(&text)?,
        TextField::Published => fields.published = Some(parse_date(&text)?),
    }
    Ok(())
}

/// RFC 3339, or ISO-8601 with a compact `+hhmm` offset.
pub fn parse_date(text: &str) -> Result<DateTime<FixedOffset>, CodecError> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|_| CodecError::Date(text.to_string()))
}

/// A bare `<entry>` as a client submits it: title, content and categories.
///
/// `None` fields are left out so a PUT only touches what was given.
pub fn encode_draft(
    title: Option<&str>,
    content: Option<&str>,
    tags: &[String],
) -> Result<String, CodecError> {
    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("entry").with_attributes([("xmlns", ATOM_NS)])),
    )?;
    if let Some(title) = title {
        text_element(&mut writer, "title", title)?;
    }
    if let Some(content) = content {
        emit(
            &mut writer,
            Event::Start(BytesStart::new("content").with_attributes([("type", "html")])),
        )?;
        emit(&mut writer, Event::Text(BytesText::new(content)))?;
        emit(&mut writer, Event::End(BytesEnd::new("content")))?;
    }
    for tag in tags {
        emit(
            &mut writer,
            Event::Empty(BytesStart::new("category").with_attributes([("term", tag.as_str())])),
        )?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("entry")))?;
    finish(writer)
}

/// Atom date-time rendering.
pub fn timestamp(at: &DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), CodecError> {
    writer
        .write_event(event)
        .map_err(|e| CodecError::Write(e.to_string()))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), CodecError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn link(
    writer: &mut Writer<Vec<u8>>,
    rel: &str,
    media_type: Option<&str>,
    href: &str,
) -> Result<(), CodecError> {
    let mut element = BytesStart::new("link");
    element.push_attribute(("rel", rel));
    if let Some(media_type) = media_type {
        element.push_attribute(("type", media_type));
    }
    element.push_attribute(("href", href));
    emit(writer, Event::Empty(element))
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, CodecError> {
    String::from_utf8(writer.into_inner()).map_err(|e| CodecError::Write(e.to_string()))
}
