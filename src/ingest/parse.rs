// src/ingest/parse.rs
//! Feed document parsing. Accepts RSS 2.0, RSS 1.0 (RDF) and Atom, and
//! turns every entry into a `RawItem`, defaulting missing fields instead
//! of rejecting the entry.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::bytes::Regex;

use super::normalize_text;
use super::types::{FeedDescriptor, FeedError, RawItem};

pub const NO_TITLE: &str = "No title";
pub const NO_LINK: &str = "#";

#[derive(Debug, PartialEq, Eq)]
enum DocKind {
    Rss,
    Atom,
}

/// Parse one feed document fetched for `feed`. `now` backs missing dates.
///
/// The body is taken as raw bytes so the document's own encoding
/// declaration decides how text is decoded.
pub fn parse_feed(
    body: &[u8],
    feed: &FeedDescriptor,
    now: DateTime<Utc>,
) -> Result<Vec<RawItem>, FeedError> {
    let xml = scrub_html_entities_for_xml(body);
    let items = match root_kind(&xml)? {
        DocKind::Rss => {
            let channel = rss::Channel::read_from(&xml[..]).map_err(|e| match e {
                rss::Error::Eof => FeedError::MissingItems,
                other => FeedError::Parse(other.to_string()),
            })?;
            channel
                .items()
                .iter()
                .map(|it| rss_item(it, feed, now))
                .collect()
        }
        DocKind::Atom => {
            let doc = atom_syndication::Feed::read_from(&xml[..])
                .map_err(|e| FeedError::Parse(e.to_string()))?;
            doc.entries()
                .iter()
                .map(|e| atom_entry(e, feed, now))
                .collect()
        }
    };
    Ok(items)
}

/// `<rss>` and `<rdf:RDF>` go to the RSS reader, `<feed>` to the Atom one.
fn root_kind(xml: &[u8]) -> Result<DocKind, FeedError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return match e.local_name().as_ref() {
                    b"rss" | b"RDF" => Ok(DocKind::Rss),
                    b"feed" => Ok(DocKind::Atom),
                    other => Err(FeedError::Parse(format!(
                        "unrecognized root element <{}>",
                        String::from_utf8_lossy(other)
                    ))),
                };
            }
            Ok(Event::Eof) => return Err(FeedError::Parse("empty document".into())),
            Ok(_) => buf.clear(),
            Err(e) => return Err(FeedError::Parse(e.to_string())),
        }
    }
}

fn rss_item(it: &rss::Item, feed: &FeedDescriptor, now: DateTime<Utc>) -> RawItem {
    let content = first_non_empty([it.content(), it.description()]);
    let date = it.pub_date().or_else(|| {
        it.dublin_core_ext()
            .and_then(|dc| dc.dates().first())
            .map(String::as_str)
    });
    build_item(feed, it.title(), it.link(), content, date, now)
}

fn atom_entry(e: &atom_syndication::Entry, feed: &FeedDescriptor, now: DateTime<Utc>) -> RawItem {
    // `rel` defaults to "alternate" when the attribute is absent.
    let link = e
        .links()
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| e.links().first())
        .map(|l| l.href());
    let content = first_non_empty([
        e.content().and_then(|c| c.value()),
        e.summary().map(|t| t.as_str()),
    ]);
    let published_at = e
        .published()
        .map(|d| d.with_timezone(&Utc))
        .or_else(|| Some(e.updated().with_timezone(&Utc)).filter(|d| d.timestamp() != 0))
        .unwrap_or(now);
    let mut item = build_item(feed, Some(e.title().as_str()), link, content, None, now);
    item.published_at = published_at;
    item
}

fn first_non_empty<const N: usize>(candidates: [Option<&str>; N]) -> Option<&str> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

fn build_item(
    feed: &FeedDescriptor,
    title: Option<&str>,
    link: Option<&str>,
    content: Option<&str>,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> RawItem {
    let title = title
        .map(normalize_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());
    let link = link
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| NO_LINK.to_string());
    let content = content.map(normalize_text).unwrap_or_default();
    let published_at = date.and_then(parse_date).unwrap_or(now);

    RawItem {
        title,
        link,
        content,
        published_at,
        source: feed.name.clone(),
        country: feed.country.clone(),
        region: feed.region.clone(),
        language: feed.language.clone(),
    }
}

/// RFC 2822 (RSS) first, then RFC 3339 (Atom, Dublin Core).
pub fn parse_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// HTML named entities are not valid XML; feeds use them anyway.
/// Works on bytes so the document keeps its declared encoding.
fn scrub_html_entities_for_xml(s: &[u8]) -> Vec<u8> {
    static RE_ENTITY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"&(nbsp|ndash|mdash|ldquo|rdquo|lsquo|rsquo|hellip);").unwrap()
    });
    RE_ENTITY
        .replace_all(s, |caps: &regex::bytes::Captures| -> &'static [u8] {
            match &caps[1] {
                b"nbsp" => b" ",
                b"ndash" | b"mdash" => b"-",
                b"ldquo" | b"rdquo" => b"\"",
                b"lsquo" | b"rsquo" => b"'",
                _ => b"...",
            }
        })
        .into_owned()
}
