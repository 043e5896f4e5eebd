//! RSS 2.0 document writer.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use crate::channel::ChannelMeta;
use crate::error::FeedError;
use crate::input::{FeedArticle, FeedInput};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Serialize `inputs` into an RSS 2.0 document stamped with the current time.
///
/// # Errors
///
/// Returns [`FeedError`] if the XML writer fails.
pub fn build_feed(inputs: &[FeedInput], channel: &ChannelMeta) -> Result<Vec<u8>, FeedError> {
    build_feed_at(inputs, channel, Utc::now())
}

/// Coerce loose JSON values with [`FeedInput::from_value`] and serialize them.
/// Values of an unrecognized shape are skipped.
///
/// # Errors
///
/// Returns [`FeedError`] if the XML writer fails.
pub fn build_feed_from_values(
    values: &[Value],
    channel: &ChannelMeta,
) -> Result<Vec<u8>, FeedError> {
    let inputs: Vec<FeedInput> = values.iter().filter_map(FeedInput::from_value).collect();
    build_feed(&inputs, channel)
}

/// Serialize `inputs` with an explicit build time.
///
/// `now` is used for `lastBuildDate`, every `pubDate`, and the timestamp part
/// of each `guid`, so one build always carries a single instant. Articles are
/// numbered from 1 in flattened order; the number appears in the `guid` and in
/// the placeholder title of untitled articles.
///
/// # Errors
///
/// Returns [`FeedError`] if the XML writer fails.
pub fn build_feed_at(
    inputs: &[FeedInput],
    channel: &ChannelMeta,
    now: DateTime<Utc>,
) -> Result<Vec<u8>, FeedError> {
    let build_date = now.to_rfc2822();
    let timestamp = now.timestamp();

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "lastBuildDate", &build_date)?;
    write_text_element(&mut writer, "language", &channel.language)?;

    let mut count = 0_usize;
    for (offset, article) in FeedInput::flatten(inputs).enumerate() {
        let index = offset + 1;
        write_item(&mut writer, article, index, timestamp, &build_date)?;
        count = index;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    tracing::debug!(items = count, "built rss feed");
    Ok(writer.into_inner())
}

fn write_item(
    writer: &mut Writer<Vec<u8>>,
    article: &FeedArticle,
    index: usize,
    timestamp: i64,
    build_date: &str,
) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &article.title_or_placeholder(index))?;
    write_text_element(writer, "description", &article.body())?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    // Digits and colons only; no filtering needed.
    writer.write_event(Event::Text(BytesText::new(&format!(
        "trend:{index}:{timestamp}"
    ))))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    write_text_element(writer, "pubDate", build_date)?;

    if !article.tags.is_empty() {
        write_text_element(writer, "tags", &article.tags.join(","))?;
        for tag in &article.tags {
            write_text_element(writer, "category", tag)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// `<name>text</name>`, with `text` escaped exactly once by `BytesText::new`.
fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    let text = strip_invalid_xml_chars(text);
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drops characters outside the XML 1.0 `Char` production. Escaping cannot
/// make them legal, so they never reach the document.
fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
