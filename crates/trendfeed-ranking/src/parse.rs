//! Regex extraction of ranking entries from the ranking page HTML.
//!
//! The page groups entries per press in `div.rankingnews_box` blocks. Each
//! block names the press in `.rankingnews_name` and lists entries as
//! `ul.rankingnews_list > li`, where `em.list_ranking_num` carries the rank
//! and `a.list_title` carries the title and article link.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use trendfeed_core::RankingNewsItem;

/// Naver section ids (`sid1` / `sid` query parameter) and their names.
pub const SECTION_CATEGORIES: [(&str, &str); 7] = [
    ("100", "정치"),
    ("101", "경제"),
    ("102", "사회"),
    ("103", "생활/문화"),
    ("104", "세계"),
    ("105", "IT/과학"),
    ("110", "오피니언"),
];

static BOX_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*class\s*=\s*["'][^"']*\brankingnews_box\b[^"']*["'][^>]*>"#)
        .expect("valid regex")
});
static PRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<[a-z0-9]+\b[^>]*class\s*=\s*["'][^"']*\brankingnews_name\b[^"']*["'][^>]*>(.*?)</"#,
    )
    .expect("valid regex")
});
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<ul\b[^>]*class\s*=\s*["'][^"']*\brankingnews_list\b[^"']*["'][^>]*>(.*?)</ul>"#,
    )
    .expect("valid regex")
});
static LI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li>").expect("valid regex"));
static RANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<em\b[^>]*class\s*=\s*["'][^"']*\blist_ranking_num\b[^"']*["'][^>]*>(.*?)</em>"#,
    )
    .expect("valid regex")
});
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("valid regex"));
static TITLE_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)class\s*=\s*["'][^"']*\blist_title\b[^"']*["']"#).expect("valid regex")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

/// Parse every ranking entry on the page, in page order.
///
/// Blocks without a press name are skipped, as are entries missing a title,
/// an href, or a numeric rank. Links are resolved against `page_url`.
#[must_use]
pub fn parse_ranking_html(html: &str, page_url: &Url) -> Vec<RankingNewsItem> {
    let starts: Vec<usize> = BOX_START_RE.find_iter(html).map(|m| m.start()).collect();
    let mut items = Vec::new();

    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(html.len());
        parse_box(&html[start..end], page_url, &mut items);
    }

    items
}

fn parse_box(block: &str, page_url: &Url, out: &mut Vec<RankingNewsItem>) {
    let Some(press) = PRESS_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|p| !p.is_empty())
    else {
        return;
    };

    for list in LIST_RE.captures_iter(block) {
        let Some(list_body) = list.get(1) else {
            continue;
        };
        for li in LI_RE.captures_iter(list_body.as_str()) {
            let Some(entry) = li.get(1) else {
                continue;
            };
            if let Some(item) = parse_entry(entry.as_str(), &press, page_url) {
                out.push(item);
            }
        }
    }
}

fn parse_entry(entry: &str, press: &str, page_url: &Url) -> Option<RankingNewsItem> {
    let (attrs, inner) = ANCHOR_RE.captures_iter(entry).find_map(|c| {
        let attrs = c.get(1)?.as_str();
        TITLE_CLASS_RE
            .is_match(attrs)
            .then(|| (attrs, c.get(2).map_or("", |m| m.as_str())))
    })?;

    let title = clean_text(inner);
    if title.is_empty() {
        return None;
    }

    let href = HREF_RE
        .captures(attrs)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|h| !h.is_empty())?;
    let link = page_url.join(&href).ok()?.to_string();

    let rank = RANK_RE
        .captures(entry)
        .and_then(|c| c.get(1))
        .and_then(|m| clean_text(m.as_str()).parse::<i32>().ok())
        .filter(|rank| *rank > 0)?;

    Some(RankingNewsItem {
        press: press.to_string(),
        category: category_from_link(&link),
        rank,
        title,
        link,
    })
}

/// Section name for an article link, read from `sid1` and then `sid`.
#[must_use]
pub fn category_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    };
    let sid = param("sid1").or_else(|| param("sid"))?;

    SECTION_CATEGORIES
        .iter()
        .find(|(code, _)| *code == sid)
        .map(|(_, name)| (*name).to_string())
}

/// Strip tags, decode entities, and collapse whitespace.
fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => numeric_entity(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_entity(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
