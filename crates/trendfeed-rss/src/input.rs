//! Input shapes accepted by the feed writer.
//!
//! Generation results reach the writer either as typed values or as loose
//! JSON. [`FeedInput::from_value`] accepts two JSON shapes and ignores
//! everything else:
//!
//! - a wrapper object with an `items` list, e.g. `{"items": [{...}, {...}]}`
//! - a bare article object with at least one of `title`, `summary`,
//!   `content`, `description`, or `tags`

use serde_json::{Map, Value};
use trendfeed_core::{normalize_tags, GeneratedFeedItem, GeneratedItems};

const ARTICLE_KEYS: [&str; 5] = ["title", "summary", "content", "description", "tags"];

/// One `<item>` worth of text before XML escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedArticle {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    /// Used only when neither `summary` nor `content` is present.
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl FeedArticle {
    /// Read an article from a JSON object. Non-string text fields count as
    /// absent; blank strings too.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            title: text_field(object, "title"),
            summary: text_field(object, "summary"),
            content: text_field(object, "content"),
            description: text_field(object, "description"),
            tags: object.get("tags").map_or_else(Vec::new, normalize_tags),
        }
    }

    /// `summary` and `content` joined by a blank line, or whichever one is
    /// present, or the plain `description`, or empty.
    #[must_use]
    pub fn body(&self) -> String {
        match (self.summary.as_deref(), self.content.as_deref()) {
            (Some(summary), Some(content)) => format!("{summary}\n\n{content}"),
            (Some(single), None) | (None, Some(single)) => single.to_string(),
            (None, None) => self.description.clone().unwrap_or_default(),
        }
    }

    /// The article title, or `Untitled {index}` when it has none.
    #[must_use]
    pub fn title_or_placeholder(&self, index: usize) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Untitled {index}"))
    }
}

impl From<GeneratedFeedItem> for FeedArticle {
    fn from(item: GeneratedFeedItem) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            title: clean(Some(item.title)),
            summary: clean(item.summary),
            content: clean(item.content),
            description: clean(item.description),
            tags: item.tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedInput {
    Wrapped(Vec<FeedArticle>),
    Bare(FeedArticle),
}

impl FeedInput {
    /// Classify one loose JSON value. Returns `None` for anything that is
    /// neither a wrapper nor an article.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if let Some(items) = object.get("items").and_then(Value::as_array) {
            let articles = items
                .iter()
                .filter_map(Value::as_object)
                .map(FeedArticle::from_object)
                .collect();
            return Some(Self::Wrapped(articles));
        }

        if ARTICLE_KEYS.iter().any(|key| object.contains_key(*key)) {
            return Some(Self::Bare(FeedArticle::from_object(object)));
        }

        None
    }

    /// Flatten a slice of inputs into articles, preserving order.
    pub fn flatten(inputs: &[Self]) -> impl Iterator<Item = &FeedArticle> {
        inputs.iter().flat_map(|input| match input {
            Self::Wrapped(articles) => articles.as_slice(),
            Self::Bare(article) => std::slice::from_ref(article),
        })
    }
}

impl From<GeneratedItems> for FeedInput {
    fn from(items: GeneratedItems) -> Self {
        Self::Wrapped(items.items.into_iter().map(FeedArticle::from).collect())
    }
}

impl From<GeneratedFeedItem> for FeedInput {
    fn from(item: GeneratedFeedItem) -> Self {
        Self::Bare(FeedArticle::from(item))
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wrapper_skips_non_object_items() {
        let input = FeedInput::from_value(&json!({"items": [{"title": "a"}, 3, "x", {"summary": "s"}]}))
            .expect("wrapper");
        let FeedInput::Wrapped(articles) = input else {
            panic!("expected wrapper");
        };
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("a"));
        assert!(articles[1].title.is_none());
    }

    #[test]
    fn bare_article_needs_a_known_key() {
        assert!(matches!(
            FeedInput::from_value(&json!({"tags": "x"})),
            Some(FeedInput::Bare(_))
        ));
        assert!(FeedInput::from_value(&json!({"unrelated": 1})).is_none());
        assert!(FeedInput::from_value(&json!([{"title": "a"}])).is_none());
        assert!(FeedInput::from_value(&json!("title")).is_none());
        assert!(FeedInput::from_value(&json!(null)).is_none());
    }

    #[test]
    fn items_that_is_not_a_list_falls_through_to_bare() {
        let input = FeedInput::from_value(&json!({"items": "oops", "title": "t"}));
        assert!(matches!(input, Some(FeedInput::Bare(ref a)) if a.title.as_deref() == Some("t")));
    }

    #[test]
    fn body_joins_summary_and_content() {
        let article = FeedArticle {
            summary: Some("s".into()),
            content: Some("c".into()),
            description: Some("ignored".into()),
            ..FeedArticle::default()
        };
        assert_eq!(article.body(), "s\n\nc");
    }

    #[test]
    fn body_falls_back_to_single_field_then_description() {
        let only_content = FeedArticle {
            content: Some("c".into()),
            ..FeedArticle::default()
        };
        assert_eq!(only_content.body(), "c");

        let only_description = FeedArticle {
            description: Some("d".into()),
            ..FeedArticle::default()
        };
        assert_eq!(only_description.body(), "d");

        assert_eq!(FeedArticle::default().body(), "");
    }

    #[test]
    fn text_fields_are_trimmed_and_blank_is_absent() {
        let article = FeedArticle::from_object(
            json!({"title": "  ", "summary": " s ", "content": 5})
                .as_object()
                .expect("object"),
        );
        assert!(article.title.is_none());
        assert_eq!(article.summary.as_deref(), Some("s"));
        assert!(article.content.is_none());
        assert_eq!(article.title_or_placeholder(4), "Untitled 4");
    }

    #[test]
    fn flatten_preserves_order_across_shapes() {
        let inputs = vec![
            FeedInput::Bare(FeedArticle {
                title: Some("1".into()),
                ..FeedArticle::default()
            }),
            FeedInput::Wrapped(vec![
                FeedArticle {
                    title: Some("2".into()),
                    ..FeedArticle::default()
                },
                FeedArticle {
                    title: Some("3".into()),
                    ..FeedArticle::default()
                },
            ]),
        ];
        let titles: Vec<_> = FeedInput::flatten(&inputs)
            .map(|a| a.title.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["1", "2", "3"]);
    }
}
