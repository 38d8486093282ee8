//! Article extraction from a parsed HTML document.
//!
//! Pure functions over [`scraper::Html`]; no I/O happens here.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Paragraphs with fewer characters than this are navigation, captions or
/// bylines rather than body text.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

fn selector(css: &str) -> Selector {
  Selector::parse(css).expect("static selector is valid CSS")
}

static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static AUTHORS: Lazy<Selector> = Lazy::new(|| {
  selector(
    r#"meta[name="author"], meta[property="article:author"], [rel="author"], [itemprop="author"]"#,
  )
});
static PUBLISHED: Lazy<Vec<Selector>> = Lazy::new(|| {
  [
    r#"meta[property="article:published_time"]"#,
    r#"meta[itemprop="datePublished"]"#,
    r#"meta[name="pubdate"]"#,
    "time[datetime]",
  ]
  .into_iter()
  .map(selector)
  .collect()
});
static ARTICLE: Lazy<Selector> = Lazy::new(|| selector("article"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

/// Everything pulled out of a page apart from the URL-derived fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extracted {
  pub title:        String,
  pub authors:      Vec<String>,
  pub published_at: Option<DateTime<Utc>>,
  pub text:         String,
}

impl Extracted {
  /// Whether the page produced nothing worth classifying.
  pub fn is_empty(&self) -> bool { self.title.is_empty() && self.text.is_empty() }
}

pub fn extract(document: &Html) -> Extracted {
  Extracted {
    title:        title(document),
    authors:      authors(document),
    published_at: published_at(document),
    text:         body_text(document),
  }
}

fn collapse_whitespace(s: &str) -> String { s.split_whitespace().collect::<Vec<_>>().join(" ") }

fn element_text(el: ElementRef<'_>) -> String { collapse_whitespace(&el.text().collect::<String>()) }

/// `content` for `<meta>` elements, inner text for everything else.
fn value_of(el: ElementRef<'_>) -> String {
  if el.value().name() == "meta" {
    el.value().attr("content").map(collapse_whitespace).unwrap_or_default()
  } else {
    element_text(el)
  }
}

pub fn title(document: &Html) -> String {
  let og = document
    .select(&OG_TITLE)
    .filter_map(|el| el.value().attr("content"))
    .map(collapse_whitespace)
    .find(|t| !t.is_empty());

  og.or_else(|| document.select(&TITLE).map(element_text).find(|t| !t.is_empty()))
    .or_else(|| document.select(&H1).map(element_text).find(|t| !t.is_empty()))
    .unwrap_or_default()
}

pub fn authors(document: &Html) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  for name in document.select(&AUTHORS).map(value_of) {
    if name.is_empty() || looks_like_url(&name) || out.contains(&name) {
      continue;
    }
    out.push(name);
  }
  out
}

fn looks_like_url(s: &str) -> bool {
  let lower = s.to_ascii_lowercase();
  lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
}

pub fn published_at(document: &Html) -> Option<DateTime<Utc>> {
  PUBLISHED.iter().find_map(|sel| {
    document.select(sel).find_map(|el| {
      let raw = if el.value().name() == "time" {
        el.value().attr("datetime")
      } else {
        el.value().attr("content")
      };
      raw.and_then(parse_date)
    })
  })
}

/// RFC 3339, or a bare `YYYY-MM-DD` taken at midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

pub fn body_text(document: &Html) -> String {
  let in_articles: Vec<String> = document
    .select(&ARTICLE)
    .flat_map(|article| article.select(&PARAGRAPH))
    .map(element_text)
    .collect();

  let paragraphs = if in_articles.is_empty() {
    document.select(&PARAGRAPH).map(element_text).collect()
  } else {
    in_articles
  };

  paragraphs
    .into_iter()
    .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
    .collect::<Vec<_>>()
    .join("\n\n")
}
