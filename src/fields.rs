//! Per-field extraction cascades
//!
//! Every field of [`ListingRecord`] has an ordered list of strategies:
//! the selector for the current page layout, selectors from earlier layouts,
//! a generic structural fallback, and finally the structured-data block.
//! A miss in one field never affects another.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::classify::classify_subcategory;
use crate::document::ListingDocument;
use crate::error::{Error, Result};
use crate::extractors::{
    absolutize_url, body_text, first_match, itemprop_value, labelled_value, meta_name,
    meta_property, select_first_attr, select_first_image_url, select_first_text,
    structured_text, structured_urls, structured_value, Strategy,
};
use crate::record::{ListingRecord, DEFAULT_DOWNLOAD_LABEL, DEFAULT_VERSION};
use crate::screenshots::extract_screenshots;

/// Derived short descriptions keep this many characters of the description
pub const SHORT_DESCRIPTION_CHARS: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Store suffixes appended to page titles
const TITLE_SUFFIXES: &[&str] = &[
    " - Apps on Google Play",
    " – Apps on Google Play",
    " - Google Play",
];

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid number regex"));
static DOWNLOADS_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,.]*\s*[KMB]?\+)\s*(?:downloads|installs)")
        .expect("valid downloads regex")
});

/// Parse a fetched listing page into a record
///
/// Fails with [`Error::NotFound`] only when no strategy can find a name.
pub fn parse_listing(identifier: &str, html: &str) -> Result<ListingRecord> {
    let doc = ListingDocument::parse(html);
    extract_record(identifier, &doc)
}

pub fn extract_record(identifier: &str, doc: &ListingDocument) -> Result<ListingRecord> {
    let Some(name) = first_match(doc, "name", NAME) else {
        debug!(identifier, "no name found on page");
        return Err(Error::NotFound(identifier.to_string()));
    };

    let description = first_match(doc, "description", DESCRIPTION).unwrap_or_default();
    let short_description = first_match(doc, "short_description", SUMMARY)
        .unwrap_or_else(|| derive_short_description(&description));
    let developer_name = first_match(doc, "developer_name", DEVELOPER).unwrap_or_default();
    let category = first_match(doc, "category", CATEGORY).unwrap_or_default();
    let icon_url = first_match(doc, "icon_url", ICON).unwrap_or_default();
    let rating = first_match(doc, "rating", RATING)
        .map(|raw| parse_rating(&raw))
        .unwrap_or(0.0);
    let version =
        first_match(doc, "version", VERSION).unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let download_count_label = first_match(doc, "download_count_label", DOWNLOADS)
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_LABEL.to_string());
    let screenshot_urls = extract_screenshots(doc);
    let sub_category = classify_subcategory(&category, &name, &description);

    debug!(
        identifier,
        %name,
        %category,
        screenshots = screenshot_urls.len(),
        "extracted listing"
    );

    Ok(ListingRecord {
        name,
        description,
        short_description,
        developer_name,
        category,
        sub_category,
        icon_url,
        screenshot_urls,
        rating,
        version,
        download_count_label,
    })
}

/// First 100 characters of the description plus an ellipsis, or the
/// description itself when it is short enough
pub fn derive_short_description(description: &str) -> String {
    if description.chars().count() <= SHORT_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let head: String = description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
    format!("{head}{ELLIPSIS}")
}

/// First numeric substring of a rating text; `0` when absent or invalid
pub fn parse_rating(raw: &str) -> f64 {
    NUMBER_RE
        .find(raw)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r >= 0.0)
        .unwrap_or(0.0)
}

/// Turn `VIDEO_PLAYERS` into `Video Players`; leave human labels alone
pub fn humanize_category(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.contains('_') && raw.chars().any(|c| c.is_lowercase()) {
        return raw.to_string();
    }

    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Render a raw install count as a grouped label, e.g. `1000000` -> `1,000,000+`
pub fn format_download_count(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push('+');
    grouped
}

fn strip_title_suffix(title: String) -> String {
    for suffix in TITLE_SUFFIXES {
        if let Some(stripped) = title.strip_suffix(suffix) {
            return stripped.trim().to_string();
        }
    }
    title
}

fn structured(doc: &ListingDocument, path: &[&str]) -> Option<String> {
    structured_text(doc.structured()?, path)
}

// Name

const NAME: &[Strategy<String>] = &[
    Strategy::new("h1[itemprop=name]", |d| select_first_text(d.html(), r#"h1[itemprop="name"]"#)),
    Strategy::new("legacy title heading", |d| select_first_text(d.html(), "h1.Fd93Bb, h1.AHFaub")),
    Strategy::new("first h1", |d| select_first_text(d.html(), "h1")),
    Strategy::new("og:title", |d| meta_property(d.html(), "og:title").map(strip_title_suffix)),
    Strategy::new("title tag", |d| select_first_text(d.html(), "title").map(strip_title_suffix)),
    Strategy::new("structured name", |d| structured(d, &["name"])),
];

// Description

const DESCRIPTION: &[Strategy<String>] = &[
    Strategy::new("description block", |d| {
        select_first_text(d.html(), r#"div[data-g-id="description"]"#)
    }),
    Strategy::new("legacy description", |d| {
        select_first_text(d.html(), r#"div[itemprop="description"], div.bARER, div.DWPxHb"#)
    }),
    Strategy::new("itemprop description", |d| itemprop_value(d.html(), "description")),
    Strategy::new("og:description", |d| meta_property(d.html(), "og:description")),
    Strategy::new("structured description", |d| structured(d, &["description"])),
];

/// Page-supplied summaries; the short description is derived when none match
const SUMMARY: &[Strategy<String>] = &[
    Strategy::new("meta description", |d| meta_name(d.html(), "description")),
    Strategy::new("og:description", |d| meta_property(d.html(), "og:description")),
];

// Developer

const DEVELOPER: &[Strategy<String>] = &[
    Strategy::new("developer link", |d| select_first_text(d.html(), "div.Vbfug.auoIOc a span")),
    Strategy::new("developer page link", |d| {
        select_first_text(d.html(), r#"a[href*="/store/apps/dev"]"#)
    }),
    Strategy::new("itemprop author", |d| {
        select_first_text(d.html(), r#"[itemprop="author"] [itemprop="name"]"#).or_else(|| {
            select_first_attr(d.html(), r#"[itemprop="author"] meta[itemprop="name"]"#, "content")
        })
    }),
    Strategy::new("structured author", |d| {
        structured(d, &["author", "name"]).or_else(|| structured(d, &["author"]))
    }),
];

// Category

const CATEGORY: &[Strategy<String>] = &[
    Strategy::new("genre link", |d| select_first_text(d.html(), r#"a[itemprop="genre"]"#)),
    Strategy::new("category link", |d| {
        select_first_text(d.html(), r#"a[href*="/store/apps/category/"]"#)
    }),
    Strategy::new("genre meta", |d| {
        select_first_attr(d.html(), r#"meta[itemprop="genre"]"#, "content")
    }),
    Strategy::new("structured category", |d| {
        structured(d, &["applicationCategory"])
            .or_else(|| structured(d, &["genre"]))
            .map(|c| humanize_category(&c))
    }),
];

// Icon

const ICON: &[Strategy<String>] = &[
    Strategy::new("img[itemprop=image]", |d| {
        select_first_image_url(d.html(), r#"img[itemprop="image"]"#)
    }),
    Strategy::new("legacy icon", |d| {
        select_first_image_url(d.html(), "img.T75of.cN0oRe, div.xSyT2c img")
    }),
    Strategy::new("og:image", |d| {
        meta_property(d.html(), "og:image").map(|u| absolutize_url(&u))
    }),
    Strategy::new("structured image", |d| {
        let image = structured_value(d.structured()?, &["image"])?;
        structured_urls(image).into_iter().next()
    }),
];

// Rating (raw text, parsed by parse_rating)

const RATING: &[Strategy<String>] = &[
    Strategy::new("rating badge", |d| select_first_text(d.html(), "div.TT9eCd")),
    Strategy::new("legacy rating", |d| select_first_text(d.html(), "div.BHMmbe")),
    Strategy::new("star rating label", |d| {
        select_first_attr(d.html(), r#"[itemprop="starRating"] [aria-label]"#, "aria-label")
            .or_else(|| select_first_attr(d.html(), r#"div[aria-label*="Rated"]"#, "aria-label"))
    }),
    Strategy::new("itemprop ratingValue", |d| itemprop_value(d.html(), "ratingValue")),
    Strategy::new("structured rating", |d| {
        structured(d, &["aggregateRating", "ratingValue"])
    }),
];

// Version (labelled rows and data only; free text mentions OS versions)

const VERSION: &[Strategy<String>] = &[
    Strategy::new("itemprop softwareVersion", |d| {
        itemprop_value(d.html(), "softwareVersion")
    }),
    Strategy::new("about rows", |d| {
        labelled_value(d.html(), "div.sMUprd", "div.q078ud", "div.reAt0", &["Version"])
    }),
    Strategy::new("legacy info rows", |d| {
        let labels = &["Current Version", "Version"];
        labelled_value(d.html(), "div.hAyfc", ".BgcNfc", ".htlgb", labels)
    }),
    Strategy::new("structured version", |d| structured(d, &["softwareVersion"])),
];

// Download count

const DOWNLOADS: &[Strategy<String>] = &[
    Strategy::new("stat rows", |d| {
        labelled_value(d.html(), "div.wVqUob", "div.g1rdde", "div.ClM7O", &["Downloads"])
    }),
    Strategy::new("legacy info rows", |d| {
        labelled_value(d.html(), "div.hAyfc", ".BgcNfc", ".htlgb", &["Installs", "Downloads"])
            .or_else(|| itemprop_value(d.html(), "numDownloads"))
    }),
    Strategy::new("downloads text", |d| {
        let text = body_text(d.html())?;
        let caps = DOWNLOADS_TEXT_RE.captures(&text)?;
        Some(caps[1].split_whitespace().collect())
    }),
    Strategy::new("structured interaction count", |d| {
        let count = structured_value(
            d.structured()?,
            &["interactionStatistic", "userInteractionCount"],
        )?;
        match count {
            Value::Number(n) => n.as_u64().map(format_download_count),
            Value::String(s) => match s.trim().parse::<u64>() {
                Ok(n) => Some(format_download_count(n)),
                Err(_) => crate::extractors::non_empty(s),
            },
            _ => None,
        }
    }),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> ListingDocument {
        ListingDocument::parse(html)
    }

    #[test]
    fn test_current_layout() {
        let html = r#"
        <html>
        <head>
            <title>Stream Box - Apps on Google Play</title>
            <meta name="description" content="Stream films anywhere.">
            <meta property="og:image" content="https://cdn/og.png">
        </head>
        <body>
            <img itemprop="image" src="https://cdn/icon=w240-h480-rw">
            <h1 itemprop="name"><span>Stream Box</span></h1>
            <div class="Vbfug auoIOc">
                <a href="/store/apps/dev?id=1"><span>Box Media</span></a>
            </div>
            <a itemprop="genre" href="/store/apps/category/VIDEO_PLAYERS">
                Video Players &amp; Editors
            </a>
            <div class="TT9eCd">4.4star</div>
            <div class="wVqUob">
                <div class="ClM7O">5M+</div><div class="g1rdde">Downloads</div>
            </div>
            <div class="sMUprd">
                <div class="q078ud">Version</div><div class="reAt0">7.2.0</div>
            </div>
            <div data-g-id="description">Watch   every cinema release.<br>Offline too.</div>
        </body>
        </html>
        "#;

        let record = parse_listing("com.example.box", html).unwrap();
        assert_eq!(record.name, "Stream Box");
        assert_eq!(record.developer_name, "Box Media");
        assert_eq!(record.category, "Video Players & Editors");
        assert_eq!(record.sub_category.as_deref(), Some("Movies"));
        assert_eq!(record.icon_url, "https://cdn/icon=w240-h480-rw");
        assert_eq!(record.rating, 4.4);
        assert_eq!(record.version, "7.2.0");
        assert_eq!(record.download_count_label, "5M+");
        assert_eq!(record.description, "Watch every cinema release. Offline too.");
        assert_eq!(record.short_description, "Stream films anywhere.");
        assert!(record.screenshot_urls.is_empty());
    }

    #[test]
    fn test_legacy_layout() {
        let html = r#"
        <html><body>
            <h1 class="AHFaub"><span>Old Notes</span></h1>
            <a href="/store/apps/developer?id=Old+Co">Old Co</a>
            <a href="/store/apps/category/PRODUCTIVITY">Productivity</a>
            <div class="BHMmbe">4,1</div>
            <div class="hAyfc">
                <div class="BgcNfc">Installs</div><span class="htlgb">100,000+</span>
            </div>
            <div class="hAyfc">
                <div class="BgcNfc">Current Version</div><span class="htlgb">2.0.3</span>
            </div>
            <div itemprop="description"><span>Take notes.</span></div>
        </body></html>
        "#;

        let record = parse_listing("com.example.notes", html).unwrap();
        assert_eq!(record.name, "Old Notes");
        assert_eq!(record.developer_name, "Old Co");
        assert_eq!(record.category, "Productivity");
        assert_eq!(record.sub_category, None);
        assert_eq!(record.rating, 4.1);
        assert_eq!(record.download_count_label, "100,000+");
        assert_eq!(record.version, "2.0.3");
        assert_eq!(record.short_description, "Take notes.");
    }

    #[test]
    fn test_structured_data_only() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@type": "SoftwareApplication",
            "name": "Json App",
            "description": "Described in JSON.",
            "applicationCategory": "VIDEO_PLAYERS",
            "image": {"url": "https://cdn/json-icon.png"},
            "author": {"@type": "Person", "name": "Json Dev"},
            "aggregateRating": {"ratingValue": "3.9"},
            "softwareVersion": "1.2.3",
            "interactionStatistic": {"userInteractionCount": 2500000}
        }
        </script>
        </head><body></body></html>
        "#;

        let record = parse_listing("com.example.json", html).unwrap();
        assert_eq!(record.name, "Json App");
        assert_eq!(record.description, "Described in JSON.");
        assert_eq!(record.short_description, "Described in JSON.");
        assert_eq!(record.category, "Video Players");
        assert_eq!(record.sub_category.as_deref(), Some("Videos"));
        assert_eq!(record.icon_url, "https://cdn/json-icon.png");
        assert_eq!(record.developer_name, "Json Dev");
        assert_eq!(record.rating, 3.9);
        assert_eq!(record.version, "1.2.3");
        assert_eq!(record.download_count_label, "2,500,000+");
    }

    #[test]
    fn test_sparse_page_gets_defaults() {
        let html = "<html><body><h1>Bare</h1></body></html>";
        let record = parse_listing("com.example.sparse", html).unwrap();
        assert_eq!(record.name, "Bare");
        assert_eq!(record.description, "");
        assert_eq!(record.short_description, "");
        assert_eq!(record.developer_name, "");
        assert_eq!(record.category, "");
        assert_eq!(record.sub_category, None);
        assert_eq!(record.icon_url, "");
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.version, DEFAULT_VERSION);
        assert_eq!(record.download_count_label, DEFAULT_DOWNLOAD_LABEL);
    }

    #[test]
    fn test_no_name_is_not_found() {
        let err = parse_listing("com.example.missingapp", "<html><body><p>Gone</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == "com.example.missingapp"));
    }

    #[test]
    fn test_title_fallback_strips_suffix() {
        let record = parse_listing(
            "com.example.t",
            "<html><head><title>Tiny - Apps on Google Play</title></head></html>",
        )
        .unwrap();
        assert_eq!(record.name, "Tiny");
    }

    #[test]
    fn test_malformed_structured_data_does_not_abort() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">{"@type": "SoftwareApplication", "name": </script>
        </head><body><h1>Still Here</h1><div class="TT9eCd">4.0</div></body></html>
        "#;
        let record = parse_listing("com.example.bad", html).unwrap();
        assert_eq!(record.name, "Still Here");
        assert_eq!(record.rating, 4.0);
    }

    #[test]
    fn test_downloads_text_fallback() {
        let html = r#"
        <html><body>
            <h1>Texty</h1>
            <p>Over 1M+ downloads worldwide</p>
        </body></html>
        "#;
        let d = doc(html);
        assert_eq!(first_match(&d, "download_count_label", DOWNLOADS).unwrap(), "1M+");
    }

    #[test]
    fn test_version_in_description_is_ignored() {
        let html = r#"
        <html><body>
            <h1>Cam</h1>
            <div data-g-id="description">Requires Android version 8.0 or later.</div>
        </body></html>
        "#;
        let record = parse_listing("com.example.cam", html).unwrap();
        assert_eq!(record.version, DEFAULT_VERSION);
        assert_eq!(record.description, "Requires Android version 8.0 or later.");
    }

    #[test]
    fn test_line_breaks_in_description_keep_words_apart() {
        let html = r#"
        <html><body>
            <h1>Clipper</h1>
            <div data-g-id="description">Record clips<br>Share instantly</div>
        </body></html>
        "#;
        let record = parse_listing("com.example.clipper", html).unwrap();
        assert_eq!(record.description, "Record clips Share instantly");
        assert_eq!(record.short_description, "Record clips Share instantly");
    }

    #[test]
    fn test_protocol_relative_og_image_icon() {
        let html = r#"
        <html><head>
            <meta property="og:image" content="//cdn.example/og-icon.png">
        </head><body><h1>Og</h1></body></html>
        "#;
        let record = parse_listing("com.example.og", html).unwrap();
        assert_eq!(record.icon_url, "https://cdn.example/og-icon.png");
    }

    #[test]
    fn test_derive_short_description() {
        assert_eq!(derive_short_description(""), "");
        assert_eq!(derive_short_description("short"), "short");

        let exact = "a".repeat(100);
        assert_eq!(derive_short_description(&exact), exact);

        let long = "é".repeat(150);
        let short = derive_short_description(&long);
        assert_eq!(short, format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5star"), 4.5);
        assert_eq!(parse_rating("Rated 4.3 stars out of five stars"), 4.3);
        assert_eq!(parse_rating("3,8"), 3.8);
        assert_eq!(parse_rating("no rating yet"), 0.0);
        assert_eq!(parse_rating(""), 0.0);
    }

    #[test]
    fn test_humanize_category() {
        assert_eq!(humanize_category("VIDEO_PLAYERS"), "Video Players");
        assert_eq!(humanize_category("GAME_ACTION"), "Game Action");
        assert_eq!(humanize_category("Video Players & Editors"), "Video Players & Editors");
        assert_eq!(humanize_category("TOOLS"), "Tools");
    }

    #[test]
    fn test_format_download_count() {
        assert_eq!(format_download_count(0), "0+");
        assert_eq!(format_download_count(999), "999+");
        assert_eq!(format_download_count(10000), "10,000+");
        assert_eq!(format_download_count(1000000), "1,000,000+");
    }
}
