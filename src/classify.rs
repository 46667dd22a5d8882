//! Subcategory inference for video listings
//!
//! An ordered keyword rule list: the first rule with a keyword present in the
//! lower-cased name and description wins, otherwise the default tag applies.

/// Categories that get a subcategory at all
pub const VIDEO_CATEGORIES: &[&str] = &[
    "Video",
    "Videos",
    "Video Players",
    "Video Players & Editors",
    "Video Players and Editors",
];

pub const DEFAULT_VIDEO_TAG: &str = "Videos";

pub struct Rule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["movie", "film", "cinema", "theater", "theatre"],
        tag: "Movies",
    },
    Rule {
        keywords: &["short", "clip", "tiktok", "reels", "likee"],
        tag: "Short Videos",
    },
];

pub fn is_video_category(category: &str) -> bool {
    let category = category.trim();
    VIDEO_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
}

/// Subcategory for a listing, or `None` outside the video categories
pub fn classify_subcategory(category: &str, name: &str, description: &str) -> Option<String> {
    if !is_video_category(category) {
        return None;
    }

    let haystack = format!("{name} {description}").to_lowercase();
    let tag = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k)))
        .map_or(DEFAULT_VIDEO_TAG, |rule| rule.tag);

    Some(tag.to_string())
}
