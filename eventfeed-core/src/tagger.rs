//! Tag extraction from event text.
//!
//! Tags come from four places, each evaluated against the lower-cased text:
//! category keywords, `#hashtags`, a single difficulty level and a single time
//! of day. Difficulty and time of day are ordered rule lists where the first
//! matching rule wins.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::EventfeedError;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"));

// "am"/"pm" only count as whole words, optionally glued to a clock time ("9am", "7:30 pm").
static CLOCK_AM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,2}(?::\d{2})?\s?)?(?:am\b|a\.m\.)").expect("am pattern is valid")
});
static CLOCK_PM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,2}(?::\d{2})?\s?)?(?:pm\b|p\.m\.)").expect("pm pattern is valid")
});

/// Activity categories recognised by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Hiking,
    Biking,
    Kayaking,
    Running,
    Camping,
    Climbing,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Hiking,
        Category::Biking,
        Category::Kayaking,
        Category::Running,
        Category::Camping,
        Category::Climbing,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hiking => "hiking",
            Category::Biking => "biking",
            Category::Kayaking => "kayaking",
            Category::Running => "running",
            Category::Camping => "camping",
            Category::Climbing => "climbing",
            Category::General => "general",
        }
    }
}

impl FromStr for Category {
    type Err = EventfeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| EventfeedError::Config(format!("Unknown tag category '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    BeginnerFriendly,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::BeginnerFriendly => "beginner-friendly",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDay {
    Morning,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Evening => "evening",
        }
    }
}

/// A single derived tag.
///
/// Variant order doubles as the iteration order of a `TagSet`, so categories
/// come first (the image query uses the first tag).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Category(Category),
    Difficulty(Difficulty),
    TimeOfDay(TimeOfDay),
    Hashtag(String),
}

impl Tag {
    /// Interpret a hashtag. `#hiking` is the same tag as the hiking category.
    pub fn from_hashtag(word: &str) -> Tag {
        if let Ok(category) = word.parse::<Category>() {
            return Tag::Category(category);
        }
        let difficulty = [
            Difficulty::BeginnerFriendly,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
        .into_iter()
        .find(|d| d.as_str() == word);
        if let Some(d) = difficulty {
            return Tag::Difficulty(d);
        }
        match word {
            "morning" => Tag::TimeOfDay(TimeOfDay::Morning),
            "evening" => Tag::TimeOfDay(TimeOfDay::Evening),
            _ => Tag::Hashtag(word.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tag::Category(c) => c.as_str(),
            Tag::Difficulty(d) => d.as_str(),
            Tag::TimeOfDay(t) => t.as_str(),
            Tag::Hashtag(h) => h,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicated set of tags for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    pub fn insert(&mut self, tag: Tag) {
        self.0.insert(tag);
    }

    pub fn first(&self) -> Option<&Tag> {
        self.0.iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == name)
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strings().join(", "))
    }
}

/// Default category keyword table.
pub static DEFAULT_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Hiking, &["hike", "hiking", "trail", "mountain", "trek"]),
    (
        Category::Biking,
        &["bike", "biking", "cycling", "bicycle", "mountain biking"],
    ),
    (Category::Kayaking, &["kayak", "kayaking", "paddle", "river", "lake"]),
    (
        Category::Running,
        &["run", "running", "jog", "jogging", "trail run"],
    ),
    (
        Category::Camping,
        &["camp", "camping", "backpacking", "overnight"],
    ),
    (
        Category::Climbing,
        &["climb", "climbing", "boulder", "bouldering", "rock climbing"],
    ),
    (
        Category::General,
        &["meetup", "social", "gathering", "meeting"],
    ),
];

static DIFFICULTY_RULES: &[(&[&str], Difficulty)] = &[
    (&["beginner", "easy"], Difficulty::BeginnerFriendly),
    (&["intermediate"], Difficulty::Intermediate),
    (&["advanced", "difficult"], Difficulty::Advanced),
];

/// Derives tags from free text using a category keyword table.
#[derive(Debug, Clone)]
pub struct Tagger {
    keywords: Vec<(Category, Vec<String>)>,
}

impl Default for Tagger {
    fn default() -> Self {
        Tagger::new(DEFAULT_KEYWORDS)
    }
}

impl Tagger {
    pub fn new(table: &[(Category, &[&str])]) -> Self {
        let keywords = table
            .iter()
            .map(|(category, words)| {
                let words = words.iter().map(|w| w.to_lowercase()).collect();
                (*category, words)
            })
            .collect();
        Tagger { keywords }
    }

    /// Add keywords to a category, creating its row if the table lacks one.
    pub fn with_extra_keywords<I, S>(mut self, category: Category, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words.into_iter().map(|w| w.as_ref().to_lowercase());
        match self.keywords.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => existing.extend(words),
            None => self.keywords.push((category, words.collect())),
        }
        self
    }

    pub fn tags(&self, text: &str) -> TagSet {
        let text = text.to_lowercase();
        let mut tags = TagSet::default();

        for (category, words) in &self.keywords {
            if words.iter().any(|w| text.contains(w.as_str())) {
                tags.insert(Tag::Category(*category));
            }
        }

        for caps in HASHTAG.captures_iter(&text) {
            tags.insert(Tag::from_hashtag(&caps[1]));
        }

        if let Some(difficulty) = difficulty_of(&text) {
            tags.insert(Tag::Difficulty(difficulty));
        }

        if let Some(time) = time_of_day(&text) {
            tags.insert(Tag::TimeOfDay(time));
        }

        tags
    }
}

fn difficulty_of(text: &str) -> Option<Difficulty> {
    DIFFICULTY_RULES
        .iter()
        .find(|(words, _)| words.iter().any(|w| text.contains(w)))
        .map(|(_, difficulty)| *difficulty)
}

fn time_of_day(text: &str) -> Option<TimeOfDay> {
    if text.contains("morning") || CLOCK_AM.is_match(text) {
        Some(TimeOfDay::Morning)
    } else if text.contains("evening") || CLOCK_PM.is_match(text) {
        Some(TimeOfDay::Evening)
    } else {
        None
    }
}
