//! Description formatting.
//!
//! Event descriptions are free text that organisers tend to structure with
//! marker lines ("What to bring:", "Requirements", "Meeting point"). The
//! formatter walks the lines, routes content into sections and renders each
//! non-empty section as its own HTML block.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity, unescape_with};

// Longest HTML5 entity name is 31 chars plus '&' and ';'
const MAX_ENTITY_LEN: usize = 33;

// HTML4 names that HTML parsers still decode when the ';' is missing
static LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr",
    "micro", "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm",
    "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy",
    "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Description,
    Requirements,
    WhatToBring,
    MeetingPoint,
}

impl Section {
    /// Fixed render order.
    pub const ORDER: [Section; 4] = [
        Section::Description,
        Section::Requirements,
        Section::WhatToBring,
        Section::MeetingPoint,
    ];

    fn css_class(&self) -> &'static str {
        match self {
            Section::Description => "event-description",
            Section::Requirements => "event-requirements",
            Section::WhatToBring => "event-what-to-bring",
            Section::MeetingPoint => "event-meeting-point",
        }
    }

    fn heading(&self) -> Option<&'static str> {
        match self {
            Section::Description => None,
            Section::Requirements => Some("Requirements"),
            Section::WhatToBring => Some("What to Bring"),
            Section::MeetingPoint => Some("Meeting Point"),
        }
    }

    fn index(&self) -> usize {
        match self {
            Section::Description => 0,
            Section::Requirements => 1,
            Section::WhatToBring => 2,
            Section::MeetingPoint => 3,
        }
    }
}

/// Marker rules, checked in order against the lower-cased line.
static MARKERS: &[(fn(&str) -> bool, Section)] = &[
    (
        |l| l.contains("what to bring") || l.contains("bring:"),
        Section::WhatToBring,
    ),
    (
        |l| l.contains("requirements") || l.contains("required:"),
        Section::Requirements,
    ),
    (
        |l| l.contains("meeting") && (l.contains("point") || l.contains("location")),
        Section::MeetingPoint,
    ),
];

/// Return the section a marker line switches to, if the line is a marker.
pub fn marker_for(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    MARKERS
        .iter()
        .find(|(matches, _)| matches(&lower))
        .map(|(_, section)| *section)
}

/// Description text split into its sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    contents: [String; 4],
}

impl Sections {
    /// Split raw (possibly entity-escaped) description text.
    pub fn split(raw: &str) -> Self {
        let text = unescape_html(raw);
        let mut sections = Sections::default();
        let mut current = Section::Description;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(next) = marker_for(line) {
                current = next;
                continue;
            }
            let body = &mut sections.contents[current.index()];
            body.push_str(line);
            body.push('\n');
        }

        sections
    }

    /// Raw content of a section, one line per entry, each ending in `\n`.
    pub fn get(&self, section: Section) -> &str {
        &self.contents[section.index()]
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();

        for section in Section::ORDER {
            let body = self.get(section).trim();
            match section.heading() {
                None => {
                    html.push_str(&format!(
                        "\n<div class=\"{}\">\n    {}\n</div>\n",
                        section.css_class(),
                        body
                    ));
                }
                Some(_) if body.is_empty() => {}
                Some(heading) => {
                    html.push_str(&format!(
                        "\n<div class=\"{}\">\n    <h4>{}</h4>\n    <p>{}</p>\n</div>\n",
                        section.css_class(),
                        heading,
                        body
                    ));
                }
            }
        }

        html
    }
}

/// Formats event descriptions into sectioned HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionFormatter;

impl DescriptionFormatter {
    pub fn format(&self, raw: &str) -> String {
        Sections::split(raw).to_html()
    }
}

/// Decode HTML character references.
///
/// A `&` that doesn't start a known reference is kept as-is, so plain text like
/// "Q&A" survives. Like browsers, numeric references and the legacy HTML4 names
/// (`&amp`, `&copy`, ...) are also accepted without the trailing `;`.
pub fn unescape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    if let Ok(decoded) = unescape_with(raw, resolve_entity) {
        return decoded;
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match terminated_reference(rest).or_else(|| unterminated_reference(rest)) {
            Some((len, decoded)) => {
                out.push_str(&decoded);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// `&name;` or `&#NN;` at the start of `rest`, as (byte length, decoded text).
fn terminated_reference(rest: &str) -> Option<(usize, String)> {
    let (end, _) = rest
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| *c == ';')?;
    let candidate = &rest[..=end];
    let decoded = unescape_with(candidate, resolve_entity).ok()?;
    Some((candidate.len(), decoded.into_owned()))
}

/// `&#NN`, `&#xNN` or a legacy name with no `;`. Names match by longest prefix,
/// so `&copy2024` is "©2024".
fn unterminated_reference(rest: &str) -> Option<(usize, String)> {
    let body = &rest[1..];

    if let Some(num) = body.strip_prefix('#') {
        let (digits, radix, prefix_len) = match num.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (num, 10, 1),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let decoded = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some((1 + prefix_len + len, decoded.to_string()));
    }

    LEGACY_ENTITIES
        .iter()
        .filter(|name| body.starts_with(**name))
        .max_by_key(|name| name.len())
        .and_then(|name| resolve_entity(name).map(|s| (1 + name.len(), s.to_string())))
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or_else(|| resolve_html5_entity(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bring_marker_routes_following_lines() {
        let sections = Sections::split("Bring:\nwater\nsnacks\n");

        assert_eq!(sections.get(Section::WhatToBring), "water\nsnacks\n");
        assert_eq!(sections.get(Section::Description), "");

        let html = sections.to_html();
        assert!(html.contains("<div class=\"event-what-to-bring\">"));
        assert!(html.contains("<p>water\nsnacks</p>"));
        assert!(html.contains("<div class=\"event-description\">\n    \n</div>"));
    }

    #[test]
    fn test_what_to_bring_content_appears_only_in_its_block() {
        let html = DescriptionFormatter.format(
            "A gentle loop around the lake.\n\nWhat to Bring:\nheadlamp\nrain jacket",
        );

        let bring_start = html.find("event-what-to-bring").unwrap();
        assert_eq!(html.matches("headlamp").count(), 1);
        assert!(html.find("headlamp").unwrap() > bring_start);
        assert!(!html.contains("What to Bring:"));
    }

    #[test]
    fn test_all_sections_render_in_fixed_order() {
        let raw = "Meeting point: trailhead lot\n\
                   Lot B near the kiosk\n\
                   Requirements\n\
                   Good boots\n\
                   What to bring\n\
                   Lunch\n\
                   Description sentence is lost after markers";
        let html = DescriptionFormatter.format(raw);

        let desc = html.find("event-description").unwrap();
        let req = html.find("event-requirements").unwrap();
        let bring = html.find("event-what-to-bring").unwrap();
        let meet = html.find("event-meeting-point").unwrap();
        assert!(desc < req && req < bring && bring < meet);

        assert!(html.contains("<p>Lot B near the kiosk</p>"));
        assert!(html.contains("<p>Good boots</p>"));
        assert!(html.contains("<p>Lunch\nDescription sentence is lost after markers</p>"));
    }

    #[test]
    fn test_empty_optional_sections_are_omitted() {
        let html = DescriptionFormatter.format("Just a walk.\nRequirements\n   \n");
        assert!(html.contains("Just a walk."));
        assert!(!html.contains("event-requirements"));
        assert!(!html.contains("<h4>"));
    }

    #[test]
    fn test_marker_precedence() {
        // Both "bring:" and "required:" present; what-to-bring is checked first
        assert_eq!(
            marker_for("Required: bring: sunscreen"),
            Some(Section::WhatToBring)
        );
        assert_eq!(marker_for("MEETING LOCATION"), Some(Section::MeetingPoint));
        assert_eq!(marker_for("Team meeting at noon"), None);
    }

    #[test]
    fn test_unescape_html_entities() {
        assert_eq!(unescape_html("Fish &amp; chips"), "Fish & chips");
        assert_eq!(unescape_html("&lt;b&gt;"), "<b>");
        assert_eq!(unescape_html("caf&eacute; &#233; &#x41;"), "café é A");
        assert_eq!(unescape_html("no entities"), "no entities");
    }

    #[test]
    fn test_unescape_html_keeps_bare_ampersands() {
        assert_eq!(unescape_html("Q&A at 5 &amp; snacks"), "Q&A at 5 & snacks");
        assert_eq!(unescape_html("rock & roll"), "rock & roll");
        assert_eq!(unescape_html("&bogus; &amp;"), "&bogus; &");
    }

    #[test]
    fn test_unescape_html_without_semicolons() {
        assert_eq!(
            unescape_html("Fish &amp chips &copy 2024 &#39quoted"),
            "Fish & chips \u{a9} 2024 'quoted"
        );
        assert_eq!(unescape_html("&#x41B and &lt;3"), "\u{41b} and <3");
        assert_eq!(unescape_html("&copyright"), "\u{a9}right");
        assert_eq!(unescape_html("&#; &#x; &q"), "&#; &#x; &q");
    }

    #[test]
    fn test_escaped_marker_lines_are_recognised() {
        let sections = Sections::split("Meeting&nbsp;point&#58;\nNorth gate");
        // &nbsp; decodes to U+00A0, so "meeting" and "point" are still both present
        assert_eq!(sections.get(Section::MeetingPoint), "North gate\n");
    }
}
