//! Numbered-heading section splitting and stability filtering.

use std::sync::LazyLock;

use regex::Regex;

/// `2.2.1.S.7` style section numbers are handled by the scope patterns in
/// `clauses`; this only needs plain numeric headings like `4.1.2 Stability`.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*\.?)\s+(.+)$").unwrap());

/// Headings longer than this are treated as body text, not headings.
const MAX_HEADING_CHARS: usize = 200;

/// Substrings (lower-cased) marking a section as stability-relevant.
const STABILITY_KEYWORDS: &[&str] = &[
    "stability",
    "retest period",
    "retest date",
    "shelf life",
    "shelf-life",
    "storage condition",
    "accelerated",
    "long-term",
    "long term",
    "intermediate",
    "stress testing",
    "photostability",
    "in-use stability",
    "in use stability",
    "stability commitment",
    "ongoing stability",
    "stability protocol",
    "stability program",
    "bulk stability",
    "drug substance stability",
    "drug product stability",
    "3.2.s.7",
    "3.2.p.8",
    "s.7",
    "p.8",
];

/// One numbered section with its accumulated body text.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading_number: String,
    pub heading: String,
    /// Page the heading line appeared on.
    pub page: u32,
    pub text: String,
}

impl Section {
    /// Heading as cited in rule traceability: "8.1 Stability summary".
    pub fn full_heading(&self) -> String {
        format!("{} {}", self.heading_number, self.heading)
    }
}

/// Split pages into sections at numbered heading lines. Text before the
/// first heading is discarded; body lines accumulate under the most recent
/// heading, across page breaks.
pub fn identify_sections(pages: &[(u32, String)]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for (page_number, page_text) in pages {
        for line in page_text.lines() {
            let line = line.trim();
            let heading = (line.chars().count() < MAX_HEADING_CHARS)
                .then(|| HEADING_RE.captures(line))
                .flatten();

            if let Some(caps) = heading {
                if let Some(finished) = current.take() {
                    sections.push(finished);
                }
                current = Some(Section {
                    heading_number: caps[1].to_string(),
                    heading: caps[2].trim().to_string(),
                    page: *page_number,
                    text: String::new(),
                });
            } else if let Some(section) = current.as_mut() {
                section.text.push_str(line);
                section.text.push('\n');
            }
        }
    }
    if let Some(finished) = current {
        sections.push(finished);
    }
    sections
}

/// Keep sections whose heading or body mentions a stability keyword.
pub fn filter_stability_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .filter(|section| {
            let combined = format!("{} {}", section.heading, section.text).to_lowercase();
            STABILITY_KEYWORDS.iter().any(|kw| combined.contains(kw))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<(u32, String)> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t.to_string()))
            .collect()
    }

    #[test]
    fn headings_split_sections_and_accumulate_body() {
        let sections = identify_sections(&pages(&[
            "Preamble text ignored.\n\
             4.1 Stability summary\n\
             The applicant should provide data.\n\
             4.2 Packaging\n\
             Container closure details.",
        ]));
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading_number, "4.1");
        assert_eq!(sections[0].heading, "Stability summary");
        assert_eq!(sections[0].text.trim(), "The applicant should provide data.");
        assert_eq!(sections[1].full_heading(), "4.2 Packaging");
    }

    #[test]
    fn body_continues_across_page_breaks() {
        let sections = identify_sections(&pages(&[
            "7 Stability\nData from long-term studies",
            "and accelerated studies should be tabulated.",
        ]));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].page, 1);
        assert!(sections[0].text.contains("accelerated studies"));
    }

    #[test]
    fn long_numbered_lines_are_body_not_headings() {
        let long_line = format!("4 {}", "x".repeat(250));
        let text = format!("1 Intro\n{long_line}");
        let sections = identify_sections(&pages(&[&text]));
        assert_eq!(sections.len(), 1);
        assert!(sections[0].text.contains(&"x".repeat(250)));
    }

    #[test]
    fn stability_filter_checks_heading_and_body() {
        let sections = vec![
            Section {
                heading_number: "4.1".into(),
                heading: "Stability summary".into(),
                page: 1,
                text: String::new(),
            },
            Section {
                heading_number: "5".into(),
                heading: "Manufacturing".into(),
                page: 2,
                text: "The shelf life is assigned from these data.".into(),
            },
            Section {
                heading_number: "6".into(),
                heading: "Labelling".into(),
                page: 3,
                text: "Label text requirements.".into(),
            },
        ];
        let kept = filter_stability_sections(sections);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].heading_number, "4.1");
        assert_eq!(kept[1].heading_number, "5");
    }
}
