use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Heading tags counted by the extractor, in report order
pub const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    #[serde(rename = "htmlVersion")]
    pub html_version: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "heading")]
    pub headings: BTreeMap<String, usize>,
    #[serde(flatten)]
    pub link_stats: LinkStats,
    #[serde(rename = "isLoginPage")]
    pub is_login_page: bool,
}

impl Default for PageReport {
    fn default() -> Self {
        Self {
            html_version: String::new(),
            title: String::new(),
            headings: HEADING_LEVELS
                .iter()
                .map(|level| (level.to_string(), 0))
                .collect(),
            link_stats: LinkStats::default(),
            is_login_page: false,
        }
    }
}

impl PageReport {
    pub fn heading_count(&self, level: &str) -> usize {
        self.headings.get(level).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub internal: usize,
    pub external: usize,
    #[serde(rename = "inAccessable")]
    pub unreachable: usize,
}

/// Structural facts gathered in one pass over a page's markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFacts {
    pub html_version: String,
    pub title: String,
    pub headings: BTreeMap<String, usize>,
    /// `href` values in document order, duplicates retained
    pub links: Vec<String>,
}

impl Default for PageFacts {
    fn default() -> Self {
        Self {
            html_version: String::new(),
            title: String::new(),
            headings: PageReport::default().headings,
            links: Vec::new(),
        }
    }
}

impl PageFacts {
    /// Moves the facts into a report, leaving link statistics to the caller
    pub fn into_report(self, link_stats: LinkStats) -> PageReport {
        PageReport {
            html_version: self.html_version,
            title: self.title,
            headings: self.headings,
            link_stats,
            is_login_page: false,
        }
    }
}
