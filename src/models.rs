// src/models.rs
// =============================================================================
// The report produced by one analysis run.
//
// AnalysisResult is created zeroed at the start of an analysis, filled in
// by the document walk (structural fields) and by the link aggregator
// (inaccessible_links), and handed back to the caller when the analysis
// finishes. Serialized, it is a flat JSON record.
// =============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::AnalysisError;

/// Version string used when no doctype tells us better
pub const UNKNOWN_HTML_VERSION: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// URL that was analyzed (normalized once validation succeeds)
    pub url: String,
    pub html_version: String,
    pub page_title: String,
    /// "h1".."h6" -> number of headings at that level
    pub headings: BTreeMap<String, usize>,
    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_links: usize,
    pub has_login_form: bool,
    pub images: Vec<ImageInfo>,
    pub meta_tags: Vec<MetaTag>,
    pub scripts: Vec<ScriptInfo>,
    pub stylesheets: Vec<StylesheetInfo>,
    pub forms: Vec<FormInfo>,
    pub tables: usize,
    pub lists: usize,
    pub buttons: usize,
    pub inputs: usize,
    pub text_content: TextContentInfo,
    pub accessibility: AccessibilityInfo,
    /// Wall-clock time of the whole analysis, rendered like "1.234s"
    #[serde(serialize_with = "serialize_duration")]
    pub analysis_time: Duration,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub http_status_code: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub width: String,
    pub height: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
    pub property: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptInfo {
    pub src: String,
    #[serde(rename = "type")]
    pub script_type: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StylesheetInfo {
    pub href: String,
    pub media: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormInfo {
    pub action: String,
    /// Upper-cased, empty when the form has no method attribute
    pub method: String,
    pub has_login: bool,
    pub input_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextContentInfo {
    pub word_count: usize,
    pub char_count: usize,
    pub paragraphs: usize,
    pub has_main_content: bool,
}

// Flags only ever go from false to true during a walk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessibilityInfo {
    pub has_alt_text: bool,
    pub has_aria_labels: bool,
    pub has_semantic_html: bool,
    pub has_skip_links: bool,
}

impl AnalysisResult {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            html_version: UNKNOWN_HTML_VERSION.to_string(),
            page_title: String::new(),
            headings: BTreeMap::new(),
            internal_links: 0,
            external_links: 0,
            inaccessible_links: 0,
            has_login_form: false,
            images: Vec::new(),
            meta_tags: Vec::new(),
            scripts: Vec::new(),
            stylesheets: Vec::new(),
            forms: Vec::new(),
            tables: 0,
            lists: 0,
            buttons: 0,
            inputs: 0,
            text_content: TextContentInfo::default(),
            accessibility: AccessibilityInfo::default(),
            analysis_time: Duration::ZERO,
            timestamp: Utc::now(),
            error: String::new(),
            http_status_code: 200,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>, status_code: u16) {
        self.error = message.into();
        self.http_status_code = status_code;
    }

    // Records a pipeline failure using its own message and status mapping
    pub fn fail(&mut self, err: &AnalysisError) {
        self.set_error(err.to_string(), err.status_code());
    }

    pub fn add_heading(&mut self, level: &str) {
        *self.headings.entry(level.to_string()).or_insert(0) += 1;
    }

    pub fn is_successful(&self) -> bool {
        self.error.is_empty()
    }
}

fn serialize_duration<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:?}", value))
}

fn is_zero(value: &u16) -> bool {
    *value == 0
}
