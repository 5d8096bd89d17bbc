//! CSP violation report types
//!
//! Browsers POST reports as `{"csp-report": {...}}`. The report is logged
//! and acknowledged; nothing is stored.

use serde::{Deserialize, Serialize};

/// Envelope the browser sends to the report endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CspReportBody {
    #[serde(rename = "csp-report")]
    pub csp_report: CspReport,
}

/// The violation payload; all fields optional since browsers vary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CspReport {
    #[serde(rename = "document-uri")]
    pub document_uri: Option<String>,
    pub referrer: Option<String>,
    #[serde(rename = "violated-directive")]
    pub violated_directive: Option<String>,
    #[serde(rename = "effective-directive")]
    pub effective_directive: Option<String>,
    #[serde(rename = "original-policy")]
    pub original_policy: Option<String>,
    #[serde(rename = "blocked-uri")]
    pub blocked_uri: Option<String>,
    #[serde(rename = "status-code")]
    pub status_code: Option<u16>,
    #[serde(rename = "source-file")]
    pub source_file: Option<String>,
    #[serde(rename = "line-number")]
    pub line_number: Option<u64>,
}

impl CspReport {
    /// One-line summary for the log
    pub fn summary(&self) -> String {
        format!(
            "directive={} blocked={} document={}",
            self.effective_directive
                .as_deref()
                .or(self.violated_directive.as_deref())
                .unwrap_or("unknown"),
            self.blocked_uri.as_deref().unwrap_or("unknown"),
            self.document_uri.as_deref().unwrap_or("unknown"),
        )
    }
}
