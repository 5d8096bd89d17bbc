//! Content-Security-Policy string construction

use indexmap::IndexMap;

/// Builds a CSP header value from named directives and their allow-lists.
///
/// Directives serialize in insertion order; sources within a directive keep
/// insertion order and are deduplicated.
#[derive(Debug, Clone, Default)]
pub struct CspBuilder {
    directives: IndexMap<String, Vec<String>>,
}

impl CspBuilder {
    /// An empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's baseline policy
    pub fn default_policy() -> Self {
        let mut csp = Self::new();
        csp.directive("default-src", &["'self'"]);
        csp.directive("script-src", &["'self'", "'unsafe-inline'"]);
        csp.directive("style-src", &["'self'", "'unsafe-inline'"]);
        csp.directive("img-src", &["'self'", "data:", "https:"]);
        csp.directive("font-src", &["'self'"]);
        csp.directive("connect-src", &["'self'"]);
        csp.directive("object-src", &["'none'"]);
        csp.directive("base-uri", &["'self'"]);
        csp.directive("form-action", &["'self'"]);
        csp.directive("frame-ancestors", &["'none'"]);
        csp.directive("report-uri", &["/api/csp-report"]);
        csp
    }

    /// Set a directive to the given sources, replacing any existing entry
    pub fn directive(&mut self, name: &str, sources: &[&str]) -> &mut Self {
        self.directives.insert(
            name.to_string(),
            sources.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Append a source to a directive, creating the directive if absent
    pub fn push(&mut self, name: &str, source: &str) -> &mut Self {
        let sources = self.directives.entry(name.to_string()).or_default();
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_string());
        }
        self
    }

    /// Serialize as a header value: `directive src src; directive src`
    pub fn build(&self) -> String {
        let mut out = String::new();
        for (i, (name, sources)) in self.directives.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            out.push_str(name);
            for source in sources {
                out.push(' ');
                out.push_str(source);
            }
        }
        out
    }
}
