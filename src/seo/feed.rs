//! Atom feed and JSON search index

use crate::config::SiteConfig;
use crate::content::{strip_html, Post};

/// Entries included in the Atom feed
const FEED_LIMIT: usize = 20;

/// Render the Atom feed for the most recent posts
pub fn atom_feed(config: &SiteConfig, posts: &[Post]) -> String {
    let base_url = config.url.trim_end_matches('/');

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <link href=\"{}/feed.xml\" rel=\"self\"/>\n",
        base_url
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
    feed.push_str(&format!(
        "  <updated>{}</updated>\n",
        chrono::Utc::now().to_rfc3339()
    ));
    feed.push_str(&format!("  <id>{}/</id>\n", base_url));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&config.author)
    ));

    for post in posts.iter().filter(|p| p.published).take(FEED_LIMIT) {
        let url = format!("{}{}", base_url, post.path);
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
        feed.push_str(&format!("    <id>{}</id>\n", url));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            post.date.to_rfc3339()
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            post.updated.unwrap_or(post.date).to_rfc3339()
        ));
        feed.push_str(&format!(
            "    <summary>{}</summary>\n",
            escape_xml(&post.description)
        ));
        // A literal "]]>" in the content would terminate the CDATA section
        let content = strip_invalid_xml_chars(&post.content).replace("]]>", "]]]]><![CDATA[>");
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            content
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// Build the JSON search index consumed by the client-side search box
pub fn search_index(posts: &[Post]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = posts
        .iter()
        .filter(|p| p.published)
        .map(|p| {
            serde_json::json!({
                "title": p.title,
                "url": p.path,
                "date": p.date.format("%Y-%m-%d").to_string(),
                "tags": p.tags,
                "content": strip_html(&p.content),
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip control characters XML 1.0 forbids (tab/newline/CR stay)
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
