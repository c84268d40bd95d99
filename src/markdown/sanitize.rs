//! HTML sanitization against a fixed allow-list.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;

/// Allow-list sanitizer for compiled article HTML.
///
/// The sole trust boundary between externally sourced article text and the
/// rendered page: every compile path runs its output through
/// [`Sanitizer::clean`] before returning. Disallowed tags and attributes
/// (script elements, event handlers, unknown markup) are dropped or
/// neutralized; sanitization itself never fails.
pub struct Sanitizer {
    builder: Builder<'static>,
}

static SHARED: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);

impl Sanitizer {
    /// Builds the sanitizer with the article display allow-list.
    ///
    /// Covers standard markdown output, GFM tables and task lists, and the
    /// `span`/`code` class names produced by syntax highlighting. `class`
    /// and `id` are the only generic attributes, needed for highlight
    /// spans and footnote anchors.
    fn new() -> Self {
        let tags: HashSet<&'static str> = [
            "a",
            "blockquote",
            "br",
            "code",
            "dd",
            "del",
            "details",
            "dl",
            "dt",
            "em",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "hr",
            "img",
            "input",
            "kbd",
            "li",
            "ol",
            "p",
            "pre",
            "s",
            "span",
            "strong",
            "sub",
            "summary",
            "sup",
            "table",
            "tbody",
            "td",
            "tfoot",
            "th",
            "thead",
            "tr",
            "ul",
        ]
        .into_iter()
        .collect();

        let mut generic_attributes: HashSet<&'static str> = HashSet::new();
        generic_attributes.insert("class");
        generic_attributes.insert("id");

        let mut tag_attributes: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        tag_attributes.insert("a", ["href", "title"].into_iter().collect());
        tag_attributes.insert("img", ["src", "alt", "title"].into_iter().collect());
        tag_attributes.insert("th", ["align"].into_iter().collect());
        tag_attributes.insert("td", ["align"].into_iter().collect());
        // Task list checkboxes from the GFM extension
        tag_attributes.insert("input", ["type", "checked", "disabled"].into_iter().collect());

        let mut builder = Builder::default();
        builder
            .tags(tags)
            .generic_attributes(generic_attributes)
            .tag_attributes(tag_attributes)
            .link_rel(None);

        Self { builder }
    }

    /// Returns the process-wide sanitizer.
    ///
    /// Initialized once and never mutated, so concurrent render calls can
    /// share it without coordination.
    pub fn shared() -> &'static Sanitizer {
        &SHARED
    }

    /// Filters HTML against the allow-list.
    ///
    /// Never fails: disallowed content is removed rather than rejected, so
    /// the pipeline always completes.
    ///
    /// # Arguments
    ///
    /// * `html`: Compiled HTML, possibly carrying untrusted raw markup
    ///
    /// # Returns
    ///
    /// Sanitized HTML safe to inject directly into a page
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}
