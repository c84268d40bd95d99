//! Wiki-link resolution for the `[[Target]]` / `[[Target|Alias]]` dialect.

use std::cell::RefCell;

use comrak::Arena;
use comrak::nodes::{Ast, AstNode, LineColumn, NodeLink, NodeValue};

use crate::error::RenderError;

type HrefTemplate = Box<dyn Fn(&str) -> String + Send + Sync>;
type PageResolver = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;
type Observer = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Transform stage that rewrites wiki-link occurrences into hyperlinks.
///
/// Walks every inline text region of the document tree and replaces each
/// well-formed `[[...]]` span with a standard link node, leaving the
/// surrounding text untouched. Configuration is immutable after
/// construction; resolution is pure apart from the optional observer
/// callback, which is informational only and never affects output.
///
/// Resolution policy for degenerate syntax, since the dialect has no
/// canonical standard:
/// - empty targets (`[[]]`, `[[|alias]]`) pass through as literal text;
/// - an unterminated `[[` passes through as literal text;
/// - the alias divider splits on its first occurrence;
/// - an empty alias (`[[Target|]]`) falls back to the target as label.
pub struct WikiLinkResolver {
    alias_divider: char,
    href_template: HrefTemplate,
    page_resolver: Option<PageResolver>,
    observer: Option<Observer>,
}

/// Builder for [`WikiLinkResolver`].
///
/// The href template is mandatory; [`WikiLinkResolverBuilder::build`] fails
/// with a configuration error before any document is processed when it is
/// absent. Everything else has a working default.
pub struct WikiLinkResolverBuilder {
    alias_divider: char,
    href_template: Option<HrefTemplate>,
    page_resolver: Option<PageResolver>,
    observer: Option<Observer>,
}

impl WikiLinkResolverBuilder {
    fn new() -> Self {
        Self {
            alias_divider: '|',
            href_template: None,
            page_resolver: None,
            observer: None,
        }
    }

    /// Sets the delimiter separating target from alias. Defaults to `|`.
    pub fn alias_divider(mut self, divider: char) -> Self {
        self.alias_divider = divider;
        self
    }

    /// Sets the template mapping a permalink to the final href.
    ///
    /// The template owns any normalization needed for URL safety (for
    /// example replacing whitespace with underscores) and the article
    /// route prefix.
    pub fn href_template(
        mut self,
        template: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.href_template = Some(Box::new(template));
        self
    }

    /// Sets the optional page resolver producing ranked permalink
    /// candidates for a raw target name. The first candidate wins.
    pub fn page_resolver(
        mut self,
        resolver: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.page_resolver = Some(Box::new(resolver));
        self
    }

    /// Sets an observability sink invoked with `(target, href)` for each
    /// occurrence processed. Informational only.
    pub fn observer(mut self, observer: impl Fn(&str, &str) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if no href template was set.
    pub fn build(self) -> Result<WikiLinkResolver, RenderError> {
        let href_template = self.href_template.ok_or_else(|| {
            RenderError::Configuration("wiki-link resolver requires an href template".to_string())
        })?;

        Ok(WikiLinkResolver {
            alias_divider: self.alias_divider,
            href_template,
            page_resolver: self.page_resolver,
            observer: self.observer,
        })
    }
}

/// One piece of a rewritten text region, in document order.
enum Segment {
    Text(String),
    Link { href: String, label: String },
}

impl WikiLinkResolver {
    /// Creates a builder with default alias divider and no page resolver.
    pub fn builder() -> WikiLinkResolverBuilder {
        WikiLinkResolverBuilder::new()
    }

    /// Resolves all wiki-link occurrences in the document tree.
    ///
    /// Text nodes containing well-formed `[[...]]` spans are replaced by a
    /// sequence of sibling text and link nodes; everything else is left
    /// untouched. Code spans and code blocks carry their content as node
    /// literals rather than text nodes, so they are never rewritten.
    /// Replacement output is never re-scanned.
    pub fn resolve<'a>(&self, arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>) {
        // Collect first: splicing while walking would invalidate traversal.
        let candidates: Vec<&'a AstNode<'a>> = root
            .descendants()
            .filter(|node| {
                matches!(&node.data.borrow().value, NodeValue::Text(text) if text.contains("[["))
            })
            .collect();

        for node in candidates {
            let text = match &node.data.borrow().value {
                NodeValue::Text(text) => text.clone(),
                _ => continue,
            };

            let Some(segments) = self.scan(&text) else {
                continue;
            };

            for segment in segments {
                node.insert_before(self.make_node(arena, segment));
            }
            node.detach();
        }
    }

    /// Scans one text region for wiki-link occurrences.
    ///
    /// Matching is leftmost-first and non-overlapping, with a non-greedy
    /// match of the closing `]]`. Returns `None` when no well-formed
    /// occurrence exists, so callers can leave the original node in place.
    fn scan(&self, text: &str) -> Option<Vec<Segment>> {
        let mut segments = Vec::new();
        // Start of the pending literal run; only advanced past resolved
        // spans so degenerate syntax stays inside the literal text.
        let mut literal_start = 0;
        let mut scan_pos = 0;

        while let Some(offset) = text[scan_pos..].find("[[") {
            let open = scan_pos + offset;
            let Some(close_offset) = text[open + 2..].find("]]") else {
                // Unterminated opener: the rest is literal text.
                break;
            };
            let close = open + 2 + close_offset;
            let inner = &text[open + 2..close];

            let (target, alias) = match inner.split_once(self.alias_divider) {
                Some((target, alias)) => (target, Some(alias)),
                None => (inner, None),
            };

            if target.is_empty() {
                // Degenerate span: keep the brackets literal, keep scanning
                // after them.
                scan_pos = close + 2;
                continue;
            }

            let label = match alias {
                Some(alias) if !alias.is_empty() => alias,
                _ => target,
            };

            let permalink = match &self.page_resolver {
                Some(resolver) => resolver(target)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| target.to_string()),
                None => target.to_string(),
            };

            let href = (self.href_template)(&permalink);

            if let Some(observer) = &self.observer {
                observer(target, &href);
            }

            if open > literal_start {
                segments.push(Segment::Text(text[literal_start..open].to_string()));
            }
            segments.push(Segment::Link {
                href,
                label: label.to_string(),
            });

            literal_start = close + 2;
            scan_pos = literal_start;
        }

        if segments.is_empty() {
            return None;
        }

        if literal_start < text.len() {
            segments.push(Segment::Text(text[literal_start..].to_string()));
        }

        Some(segments)
    }

    /// Allocates a tree node for one segment.
    fn make_node<'a>(&self, arena: &'a Arena<AstNode<'a>>, segment: Segment) -> &'a AstNode<'a> {
        match segment {
            Segment::Text(text) => alloc_node(arena, NodeValue::Text(text)),
            Segment::Link { href, label } => {
                let link = alloc_node(
                    arena,
                    NodeValue::Link(NodeLink {
                        url: href,
                        title: String::new(),
                    }),
                );
                link.append(alloc_node(arena, NodeValue::Text(label)));
                link
            }
        }
    }
}

fn alloc_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(
        value,
        LineColumn { line: 0, column: 0 },
    ))))
}
