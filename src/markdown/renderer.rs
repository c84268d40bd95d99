//! Renderer facade composing the parse, resolve, and compile stages.

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::parser::{self, ParseOptions};
use super::sanitize::Sanitizer;
use super::wikilink::WikiLinkResolver;

/// Renders wiki-flavored markdown to sanitized HTML.
///
/// Each call to [`WikiRenderer::render`] runs the same synchronous,
/// side-effect-free pipeline: parse the source into a document tree,
/// resolve `[[...]]` wiki links when a resolver is configured, optionally
/// highlight fenced code blocks, then compile to HTML through the
/// sanitizer. Rendering is total: every input string produces some HTML
/// output. Configuration is immutable after construction, so one renderer
/// can serve concurrent render calls without coordination.
pub struct WikiRenderer {
    parse_options: ParseOptions,
    syntax_set: SyntaxSet,
    resolver: Option<WikiLinkResolver>,
    sanitizer: &'static Sanitizer,
    highlight: bool,
}

impl WikiRenderer {
    /// Creates a renderer with default parse options.
    ///
    /// Defaults: GFM extensions and smart punctuation on, syntax
    /// highlighting on, no wiki-link resolution.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Creates a renderer with explicit parse options.
    ///
    /// # Arguments
    ///
    /// * `parse_options`: Extension configuration for the parse stage
    pub fn with_options(parse_options: ParseOptions) -> Self {
        Self {
            parse_options,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            resolver: None,
            sanitizer: Sanitizer::shared(),
            highlight: true,
        }
    }

    /// Attaches a wiki-link resolver to the pipeline.
    ///
    /// Without one the renderer is a plain safe markdown renderer and
    /// `[[...]]` spans pass through as literal text.
    pub fn with_wiki_links(mut self, resolver: WikiLinkResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Enables or disables syntax highlighting of fenced code blocks.
    pub fn highlight_code(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Renders markdown source to sanitized HTML.
    ///
    /// Total over all inputs: malformed markdown and wiki-link syntax
    /// degrade to literal text, and sanitization removes rather than
    /// rejects disallowed content.
    ///
    /// # Arguments
    ///
    /// * `source`: Raw article markdown
    ///
    /// # Returns
    ///
    /// HTML safe to inject directly into a page
    pub fn render(&self, source: &str) -> String {
        let options = self.parse_options.to_comrak();
        let arena = Arena::new();
        let root = parser::parse(&arena, source, &options);

        if let Some(resolver) = &self.resolver {
            resolver.resolve(&arena, root);
        }

        if self.highlight {
            self.highlight_code_blocks(root);
        }

        self.compile(root, &options)
    }

    /// Compiles the document tree to sanitized HTML.
    ///
    /// Serialization and sanitization always run together; no caller can
    /// obtain the unsanitized serialization.
    fn compile<'t>(&self, root: &'t AstNode<'t>, options: &Options) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        format_html(root, options, &mut buffer).unwrap_or_default();
        let html = String::from_utf8_lossy(&buffer);

        self.sanitizer.clean(&html)
    }

    /// Replaces fenced code blocks carrying a known language with
    /// pre-highlighted HTML.
    ///
    /// Blocks with no language, an unknown language, or empty content are
    /// left for the formatter to escape as plain code. Highlighted markup
    /// still passes through the sanitizer, which admits the generated
    /// `hljs-` spans.
    fn highlight_code_blocks<'t>(&self, root: &'t AstNode<'t>) {
        for node in root.descendants() {
            let highlighted = match &node.data.borrow().value {
                NodeValue::CodeBlock(block) if !block.literal.is_empty() => {
                    language_token(&block.info)
                        .and_then(|language| self.highlight_block(&block.literal, language))
                }
                _ => None,
            };

            if let Some(literal) = highlighted {
                node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal,
                });
            }
        }
    }

    /// Highlights one code block, returning the replacement HTML.
    ///
    /// Returns `None` when the language is unknown or highlighting fails,
    /// leaving the original block in place.
    fn highlight_block(&self, code: &str, language: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))?;

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );

        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return None;
            }
        }

        Some(format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            language,
            generator.finalize()
        ))
    }
}

impl Default for WikiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the language token from a fence info string.
///
/// Takes the first whitespace-separated word and rejects tokens with
/// characters that could not appear safely in a class attribute.
fn language_token(info: &str) -> Option<&str> {
    let token = info.split_whitespace().next()?;
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '#' | '.'))
        .then_some(token)
}
