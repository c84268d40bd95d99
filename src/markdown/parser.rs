//! Parse stage: markdown source text to document tree.

use comrak::nodes::AstNode;
use comrak::{Arena, Options, parse_document};

/// Parse-stage configuration.
///
/// Controls which syntax extensions the parser recognizes. Both flags are
/// independently configurable per renderer instance; defaults match the
/// GitHub Flavored Markdown profile used for article display.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Enables GFM extensions: tables, strikethrough, autolinks,
    /// task lists, and footnotes.
    pub gfm: bool,

    /// Enables smart punctuation for quotes and dashes.
    pub smart_punctuation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            smart_punctuation: true,
        }
    }
}

impl ParseOptions {
    /// Builds comrak options for the configured extension set.
    ///
    /// Raw HTML passthrough is enabled here so that untrusted markup
    /// survives into the compile stage, where the sanitizer is the single
    /// trust boundary for it.
    pub(crate) fn to_comrak<'a>(self) -> Options<'a> {
        let mut options = Options::default();

        if self.gfm {
            options.extension.strikethrough = true;
            options.extension.table = true;
            options.extension.autolink = true;
            options.extension.tasklist = true;
            options.extension.footnotes = true;
        }

        options.parse.smart = self.smart_punctuation;
        options.render.unsafe_ = true;

        options
    }
}

/// Parses markdown source into a document tree.
///
/// Total over all inputs: markdown has no syntax errors, so malformed
/// constructs degrade to plain text rather than failing.
///
/// # Arguments
///
/// * `arena`: Arena owning the allocated tree nodes
/// * `source`: Raw markdown text
/// * `options`: Comrak options built from [`ParseOptions`]
///
/// # Returns
///
/// Root node of the parsed document tree
pub(crate) fn parse<'a>(
    arena: &'a Arena<AstNode<'a>>,
    source: &str,
    options: &Options,
) -> &'a AstNode<'a> {
    parse_document(arena, source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::nodes::NodeValue;

    #[test]
    fn test_parse_headings_and_paragraphs() {
        // Arrange
        let arena = Arena::new();
        let options = ParseOptions::default().to_comrak();

        // Act
        let root = parse(&arena, "# Title\n\nBody text.", &options);

        // Assert
        let kinds: Vec<bool> = root
            .children()
            .map(|n| matches!(n.data.borrow().value, NodeValue::Heading(_)))
            .collect();
        assert_eq!(kinds, vec![true, false], "Expected heading then paragraph");
    }

    #[test]
    fn test_parse_gfm_table_requires_extension() {
        // Arrange
        let arena = Arena::new();
        let table = "| a | b |\n|---|---|\n| 1 | 2 |\n";

        // Act
        let with_gfm = parse(
            &arena,
            table,
            &ParseOptions {
                gfm: true,
                smart_punctuation: false,
            }
            .to_comrak(),
        );
        let arena2 = Arena::new();
        let without_gfm = parse(
            &arena2,
            table,
            &ParseOptions {
                gfm: false,
                smart_punctuation: false,
            }
            .to_comrak(),
        );

        // Assert
        fn has_table<'a>(root: &'a AstNode<'a>) -> bool {
            root.descendants()
                .any(|n| matches!(n.data.borrow().value, NodeValue::Table(_)))
        }
        assert!(has_table(with_gfm), "GFM parse should produce a table node");
        assert!(
            !has_table(without_gfm),
            "Plain parse should not produce a table node"
        );
    }

    #[test]
    fn test_parse_never_fails_on_malformed_input() {
        // Arrange
        let arena = Arena::new();
        let options = ParseOptions::default().to_comrak();

        // Act
        let root = parse(&arena, "***[[[`` ~~\n\n>>", &options);

        // Assert
        assert!(
            root.children().count() > 0,
            "Malformed input should still produce a document tree"
        );
    }

    #[test]
    fn test_parse_empty_input() {
        // Arrange
        let arena = Arena::new();
        let options = ParseOptions::default().to_comrak();

        // Act
        let root = parse(&arena, "", &options);

        // Assert
        assert!(
            matches!(root.data.borrow().value, NodeValue::Document),
            "Empty input should produce an empty document node"
        );
    }
}
