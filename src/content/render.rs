use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Essay source is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("Renderer rejected the essay: {0}")]
    Rejected(String),
}

/// Pure markdown to HTML conversion.
///
/// Implementations must not be assumed to sanitize their output.
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// CommonMark renderer with the GitHub-flavoured extensions essays use
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    sanitize: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self {
            options,
            sanitize: false,
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn straight quotes and dashes into their typographic forms
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.options.set(Options::ENABLE_SMART_PUNCTUATION, enabled);
        self
    }

    /// Run the rendered HTML through ammonia before returning it
    pub fn with_sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    pub fn sanitizes(&self) -> bool {
        self.sanitize
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);

        if self.sanitize {
            Ok(ammonia::clean(&output))
        } else {
            Ok(output)
        }
    }
}
