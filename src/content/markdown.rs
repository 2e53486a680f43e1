//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Theme used when none is configured
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

lazy_static! {
    static ref LANGUAGE_TAG: Regex = Regex::new(r"^[A-Za-z0-9_+#.\-]+$").expect("failed to compile language tag regex");
}

/// Errors raised while turning Markdown into HTML
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid code block language tag `{0}`")]
    InvalidLanguage(String),

    #[error("no syntax definition for code block language `{0}`")]
    UnknownLanguage(String),

    #[error("unknown highlight theme `{0}`")]
    UnknownTheme(String),

    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    strict_languages: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: theme_set.themes.remove(DEFAULT_THEME).unwrap_or_default(),
            line_numbers: true,
            strict_languages: false,
        }
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Result<Self, RenderError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme)
            .ok_or_else(|| RenderError::UnknownTheme(theme.to_string()))?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
            strict_languages: false,
        })
    }

    /// Fail on code blocks whose language has no syntax definition
    /// instead of highlighting them as plain text
    pub fn strict_languages(mut self, strict: bool) -> Self {
        self.strict_languages = strict;
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        // Enable most options but NOT YAML metadata blocks
        // We handle front-matter separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) of the code block being read
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => language_tag(&info)?,
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError> {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = match self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
        {
            Some(syntax) => syntax,
            None if self.strict_languages && lang != "text" => {
                return Err(RenderError::UnknownLanguage(lang.to_string()));
            }
            None => self.syntax_set.find_syntax_plain_text(),
        };

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let mut regions = highlighter.highlight_line(line, &self.syntax_set)?;
            if let Some((_, text)) = regions.last_mut() {
                *text = (*text).trim_end_matches(['\n', '\r']);
            }
            lines.push(styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }

        if self.line_numbers {
            Ok(add_line_numbers(&lines, lang))
        } else {
            Ok(format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                lines.join("\n")
            ))
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fenced block's info string, e.g. `rust` for "rust,ignore"
fn language_tag(info: &str) -> Result<Option<String>, RenderError> {
    let tag = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("");

    if tag.is_empty() {
        return Ok(None);
    }
    if !LANGUAGE_TAG.is_match(tag) {
        return Err(RenderError::InvalidLanguage(tag.to_string()));
    }
    Ok(Some(tag.to_string()))
}

/// Add line numbers to highlighted code
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let mut gutter = Vec::with_capacity(lines.len());
    let mut code_lines = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        gutter.push(format!(r#"<span class="line-number">{}</span>"#, i + 1));
        code_lines.push(line.as_str());
    }

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        code_lines.join("\n")
    )
}
