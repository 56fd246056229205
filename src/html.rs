use ammonia::clean;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use scraper::{ElementRef, Html, Node};

/// Converts rendered essay HTML into styled terminal text
pub struct HtmlRenderer {
    /// Width used for rules and the html2text fallback
    pub max_width: usize,
}

/// Walk state while flattening the HTML tree into lines
#[derive(Default)]
struct Flattener {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// One entry per open list: `Some(next number)` for `<ol>`, `None` for `<ul>`
    lists: Vec<Option<usize>>,
    quote_depth: usize,
    in_pre: bool,
}

impl Flattener {
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.current.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().map_or(false, |line| line.width() > 0) {
            self.lines.push(Line::from(""));
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if self.in_pre {
            for (i, segment) in text.split('\n').enumerate() {
                if i > 0 {
                    // Keep empty lines inside code blocks
                    if self.current.is_empty() {
                        self.current.push(Span::raw(""));
                    }
                    self.flush();
                }
                if !segment.is_empty() {
                    self.current.push(Span::styled(segment.to_string(), style));
                }
            }
            return;
        }

        let mut collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            // Whitespace between inline elements still separates words
            if !self.current.is_empty() && !text.is_empty() && !self.ends_with_space() {
                self.current.push(Span::raw(" "));
            }
            return;
        }
        if text.starts_with(char::is_whitespace) && !self.current.is_empty() && !self.ends_with_space() {
            collapsed.insert(0, ' ');
        }
        if text.ends_with(char::is_whitespace) {
            collapsed.push(' ');
        }
        self.current.push(Span::styled(collapsed, style));
    }

    fn ends_with_space(&self) -> bool {
        self.current
            .last()
            .map_or(true, |span| span.content.ends_with(' '))
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().map_or(false, |line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

impl HtmlRenderer {
    pub fn new(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Convert essay HTML to terminal text with styling
    pub fn render_html(&self, html_content: &str) -> Text<'static> {
        tracing::debug!("HTML Renderer: Processing content of length {}", html_content.len());

        let cleaned = clean(html_content);
        let document = Html::parse_fragment(&cleaned);
        let mut flattener = Flattener::default();
        self.walk(document.root_element(), Style::default(), &mut flattener);
        let lines = flattener.finish();

        if !lines.is_empty() {
            return Text::from(lines);
        }

        // Nothing recognisable in the tree; fall back to html2text
        let plain_text = self.html_to_plain_text(&cleaned);
        if !plain_text.trim().is_empty() {
            tracing::debug!("HTML Renderer: html2text fallback ({} chars)", plain_text.len());
        }
        Text::from(
            plain_text
                .lines()
                .map(|line| Line::from(line.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    fn walk(&self, element: ElementRef<'_>, style: Style, out: &mut Flattener) {
        for node in element.children() {
            match node.value() {
                Node::Text(text) => out.push_text(text, style),
                Node::Element(elem) => {
                    let Some(child) = ElementRef::wrap(node) else {
                        continue;
                    };
                    let tag_name = elem.name();
                    match tag_name {
                        "script" | "style" | "head" | "meta" | "link" => {}

                        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                            out.blank();
                            let heading = match tag_name {
                                "h1" => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                                "h2" => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                                _ => Style::default().add_modifier(Modifier::BOLD),
                            };
                            self.walk(child, heading, out);
                            out.blank();
                        }

                        // Paragraphs inside loose list items stay on the marker's line
                        "p" if !out.lists.is_empty() => {
                            self.walk(child, style, out);
                            out.flush();
                        }

                        "p" => {
                            out.flush();
                            self.walk(child, style, out);
                            out.blank();
                        }

                        "br" => out.flush(),

                        "hr" => {
                            out.blank();
                            out.current.push(Span::styled(
                                "─".repeat(self.max_width.min(40)),
                                Style::default().fg(Color::DarkGray),
                            ));
                            out.blank();
                        }

                        "ul" | "ol" => {
                            out.flush();
                            let numbering = (tag_name == "ol").then(|| {
                                elem.attr("start")
                                    .and_then(|start| start.parse().ok())
                                    .unwrap_or(1)
                            });
                            out.lists.push(numbering);
                            self.walk(child, style, out);
                            out.lists.pop();
                            if out.lists.is_empty() {
                                out.blank();
                            } else {
                                out.flush();
                            }
                        }

                        "li" => {
                            out.flush();
                            let depth = out.lists.len().saturating_sub(1);
                            let marker = match out.lists.last_mut() {
                                Some(Some(next)) => {
                                    let marker = format!("{}. ", next);
                                    *next = next.saturating_add(1);
                                    marker
                                }
                                _ => "• ".to_string(),
                            };
                            out.current.push(Span::raw(format!("{}{}", "  ".repeat(depth), marker)));
                            self.walk(child, style, out);
                            out.flush();
                        }

                        "blockquote" => {
                            out.blank();
                            out.quote_depth += 1;
                            self.walk(child, style.fg(Color::Gray).add_modifier(Modifier::ITALIC), out);
                            out.flush();
                            out.quote_depth -= 1;
                            out.blank();
                        }

                        "pre" => {
                            out.blank();
                            out.in_pre = true;
                            self.walk(child, Style::default().fg(Color::Green), out);
                            out.in_pre = false;
                            out.blank();
                        }

                        "code" => self.walk(child, style.fg(Color::Green), out),
                        "strong" | "b" => self.walk(child, style.add_modifier(Modifier::BOLD), out),
                        "em" | "i" => self.walk(child, style.add_modifier(Modifier::ITALIC), out),
                        "del" | "s" => self.walk(child, style.add_modifier(Modifier::CROSSED_OUT), out),

                        "a" => {
                            self.walk(
                                child,
                                style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                                out,
                            );
                            let text = child.text().collect::<String>();
                            if let Some(href) = elem.attr("href") {
                                if !href.is_empty() && href != text.trim() && !href.starts_with('#') {
                                    out.current.push(Span::styled(
                                        format!(" ({})", href),
                                        Style::default().fg(Color::DarkGray),
                                    ));
                                }
                            }
                        }

                        "img" => {
                            let alt = elem.attr("alt").unwrap_or("image");
                            out.current.push(Span::styled(
                                format!("[{}]", alt),
                                Style::default().fg(Color::DarkGray),
                            ));
                        }

                        "tr" => {
                            out.flush();
                            self.walk(child, style, out);
                            out.flush();
                        }

                        "th" => {
                            self.walk(child, style.add_modifier(Modifier::BOLD), out);
                            out.current.push(Span::raw("  "));
                        }

                        "td" => {
                            self.walk(child, style, out);
                            out.current.push(Span::raw("  "));
                        }

                        "table" => {
                            out.blank();
                            self.walk(child, style, out);
                            out.blank();
                        }

                        _ => self.walk(child, style, out),
                    }
                }
                _ => {}
            }
        }
    }

    /// Convert HTML to plain text using html2text
    pub fn html_to_plain_text(&self, html_content: &str) -> String {
        let result = html2text::from_read(html_content.as_bytes(), self.max_width);

        // Collapse runs of more than two blank lines
        let mut final_result = String::new();
        let mut blank_line_count = 0;
        for line in result.lines().map(str::trim_end) {
            if line.is_empty() {
                blank_line_count += 1;
                if blank_line_count <= 2 {
                    final_result.push('\n');
                }
            } else {
                blank_line_count = 0;
                final_result.push_str(line);
                final_result.push('\n');
            }
        }

        final_result
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(80)
    }
}
