//! Screen tree derived from [`SearchState`].
//!
//! [`ResultsView::render`] is a pure function: the same state, stylesheet and
//! width always give the same [`Screen`]. Both the terminal UI and the plain
//! text output of the `search` command draw from it.

use unicode_width::UnicodeWidthStr;

use crate::controller::SearchState;
use crate::data_models::{ResultItem, ResultSet};
use crate::style::StyleSheet;

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub header: String,
    pub input: SearchInput,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchInput {
    pub value: String,
    pub placeholder: String,
}

impl SearchInput {
    /// Text to show: the value, or the placeholder while the value is empty.
    pub fn shown(&self) -> (&str, bool) {
        if self.value.is_empty() {
            (self.placeholder.as_str(), true)
        } else {
            (self.value.as_str(), false)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Centered indeterminate indicator. The grid is not rendered at all.
    Loading,
    Grid(Grid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub columns: u16,
    pub cell_width: u16,
    pub card_margin: u16,
    pub rows: Vec<Vec<Card>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: String,
    pub image: ImageBox,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageBox {
    pub url: Option<String>,
    pub width: u16,
    pub height: u16,
}

pub struct ResultsView {
    style: StyleSheet,
}

impl ResultsView {
    pub fn new(style: StyleSheet) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleSheet {
        &self.style
    }

    pub fn render(&self, state: &SearchState, screen_width: u16) -> Screen {
        Screen {
            header: self.style.header.to_string(),
            input: SearchInput {
                value: state.query.clone(),
                placeholder: self.style.placeholder.to_string(),
            },
            body: self.body(state.loading, &state.results, screen_width),
        }
    }

    pub fn body(&self, loading: bool, results: &ResultSet, screen_width: u16) -> Body {
        if loading {
            return Body::Loading;
        }

        let cell_width = self.style.cell_width(screen_width);
        let cards: Vec<Card> = results.iter().map(|item| self.card(item, cell_width)).collect();
        let rows = cards
            .chunks(self.style.columns.max(1) as usize)
            .map(<[Card]>::to_vec)
            .collect();

        Body::Grid(Grid {
            columns: self.style.columns,
            cell_width,
            card_margin: self.style.card_margin,
            rows,
        })
    }

    fn card(&self, item: &ResultItem, cell_width: u16) -> Card {
        let raw = item.description.as_deref().unwrap_or("");
        let description = if self.style.plain_text {
            strip_markup(raw, cell_width)
        } else {
            raw.to_string()
        };

        Card {
            key: item.key(),
            image: ImageBox {
                url: item.cover_image_url.clone(),
                width: self.style.image_width.min(cell_width),
                height: self.style.image_height,
            },
            title: capitalize_words(item.display_title()),
            description,
        }
    }
}

fn strip_markup(raw: &str, width: u16) -> String {
    match html2text::from_read(raw.as_bytes(), width.max(10) as usize) {
        Ok(text) => text.trim_end().to_string(),
        Err(e) => {
            tracing::debug!("could not strip description markup: {}", e);
            raw.to_string()
        }
    }
}

/// Uppercases the first letter of every whitespace-separated word and leaves
/// the rest alone.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

// -----------------------------------------------------------------------------
// Line layout
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Gap,
    Frame,
    Title,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: Role,
    pub text: String,
}

impl Segment {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

pub type LayoutLine = Vec<Segment>;

impl Grid {
    pub fn card_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Lays the grid out as fixed-width lines. Cards in a row are padded to
    /// the tallest one, and rows are separated by one blank line.
    pub fn layout_lines(&self) -> Vec<LayoutLine> {
        let width = self.cell_width as usize;
        let margin = " ".repeat(self.card_margin as usize);
        let mut lines = Vec::new();

        for row in &self.rows {
            let blocks: Vec<Vec<Segment>> = row.iter().map(|card| card.block(width)).collect();
            let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
            for i in 0..height {
                let mut line = Vec::with_capacity(row.len() * 3);
                for block in &blocks {
                    line.push(Segment::new(Role::Gap, margin.clone()));
                    line.push(
                        block
                            .get(i)
                            .cloned()
                            .unwrap_or_else(|| Segment::new(Role::Gap, " ".repeat(width))),
                    );
                    line.push(Segment::new(Role::Gap, margin.clone()));
                }
                lines.push(line);
            }
            lines.push(Vec::new());
        }
        lines
    }
}

impl Card {
    fn block(&self, width: usize) -> Vec<Segment> {
        let mut out = self.image.frame(width);
        for line in wrap(&self.title, width) {
            out.push(Segment::new(Role::Title, center(&line, width)));
        }
        for line in wrap(&self.description, width) {
            out.push(Segment::new(Role::Description, center(&line, width)));
        }
        out
    }
}

impl ImageBox {
    fn frame(&self, width: usize) -> Vec<Segment> {
        let inner = (self.width as usize).saturating_sub(2).min(width.saturating_sub(2));
        if inner == 0 || self.height < 3 {
            return Vec::new();
        }
        let label = if self.url.is_some() { "cover" } else { "no image" };
        let label = truncate(label, inner);
        let mid = (self.height as usize - 2) / 2;

        let mut out = vec![Segment::new(
            Role::Frame,
            center(&format!("┌{}┐", "─".repeat(inner)), width),
        )];
        for i in 0..self.height as usize - 2 {
            let content = if i == mid { center(&label, inner) } else { " ".repeat(inner) };
            out.push(Segment::new(Role::Frame, center(&format!("│{content}│"), width)));
        }
        out.push(Segment::new(
            Role::Frame,
            center(&format!("└{}┘", "─".repeat(inner)), width),
        ));
        out
    }
}

impl Screen {
    /// Plain text rendering for non-interactive output.
    pub fn to_lines(&self, screen_width: u16) -> Vec<String> {
        let width = screen_width as usize;
        let (shown, _) = self.input.shown();
        let mut lines = vec![
            center(&self.header, width),
            center(&format!("[ {shown} ]"), width),
            "─".repeat(width),
        ];
        match &self.body {
            Body::Loading => lines.push(center("…", width)),
            Body::Grid(grid) => lines.extend(grid.layout_lines().into_iter().map(|line| {
                line.into_iter()
                    .map(|segment| segment.text)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })),
        }
        lines
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split.
///
/// Widths are always measured on whole strings, so emoji presentation
/// sequences count the same here as in [`center`].
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && format!("{current} {word}").width() <= width {
                current.push(' ');
                current.push_str(word);
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if word.width() <= width {
                current.push_str(word);
                continue;
            }
            for c in word.chars() {
                let mut candidate = current.clone();
                candidate.push(c);
                if candidate.width() > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                } else {
                    current = candidate;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    for c in text.chars() {
        let mut candidate = out.clone();
        candidate.push(c);
        if candidate.width() > width {
            break;
        }
        out = candidate;
    }
    out
}

/// Centers `text` in a field of `width` columns, truncating if needed.
pub fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let free = width.saturating_sub(text.width());
    let left = free / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(free - left))
}
