//! Terminal front end: renders the paged document window with ratatui and
//! drives the session from a crossterm event loop.
//!
//! One line is one terminal row, so all engine units are rows here. The
//! surface model mirrors a scroll container: two page "divs" stacked in
//! placement order, heights set by the session, a scroll offset moved by key
//! presses and compensated by the pager on recycle.

use crate::config::ViewerConfig;
use crate::model::{AppError, LineDescriptor, LineKind, ParentKind, Value};
use crate::pager::{Edge, PageId};
use crate::render::LineRenderer;
use crate::session::{RenderSession, SessionHost};
use crate::viewport::SurfaceRect;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;
use unicode_width::UnicodeWidthStr;

/// Scalar values longer than this are clipped at render time; a single huge
/// string must not cost more than one row's worth of text.
const VALUE_CLIP_WIDTH: usize = 256;

/// Event poll timeout; also paces loader batches while idle.
const TICK: Duration = Duration::from_millis(16);

/// Errors from the terminal front end.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Terminal IO failure.
    #[error("terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Engine failure (parse or traversal).
    #[error("application error: {0}")]
    App(#[from] AppError),
}

/// One rendered terminal row.
#[derive(Debug)]
pub struct RowHandle {
    line: Line<'static>,
    /// Row offset within the owning page container.
    offset: f64,
    attached: bool,
}

/// Builds styled terminal rows from line descriptors.
#[derive(Debug, Default)]
pub struct RowRenderer;

impl RowRenderer {
    /// Stateless renderer.
    pub fn new() -> Self {
        Self
    }
}

impl LineRenderer for RowRenderer {
    type Handle = RowHandle;

    fn render(&mut self, line: &LineDescriptor, offset: f64) -> RowHandle {
        RowHandle {
            line: styled_line(line),
            offset,
            attached: true,
        }
    }

    fn reposition(&mut self, handle: &mut RowHandle, offset: f64) {
        handle.offset = offset;
        handle.attached = true;
    }

    fn detach(&mut self, handle: &mut RowHandle) {
        handle.attached = false;
    }
}

/// Clip `text` to at most `max_width` columns, appending an ellipsis when
/// anything was cut. Width-aware so wide characters do not overflow the row.
fn clip_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut clipped = String::new();
    let budget = max_width.saturating_sub(1);
    for ch in text.chars() {
        if clipped.width() + unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0) > budget {
            break;
        }
        clipped.push(ch);
    }
    clipped.push('…');
    clipped
}

fn key_style(parent: ParentKind) -> Style {
    match parent {
        ParentKind::Object => Style::default().fg(Color::Cyan),
        ParentKind::Array => Style::default().fg(Color::DarkGray),
    }
}

fn value_span(line: &LineDescriptor) -> Span<'static> {
    use crate::model::Scalar;
    let Some(value) = &line.value else {
        return Span::raw("");
    };
    let text = clip_to_width(&value.to_string(), VALUE_CLIP_WIDTH);
    let style = match value {
        Scalar::String(_) => Style::default().fg(Color::Green),
        Scalar::Number(_) => Style::default().fg(Color::Magenta),
        Scalar::Bool(_) => Style::default().fg(Color::Blue),
        Scalar::Null => Style::default().add_modifier(Modifier::DIM),
    };
    Span::styled(text, style)
}

/// One descriptor as a styled row: indentation by depth, key colored by the
/// enclosing container kind, scalar payload colored by type.
fn styled_line(line: &LineDescriptor) -> Line<'static> {
    let mut spans = vec![Span::raw("  ".repeat(line.depth))];
    let key = line.key.clone().unwrap_or_default();
    match line.kind {
        LineKind::Property => {
            spans.push(Span::styled(key, key_style(line.parent)));
            spans.push(Span::raw(": "));
            spans.push(value_span(line));
        }
        LineKind::ArrayOpen => {
            spans.push(Span::styled(key, key_style(line.parent)));
            spans.push(Span::raw(": "));
            spans.push(Span::styled("[", Style::default().fg(Color::Yellow)));
        }
        LineKind::ObjectOpen => {
            spans.push(Span::styled(
                key,
                key_style(line.parent).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(":"));
        }
        LineKind::ArrayClose => {
            spans.push(Span::styled("]", Style::default().fg(Color::Yellow)));
        }
    }
    Line::from(spans)
}

/// Scroll-container model over the terminal: two page containers stacked in
/// placement order, heights in rows, one scroll offset.
#[derive(Debug)]
pub struct TerminalSurface {
    viewport_height: f64,
    scroll: f64,
    order: Vec<PageId>,
    heights: [f64; 2],
}

impl TerminalSurface {
    /// Surface for a viewport of `viewport_height` rows.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            scroll: 0.0,
            order: Vec::new(),
            heights: [0.0; 2],
        }
    }

    fn height_of(&self, page: PageId) -> f64 {
        match page {
            PageId::A => self.heights[0],
            PageId::B => self.heights[1],
        }
    }

    /// Combined height of both page containers, in rows.
    pub fn total_height(&self) -> f64 {
        self.heights[0] + self.heights[1]
    }

    /// Current scroll offset in rows.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Move the scroll offset by `delta` rows, clamped to the content.
    pub fn scroll_clamped(&mut self, delta: f64) {
        let max = (self.total_height() - self.viewport_height).max(0.0);
        self.scroll = (self.scroll + delta).clamp(0.0, max);
    }

    fn set_viewport_height(&mut self, rows: f64) {
        self.viewport_height = rows;
        self.scroll_clamped(0.0);
    }
}

impl SessionHost for TerminalSurface {
    fn page_rect(&self, page: PageId) -> Option<SurfaceRect> {
        let mut top = -self.scroll;
        for placed in &self.order {
            if *placed == page {
                return Some(SurfaceRect::new(top, self.height_of(page)));
            }
            top += self.height_of(*placed);
        }
        None
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn place_page(&mut self, page: PageId, edge: Edge) {
        self.order.retain(|placed| *placed != page);
        match edge {
            Edge::Top => self.order.insert(0, page),
            Edge::Bottom => self.order.push(page),
        }
    }

    fn page_resized(&mut self, page: PageId, lines: usize) {
        match page {
            PageId::A => self.heights[0] = lines as f64,
            PageId::B => self.heights[1] = lines as f64,
        }
    }

    fn scroll_by(&mut self, delta: f64) {
        self.scroll += delta;
    }
}

/// Run the viewer over `document` until the user quits.
pub fn run(document: &Value, config: &ViewerConfig) -> Result<(), TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, document, config);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    document: &Value,
    config: &ViewerConfig,
) -> Result<(), TuiError> {
    let rows = terminal.size()?.height.saturating_sub(1).max(1);
    let mut surface = TerminalSurface::new(f64::from(rows));
    let mut session = RenderSession::start(document, config, RowRenderer::new(), &mut surface)
        .map_err(AppError::from)?;
    info!(
        initial_lines = session.store().len(),
        viewport_rows = rows,
        "Viewer session started"
    );

    loop {
        terminal.draw(|frame| draw(frame, &session, &surface))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(key, &mut session, &mut surface) {
                        return Ok(());
                    }
                }
                Event::Resize(_, height) => {
                    surface.set_viewport_height(f64::from(height.saturating_sub(1).max(1)));
                    session.on_scroll(&mut surface);
                }
                _ => {}
            }
        }

        session
            .poll(Instant::now(), &mut surface)
            .map_err(AppError::from)?;
    }
}

/// Apply a key press. Returns true when the user quit.
fn handle_key(
    key: KeyEvent,
    session: &mut RenderSession<'_, RowRenderer>,
    surface: &mut TerminalSurface,
) -> bool {
    let viewport = surface.viewport_height;
    let delta = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Down | KeyCode::Char('j') => 1.0,
        KeyCode::Up | KeyCode::Char('k') => -1.0,
        KeyCode::PageDown | KeyCode::Char(' ') => viewport,
        KeyCode::PageUp => -viewport,
        KeyCode::Char('g') | KeyCode::Home => -surface.scroll(),
        KeyCode::Char('G') | KeyCode::End => surface.total_height(),
        _ => return false,
    };

    surface.scroll_clamped(delta);
    session.on_scroll(surface);

    // Edge sentinels: the top one sits at the composed start, the bottom one
    // at the composed end; each is "intersecting" once it comes within its
    // margin of the viewport.
    let top_hit = surface.scroll() <= session.pager().sentinel_margin(Edge::Top);
    let gap_below = surface.total_height() - surface.scroll() - viewport;
    let bottom_hit = gap_below <= session.pager().sentinel_margin(Edge::Bottom);
    session.on_sentinel(Edge::Top, top_hit, surface);
    session.on_sentinel(Edge::Bottom, bottom_hit, surface);
    false
}

/// Paint the visible window plus a one-row status bar.
fn draw(
    frame: &mut ratatui::Frame<'_>,
    session: &RenderSession<'_, RowRenderer>,
    surface: &TerminalSurface,
) {
    let [content_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let leading = session.pager().leading();
    let trailing = session.pager().trailing();
    let first_row = surface.scroll() as usize;

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(content_area.height as usize);
    for row in 0..content_area.height as usize {
        let composed = first_row + row;
        // Composed row -> (page, local) -> global line index.
        let global = if composed < leading.size() {
            Some(leading.offset() + composed)
        } else if composed - leading.size() < trailing.size() {
            Some(trailing.offset() + (composed - leading.size()))
        } else {
            None
        };
        let line = global
            .and_then(|index| session.handle(index))
            .filter(|handle| handle.attached)
            .map(|handle| handle.line.clone())
            .unwrap_or_else(|| match global {
                Some(_) => Line::styled("…", Style::default().add_modifier(Modifier::DIM)),
                None => Line::raw(""),
            });
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), content_area);

    let status = format!(
        " {} / {} lines{}  window [{}..{})  row {}",
        session.rendered_lines(),
        session.store().len(),
        if session.is_loaded() { "" } else { " (loading)" },
        leading.offset(),
        trailing.offset() + trailing.size(),
        first_row + leading.offset(),
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        status_area,
    );
}
