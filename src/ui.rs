//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Padding, Paragraph, Row, Table,
        TableState, Widget, Wrap,
    },
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, EntryKind, Mode, PreviewState};
use crate::config::UiSettings;
use crate::library::TagField;
use crate::library::art::Thumbnail;
use crate::library::title_guess::guess_track_number;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "rows");
    map.insert("h/l", "columns");
    map.insert("gg/G", "top/bottom");
    map.insert("space", "select");
    map.insert("a/u", "select all/none");
    map.insert("e", "edit cell");
    map.insert("b", "bulk edit column");
    map.insert("^a/^l", "bulk artist/album");
    map.insert("t/T", "guess title(s)");
    map.insert("c", "cover art");
    map.insert("K", "details");
    map.insert("p/x", "play-pause/stop");
    map.insert("s", "save");
    map.insert("q", "quit");
    map.insert("enter", "apply");
    map.insert("esc", "cancel");
    map.insert("backspace", "parent dir");
    map.insert(".", "hidden files");
    map
});

/// Render the controls help text for the current `mode`.
fn controls_text(mode: Mode) -> String {
    // Keep the rendered order stable and human-friendly.
    let order: &[&str] = match mode {
        Mode::Normal => &[
            "j/k", "h/l", "gg/G", "space", "a/u", "e", "b", "^a/^l", "t/T", "c", "K", "p/x", "s",
            "q",
        ],
        Mode::EditCell | Mode::BulkEdit(_) => &["enter", "esc"],
        Mode::BrowseArt => &["j/k", "enter", "backspace", ".", "esc"],
        Mode::Preview => &["p/x", "esc"],
    };
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

fn padded_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Counts, preview playback and the last message, joined for the status box.
fn status_text(app: &App) -> String {
    let mut parts = vec![format!("{} tracks", app.collection().len())];

    let selected = app.selected_count();
    if selected > 0 {
        parts.push(format!("{selected} selected"));
    }
    let dirty = app.dirty_count();
    if dirty > 0 {
        parts.push(format!("{dirty} unsaved"));
    }

    if let Some(ref h) = app.playback_handle {
        if let Ok(info) = h.lock() {
            if let Some(path) = &info.path {
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let state = if info.playing { "Playing" } else { "Paused" };
                parts.push(format!("{state}: {name} [{}]", format_mmss(info.elapsed)));
            } else if let Some(err) = &info.error {
                parts.push(format!("Playback: {err}"));
            }
        }
    }

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn tracks_table(app: &App) -> (Table<'_>, TableState) {
    let columns = app.columns();

    let mut header_cells = vec![Cell::from(""), Cell::from("File")];
    header_cells.extend(columns.iter().map(|f| Cell::from(f.label())));
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .collection()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let marks = format!(
                "{}{}",
                if record.is_dirty() { '*' } else { ' ' },
                if record.is_selected() { '+' } else { ' ' }
            );
            let mut cells = vec![Cell::from(marks), Cell::from(record.file_name())];
            cells.extend(columns.iter().enumerate().map(|(c, &field)| {
                let cell = Cell::from(record.field(field).to_string());
                if i == app.row && c == app.column {
                    cell.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    cell
                }
            }));
            let row = Row::new(cells);
            if record.is_selected() {
                row.style(Style::default().fg(Color::Yellow))
            } else {
                row
            }
        })
        .collect();

    let mut widths = vec![Constraint::Length(2), Constraint::Fill(2)];
    widths.extend(columns.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .column_spacing(1);

    let mut state = TableState::default();
    if !app.collection().is_empty() {
        state.select(Some(app.row));
    }
    (table, state)
}

/// Cover thumbnail drawn with upper half blocks: foreground is the top
/// pixel, background the bottom one.
struct ThumbnailWidget<'a>(&'a Thumbnail);

impl Widget for ThumbnailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rgb = |[r, g, b]: [u8; 3]| Color::Rgb(r, g, b);
        for row in 0..self.0.rows.min(area.height) {
            for col in 0..self.0.cols.min(area.width) {
                let Some((top, bottom)) = self.0.cell(col, row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(rgb(top)).set_bg(rgb(bottom));
                }
            }
        }
    }
}

fn draw_cell_editor(frame: &mut Frame, app: &App, area: Rect) {
    let field = app.current_field();
    let file = app
        .current_record()
        .map(|r| r.file_name())
        .unwrap_or_default();
    let popup = centered_rect_sized(70, 3, area);
    frame.render_widget(Clear, popup);
    let input = Paragraph::new(format!("{}_", app.input))
        .block(padded_block(format!(" {} of {file} ", field.label())));
    frame.render_widget(input, popup);
}

fn draw_bulk_editor(frame: &mut Frame, app: &App, field: TagField, area: Rect) {
    let (values, _) = app.bulk_candidates(field);
    let targets = app.targets().len();

    let height = (values.len() as u16).saturating_add(5).min(16);
    let popup = centered_rect_sized(70, height, area);
    frame.render_widget(Clear, popup);

    let block = padded_block(format!(" {} for {targets} track(s) ", field.label()));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new("Current values:").italic(), chunks[0]);
    let items: Vec<ListItem> = values
        .iter()
        .map(|v| {
            if v.is_empty() {
                ListItem::new("(empty)").dim()
            } else {
                ListItem::new(v.as_str())
            }
        })
        .collect();
    frame.render_widget(List::new(items), chunks[1]);

    let input = Line::from(vec![
        Span::raw("New value: ").bold(),
        Span::raw(format!("{}_", app.input)),
    ]);
    frame.render_widget(Paragraph::new(input), chunks[2]);
}

fn draw_browser(frame: &mut Frame, app: &App, area: Rect) {
    let Some(browser) = app.browser.as_ref() else {
        return;
    };
    let popup = centered_rect_sized(70, 20, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = browser
        .entries()
        .iter()
        .map(|e| match e.kind {
            EntryKind::Parent | EntryKind::Dir => ListItem::new(format!("{}/", e.name)).bold(),
            EntryKind::File => ListItem::new(e.name.as_str()),
        })
        .collect();

    let hidden = if browser.include_hidden() {
        " (+hidden)"
    } else {
        ""
    };
    let list = List::new(items)
        .block(padded_block(format!(
            " cover art: {}{hidden} ",
            browser.dir().display()
        )))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !browser.entries().is_empty() {
        state.select(Some(browser.cursor()));
    }
    frame.render_stateful_widget(list, popup, &mut state);
}

fn draw_preview(frame: &mut Frame, app: &App, preview: &PreviewState, area: Rect) {
    let (thumb_w, thumb_h) = preview
        .thumbnail
        .as_ref()
        .map(|t| (t.cols, t.rows))
        .unwrap_or((0, 0));

    let popup = centered_rect_sized(
        thumb_w.saturating_add(60),
        thumb_h.max(TagField::ALL.len() as u16 + 4).saturating_add(2),
        area,
    );
    frame.render_widget(Clear, popup);

    let block = padded_block(" details (K closes) ".to_string());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(thumb_w)])
        .split(inner);

    let mut lines = vec![Line::from(preview.path.display().to_string()).bold()];
    if let Some(record) = app.collection().get(&preview.path) {
        for field in TagField::ALL {
            let value = record.field(field);
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", field.label())).bold(),
                Span::raw(if value.is_empty() { "-" } else { value }),
            ]));
        }
        if let Some(n) = guess_track_number(&preview.path) {
            lines.push(Line::from(format!("Track # from file name: {n}")));
        }
        if let Some(art) = record.art() {
            lines.push(Line::from(format!(
                "Cover: pending {} ({}x{})",
                art.source.display(),
                art.width,
                art.height
            )));
        } else {
            lines.push(Line::from(format!("Cover: {}", preview.art_source)));
        }
        if record.is_dirty() {
            lines.push(Line::from("Unsaved changes").italic());
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    if let Some(thumb) = &preview.thumbnail {
        frame.render_widget(ThumbnailWidget(thumb), chunks[1]);
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" beetsheet ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app))
        .block(padded_block(" status ".to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let (table, mut state) = tracks_table(app);
    frame.render_stateful_widget(table, chunks[2], &mut state);

    // Popups stay inside the table area so the status and controls remain visible.
    match app.mode {
        Mode::Normal => {}
        Mode::EditCell => draw_cell_editor(frame, app, chunks[2]),
        Mode::BulkEdit(field) => draw_bulk_editor(frame, app, field, chunks[2]),
        Mode::BrowseArt => draw_browser(frame, app, chunks[2]),
        Mode::Preview => {
            if let Some(preview) = &app.preview {
                draw_preview(frame, app, preview, chunks[2]);
            }
        }
    }

    let footer = Paragraph::new(controls_text(app.mode))
        .block(padded_block(" controls ".to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
