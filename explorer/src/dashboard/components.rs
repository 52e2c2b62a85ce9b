//! Widgets for the dashboard panes. Rendering only, all state lives in `state`.

use bigdecimal::{BigDecimal, ToPrimitive};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::dashboard::format::{format_cell, format_count, format_currency, DisplayZone};
use crate::dashboard::state::{CatalogPanel, Focus, LoadState, SummaryPanel, TableView};
use crate::service::table_page::Pagination;

const MAX_COLUMN_WIDTH: usize = 40;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Blue)
    }
}

fn highlight_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn currency(amount: &BigDecimal) -> String {
    format_currency(amount.to_f64().unwrap_or_default())
}

/// `N rows • Page p of P • v of c columns`
pub fn header_text(pagination: &Pagination, visible: usize, columns: usize) -> String {
    format!(
        "{} rows • Page {} of {} • {} of {} columns",
        format_count(pagination.total),
        pagination.page,
        pagination.total_pages.max(1),
        visible,
        columns
    )
}

/// `Showing a to b of N results`
pub fn footer_text(pagination: &Pagination, rows: usize) -> String {
    if rows == 0 {
        return format!("Showing 0 to 0 of {} results", format_count(pagination.total));
    }
    let first = pagination.offset() + 1;
    let last = (pagination.offset() + rows as u64).min(pagination.total);
    format!("Showing {} to {} of {} results", format_count(first), format_count(last), format_count(pagination.total))
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, catalog: &CatalogPanel, summary: &SummaryPanel, focus: Focus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_summary(frame, chunks[0], summary, focus == Focus::Summary);
    render_tables(frame, chunks[1], catalog, focus == Focus::Tables);
}

fn render_summary(frame: &mut Frame, area: Rect, panel: &SummaryPanel, focused: bool) {
    let block = Block::default().borders(Borders::ALL).title(" Matching Summary ").border_style(border_style(focused));

    let summary = match &panel.load {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        }
        LoadState::Error(error) => {
            let lines = vec![
                Line::styled(error.as_str(), Style::default().fg(Color::Red)),
                Line::from(""),
                Line::styled("Press r to retry", Style::default().fg(Color::Gray)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
            return;
        }
        LoadState::Ready(summary) => summary,
    };

    let totals = &summary.summary;
    let mut items = vec![
        ListItem::new(Line::from(vec![
            Span::raw("Matched: "),
            Span::styled(currency(&totals.total_matched), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(format!(" ({} entries)", format_count(totals.entry_count))),
        ])),
        ListItem::new(format!(
            "Donations: {} total, {} processed, {} successful",
            format_count(totals.total_donations),
            format_count(totals.processed_donations),
            format_count(totals.successful_donations)
        )),
        ListItem::new(""),
    ];

    let mut selected = None;
    for (i, donor) in summary.donors.iter().enumerate() {
        let expanded = panel.expanded == Some(i);
        if i == panel.cursor {
            selected = Some(items.len());
        }
        items.push(ListItem::new(Line::from(vec![
            Span::raw(if expanded { "▾ " } else { "▸ " }),
            Span::styled(donor.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {} ({})", currency(&donor.total_matched), format_count(donor.entry_count))),
        ])));
        if expanded {
            for project in &donor.projects {
                let slug = if project.project_slug.is_empty() { "(no project)" } else { project.project_slug.as_str() };
                items.push(ListItem::new(Line::styled(
                    format!("    {} {} ({})", slug, currency(&project.amount), format_count(project.count)),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }
    if summary.donors.is_empty() {
        items.push(ListItem::new(Line::styled("No matched donations", Style::default().fg(Color::Gray))));
    }

    let mut state = ListState::default();
    if focused {
        state.select(selected);
    }
    let list = List::new(items).block(block).highlight_style(highlight_style());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_tables(frame: &mut Frame, area: Rect, catalog: &CatalogPanel, focused: bool) {
    let block = Block::default().borders(Borders::ALL).title(" Tables ").border_style(border_style(focused));

    match &catalog.load {
        None | Some(LoadState::Loading) => frame.render_widget(Paragraph::new("Loading...").block(block), area),
        Some(LoadState::Error(error)) => {
            let lines = vec![
                Line::styled(error.as_str(), Style::default().fg(Color::Red)),
                Line::from(""),
                Line::styled("Press r to retry", Style::default().fg(Color::Gray)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
        }
        Some(LoadState::Ready(tables)) => {
            let items: Vec<ListItem> = tables
                .iter()
                .map(|table| {
                    ListItem::new(Line::from(vec![
                        Span::raw(table.name.clone()),
                        Span::styled(format!(" {}", format_count(table.row_count)), Style::default().fg(Color::Gray)),
                    ]))
                })
                .collect();
            let mut state = ListState::default().with_selected(Some(catalog.cursor).filter(|_| !tables.is_empty()));
            let list = List::new(items).block(block).highlight_style(highlight_style()).highlight_symbol("> ");
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

pub fn render_grid(frame: &mut Frame, area: Rect, view: &TableView, zone: &DisplayZone, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let title = format!(" {} ", view.table_name);
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style(focused));

    let page = match &view.load {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new(format!("Loading {}...", view.table_name)), chunks[0]);
            frame.render_widget(block, chunks[1]);
            return;
        }
        LoadState::Error(error) => {
            let lines = vec![
                Line::styled(format!("Failed to load {}", view.table_name), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Line::styled(error.as_str(), Style::default().fg(Color::Red)),
                Line::from(""),
                Line::styled("Press r to retry", Style::default().fg(Color::Gray)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), chunks[1]);
            return;
        }
        LoadState::Ready(page) => page,
    };

    let visible = view.visible_columns();
    frame.render_widget(
        Paragraph::new(header_text(&page.pagination, visible.len(), page.columns.len())).style(Style::default().fg(Color::Gray)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(footer_text(&page.pagination, page.rows.len())),
            Span::styled("   n/p page  ←/→ scroll  c columns  r reload  tab focus  q quit", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[2],
    );

    if visible.is_empty() {
        let message = Paragraph::new(Line::styled("No columns selected", Style::default().fg(Color::Yellow))).block(block);
        frame.render_widget(message, chunks[1]);
        return;
    }

    let shown = &visible[view.column_offset.min(visible.len() - 1)..];
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            shown
                .iter()
                .map(|column| row.get(&column.column_name).map(|value| format_cell(value, zone)).unwrap_or_default())
                .collect()
        })
        .collect();
    let widths: Vec<Constraint> = shown
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest = cells.iter().map(|row| row[i].chars().count()).max().unwrap_or(0);
            Constraint::Length(widest.max(column.column_name.chars().count()).min(MAX_COLUMN_WIDTH) as u16)
        })
        .collect();

    let header = Row::new(shown.iter().map(|column| Cell::from(column.column_name.clone())))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let rows = cells.into_iter().map(|row| {
        Row::new(row.into_iter().map(|text| {
            if text == "null" {
                Cell::from(text).style(Style::default().fg(Color::DarkGray))
            } else {
                Cell::from(text)
            }
        }))
    });
    let table = Table::new(rows, widths).header(header).block(block).column_spacing(2);
    frame.render_widget(table, chunks[1]);
}

/// Draws the column selector centered in `area` and returns the popup bounds
pub fn render_selector(frame: &mut Frame, area: Rect, view: &TableView) -> Rect {
    let popup = centered(area, 60, 70);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Columns: {} of {} ", view.selection.len(), view.columns().len()))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled("Search: ", Style::default().fg(Color::Gray)), Span::raw(&view.column_search)])),
        chunks[0],
    );

    let columns = view.selector_columns();
    let items: Vec<ListItem> = if columns.is_empty() {
        vec![ListItem::new(Line::styled("No matching columns", Style::default().fg(Color::Gray)))]
    } else {
        columns
            .iter()
            .map(|column| {
                let mark = if view.selection.contains(&column.column_name) { "[x] " } else { "[ ] " };
                ListItem::new(Line::from(vec![
                    Span::raw(mark),
                    Span::raw(column.column_name.clone()),
                    Span::styled(format!("  {}", column.data_type), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect()
    };
    let mut state = ListState::default().with_selected(Some(view.selector_cursor).filter(|_| !columns.is_empty()));
    frame.render_stateful_widget(List::new(items).highlight_style(highlight_style()), chunks[1], &mut state);

    frame.render_widget(
        Paragraph::new("space toggle  ^A all  ^N none  ^D default  esc close").style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
    popup
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line() {
        assert_eq!(header_text(&Pagination::new(2, 50, 120), 7, 9), "120 rows • Page 2 of 3 • 7 of 9 columns");
        assert_eq!(header_text(&Pagination::new(1, 50, 0), 0, 4), "0 rows • Page 1 of 1 • 0 of 4 columns");
    }

    #[test]
    fn footer_line() {
        assert_eq!(footer_text(&Pagination::new(1, 50, 120), 50), "Showing 1 to 50 of 120 results");
        assert_eq!(footer_text(&Pagination::new(3, 50, 120), 20), "Showing 101 to 120 of 120 results");
        assert_eq!(footer_text(&Pagination::new(1, 50, 0), 0), "Showing 0 to 0 of 0 results");
        assert_eq!(footer_text(&Pagination::new(1, 50, 1500), 50), "Showing 1 to 50 of 1,500 results");
    }

    #[test]
    fn popup_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered(area, 60, 70);
        assert!((59..=61).contains(&popup.width));
        assert!((27..=29).contains(&popup.height));
        assert!(popup.right() <= area.right() && popup.bottom() <= area.bottom());
    }
}
