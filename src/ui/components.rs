//! Panels of the `--tui` dashboard

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Row, Table};
use ratatui::Frame;

use super::{Phase, Progress};

const MAX_LOG_ENTRIES: usize = 200;
const BAR_WIDTH: usize = 20;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Blue))
}

/// Lifecycle steps entered so far. The last one is the step in progress.
#[derive(Default)]
pub struct StepList {
    steps: Vec<Phase>,
    failed: bool,
}

impl StepList {
    pub fn enter(&mut self, phase: Phase) {
        if self.steps.last() != Some(&phase) {
            self.steps.push(phase);
        }
    }

    pub fn fail(&mut self) {
        self.failed = true;
    }

    fn marker(&self, index: usize) -> (&'static str, Style) {
        let current = index + 1 == self.steps.len();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        match (current, self.failed, self.steps[index]) {
            (false, _, _) => ("✓", Style::default().fg(Color::DarkGray)),
            (true, true, _) => ("✗", bold.fg(Color::Red)),
            (true, false, Phase::Complete) => ("✓", bold.fg(Color::Green)),
            (true, false, _) => ("▶", bold.fg(Color::Cyan)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, phase)| {
                let (mark, style) = self.marker(i);
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", mark), style),
                    Span::styled(phase.to_string(), style),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(panel(" Pokédex seed ")), area);
    }
}

/// One row per reported item, in the order items were first seen
#[derive(Default)]
pub struct ProgressBoard {
    rows: Vec<Progress>,
}

impl ProgressBoard {
    pub fn update(&mut self, item: &str, done: u64, total: u64) {
        match self.rows.iter_mut().find(|row| row.item == item) {
            Some(row) => {
                row.done = done;
                row.total = total;
            }
            None => self.rows.push(Progress {
                item: item.to_string(),
                done,
                total,
            }),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = self.rows.iter().map(|row| {
            let style = if row.is_done() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                row.item.clone(),
                format!("{}/{}", row.done, row.total),
                bar(row.ratio()),
            ])
            .style(style)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(22),
                Constraint::Length(15),
                Constraint::Min(BAR_WIDTH as u16 + 5),
            ],
        )
        .header(Row::new(vec!["Table", "Resources", ""]).style(Style::default().fg(Color::Gray)))
        .block(panel(" Progress "));

        frame.render_widget(table, area);
    }
}

/// Text bar such as `█████░░░░░  50%`
fn bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{}{} {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        ratio * 100.0
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Activity history, capped. Errors and warnings keep their colour after
/// newer lines scroll in.
pub struct LogPanel {
    entries: Vec<(Level, String)>,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: &str) {
        // Process output arrives as one multi-line message
        for line in message.lines() {
            self.entries.push((level, line.to_string()));
        }
        let overflow = self.entries.len().saturating_sub(MAX_LOG_ENTRIES);
        self.entries.drain(..overflow);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.entries.len().saturating_sub(visible);
        let newest = self.entries.len().saturating_sub(1);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .enumerate()
            .map(|(offset, (level, line))| {
                let colour = match level {
                    Level::Error => Color::Red,
                    Level::Warn => Color::Yellow,
                    Level::Info if start + offset == newest => Color::White,
                    Level::Info => Color::DarkGray,
                };
                ListItem::new(Span::styled(format!(" {}", line), Style::default().fg(colour)))
            })
            .collect();

        frame.render_widget(List::new(items).block(panel(" Activity ")), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_replaces_counts_per_item() {
        let mut board = ProgressBoard::default();
        board.update("ability", 0, 120);
        board.update("pokemon_species", 0, 10);
        board.update("ability", 50, 120);

        let items: Vec<_> = board.rows.iter().map(|r| (r.item.as_str(), r.done)).collect();
        assert_eq!(items, vec![("ability", 50), ("pokemon_species", 0)]);
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), format!("{}   0%", "░".repeat(BAR_WIDTH)));
        assert_eq!(
            bar(0.5),
            format!("{}{}  50%", "█".repeat(BAR_WIDTH / 2), "░".repeat(BAR_WIDTH / 2))
        );
        assert_eq!(bar(1.0), format!("{} 100%", "█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_steps_mark_current_and_failure() {
        let mut steps = StepList::default();
        steps.enter(Phase::Checking);
        steps.enter(Phase::Starting);
        steps.enter(Phase::Starting);
        assert_eq!(steps.steps, vec![Phase::Checking, Phase::Starting]);
        assert_eq!(steps.marker(0).0, "✓");
        assert_eq!(steps.marker(1).0, "▶");

        steps.fail();
        assert_eq!(steps.marker(1).0, "✗");
    }

    #[test]
    fn test_log_caps_history_and_splits_lines() {
        let mut panel = LogPanel::new();
        for i in 0..MAX_LOG_ENTRIES {
            panel.push(Level::Info, &format!("line {}", i));
        }
        panel.push(Level::Error, "pg_ctl: could not start server\nExamine the log output.");

        assert_eq!(panel.entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(panel.entries[0].1, "line 2");
        assert_eq!(
            panel.entries[MAX_LOG_ENTRIES - 1],
            (Level::Error, "Examine the log output.".to_string())
        );
    }
}
