use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::timer::TimerStatus;

const HORIZONTAL_MARGIN: u16 = 1;
const INPUT_HEIGHT: u16 = 3;

/// Screen regions shared by rendering and cursor placement
struct Areas {
    title: Rect,
    todo_list: Rect,
    todo_input: Rect,
    shift_input: Rect,
    shift_result: Rect,
    duration_input: Rect,
    timer_body: Rect,
    help: Rect,
    panels: [Rect; 3],
}

fn areas(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(8),    // panels
            Constraint::Length(1), // help
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[1]);

    let panels = [columns[0], columns[1], columns[2]];
    let inner = panels.map(|panel| Block::default().borders(Borders::ALL).inner(panel));

    let split_input = |r: Rect, input_first: bool| {
        let constraints = if input_first {
            [Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)]
        } else {
            [Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)]
        };
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(r)
    };

    let todo = split_input(inner[0], false);
    let shift = split_input(inner[1], true);
    let timer = split_input(inner[2], true);

    Areas {
        title: rows[0],
        todo_list: todo[0],
        todo_input: todo[1],
        shift_input: shift[0],
        shift_result: shift[1],
        duration_input: timer[0],
        timer_body: timer[1],
        help: rows[2],
        panels,
    }
}

fn panel_block(app: &App, focus: Focus, title: String) -> Block<'static> {
    let style = if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn input_widget<'a>(value: &'a str, label: &'a str, active: bool) -> Paragraph<'a> {
    let border = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(label),
    )
}

fn control_span(label: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::styled(
            label,
            Style::default()
                .add_modifier(Modifier::DIM)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let areas = areas(area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let error_style = Style::default().fg(Color::Red);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        Paragraph::new(Span::styled("Feierabend", bold_style))
            .alignment(Alignment::Center)
            .render(areas.title, buf);

        // to-dos
        let todo_title = format!(
            " {} ({}/{}) ",
            Focus::Todos,
            self.todos.completed_count(),
            self.todos.len()
        );
        panel_block(self, Focus::Todos, todo_title).render(areas.panels[0], buf);

        let items: Vec<ListItem> = self
            .todos
            .items()
            .iter()
            .map(|item| {
                let marker = if item.completed { "[x] " } else { "[ ] " };
                let style = if item.completed {
                    dim_style.add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(item.text.as_str(), style),
                ]))
            })
            .collect();

        if items.is_empty() {
            Paragraph::new(Span::styled("nothing to do", italic_style))
                .render(areas.todo_list, buf);
        } else {
            let highlight = if self.focus == Focus::Todos {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            // the list state scrolls the selection into view
            let mut state = ListState::default().with_selected(Some(self.selected_todo));
            StatefulWidget::render(
                List::new(items).highlight_style(highlight),
                areas.todo_list,
                buf,
                &mut state,
            );
        }

        input_widget(&self.todo_draft, "New to-do", self.focus == Focus::Todos)
            .render(areas.todo_input, buf);

        // end of shift
        panel_block(self, Focus::Shift, format!(" {} ", Focus::Shift)).render(areas.panels[1], buf);
        input_widget(&self.shift_input, "Start (HH:MM)", self.focus == Focus::Shift)
            .render(areas.shift_input, buf);

        let shift_line = match (
            self.shift_result.end_time(),
            self.shift_result.error_message(),
        ) {
            (Some(end), _) => {
                let mut spans = vec![
                    Span::raw("Done at "),
                    Span::styled(end.to_string(), bold_style.fg(Color::Green)),
                ];
                if let Some(suffix) = end.day_suffix() {
                    spans.push(Span::styled(format!(" {suffix}"), italic_style));
                }
                Line::from(spans)
            }
            (None, Some(message)) => Line::from(Span::styled(message, error_style)),
            (None, None) => Line::from(Span::styled("enter a start time", italic_style)),
        };
        Paragraph::new(shift_line)
            .wrap(Wrap { trim: true })
            .render(areas.shift_result, buf);

        // timer
        panel_block(self, Focus::Timer, format!(" {} ", Focus::Timer)).render(areas.panels[2], buf);
        input_widget(&self.duration_input, "Minutes", self.focus == Focus::Timer)
            .render(areas.duration_input, buf);

        let status = self.timer.status();
        let clock_style = match status {
            TimerStatus::Running => bold_style.fg(Color::Green),
            TimerStatus::Paused => bold_style.fg(Color::Yellow),
            TimerStatus::Expired => bold_style.fg(Color::Red),
            TimerStatus::Idle => bold_style,
        };
        let controls = self.timer.controls();

        let mut timer_lines = vec![
            Line::from(Span::styled(self.timer.display(), clock_style)),
            Line::from(Span::styled(status.to_string(), italic_style)),
            Line::from(""),
            Line::from(vec![
                control_span("(s)tart", controls.start),
                Span::raw(" "),
                control_span("(p)ause", controls.pause),
                Span::raw(" "),
                control_span("(r)eset", controls.reset),
            ]),
        ];
        if let Some(err) = &self.duration_error {
            timer_lines.push(Line::from(""));
            timer_lines.push(Line::from(Span::styled(err.to_string(), error_style)));
        }
        Paragraph::new(timer_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(areas.timer_body, buf);

        let help = match self.focus {
            Focus::Todos => "(tab) next panel / (enter) add, or toggle when empty / (↑↓) select / (esc)ape",
            Focus::Shift => "(tab) next panel / (enter) calculate / (esc)ape",
            Focus::Timer => "(tab) next panel / (enter) set minutes / (space) start-pause / (esc)ape",
        };
        Paragraph::new(Span::styled(help, italic_style)).render(areas.help, buf);
    }
}

/// Where the terminal cursor belongs: the end of the focused input field
pub fn cursor_position(app: &App, area: Rect) -> Option<Position> {
    let areas = areas(area);
    let (field, value) = match app.focus {
        Focus::Todos => (areas.todo_input, app.todo_draft.as_str()),
        Focus::Shift => (areas.shift_input, app.shift_input.as_str()),
        Focus::Timer => (areas.duration_input, app.duration_input.as_str()),
    };
    if field.width < 3 || field.height < 3 {
        return None;
    }

    let max_x = field.x + field.width - 2;
    let x = (field.x + 1).saturating_add(value.width() as u16).min(max_x);
    Some(Position::new(x, field.y + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_all_panels() {
        let app = App::default();
        let content = render(&app, 120, 24);
        assert!(content.contains("Feierabend"));
        assert!(content.contains("To-dos (0/1)"));
        assert!(content.contains("[ ] Buy coffee"));
        assert!(content.contains("End of shift"));
        assert!(content.contains("15:00"));
        assert!(content.contains("idle"));
    }

    #[test]
    fn test_renders_completed_todo_and_counts() {
        let mut app = App::new(&Config {
            todos: vec!["a".into(), "b".into()],
            ..Config::default()
        });
        let id = app.todos.items()[1].id;
        app.toggle_todo(id);
        let content = render(&app, 120, 24);
        assert!(content.contains("To-dos (1/2)"));
        assert!(content.contains("[x] b"));
    }

    #[test]
    fn test_renders_shift_result_and_error() {
        let mut app = App::default();
        app.calculate_shift("23:30");
        let content = render(&app, 120, 24);
        assert!(content.contains("08:12"));
        assert!(content.contains("(next day)"));

        app.calculate_shift("9:5");
        let content = render(&app, 120, 24);
        assert!(content.contains("invalid format"));
    }

    #[test]
    fn test_renders_running_timer() {
        let mut app = App::default();
        let now = Instant::now();
        app.start_timer(now);
        app.timer.tick();
        let content = render(&app, 120, 24);
        assert!(content.contains("14:59"));
        assert!(content.contains("running"));
    }

    #[test]
    fn test_selected_todo_scrolls_into_view() {
        let mut app = App::new(&Config {
            todos: (0..30).map(|n| format!("chore {n}")).collect(),
            ..Config::default()
        });
        app.add_todo("Water plants");
        assert_eq!(app.selected_todo, 30);

        let content = render(&app, 120, 24);
        assert!(content.contains("Water plants"));
        assert!(!content.contains("chore 0 "));

        // moving back to the top scrolls the other way
        app.selected_todo = 0;
        let content = render(&app, 120, 24);
        assert!(content.contains("chore 0 "));
        assert!(!content.contains("Water plants"));
    }

    #[test]
    fn test_renders_in_tiny_terminal_without_panicking() {
        let app = App::default();
        render(&app, 10, 5);
        render(&app, 1, 1);
    }

    #[test]
    fn test_cursor_follows_focused_input() {
        let mut app = App::default();
        let area = Rect::new(0, 0, 120, 24);

        let empty = cursor_position(&app, area).unwrap();
        app.todo_draft = "abc".into();
        let typed = cursor_position(&app, area).unwrap();
        assert_eq!(typed.x, empty.x + 3);
        assert_eq!(typed.y, empty.y);

        app.focus = Focus::Shift;
        let shift = cursor_position(&app, area).unwrap();
        assert!(shift.x > typed.x);
        assert!(shift.y < typed.y);
    }
}
