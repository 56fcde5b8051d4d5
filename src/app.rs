use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::shift::{ShiftCalculator, ShiftResult};
use crate::timer::{CountdownTimer, TimerError};
use crate::todo::{TodoId, TodoStore};

/// `HH:MM`
const MAX_START_TIME_LEN: usize = 5;
const MAX_DURATION_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Focus {
    #[strum(serialize = "To-dos")]
    Todos,
    #[strum(serialize = "End of shift")]
    Shift,
    #[strum(serialize = "Timer")]
    Timer,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Todos => Focus::Shift,
            Focus::Shift => Focus::Timer,
            Focus::Timer => Focus::Todos,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Todos => Focus::Timer,
            Focus::Shift => Focus::Todos,
            Focus::Timer => Focus::Shift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Root controller: owns the three widgets' state and the text being typed
/// into them, and turns user intents into operations on that state.
#[derive(Debug)]
pub struct App {
    pub todos: TodoStore,
    pub shift: ShiftCalculator,
    pub shift_result: ShiftResult,
    pub timer: CountdownTimer,
    pub focus: Focus,
    pub todo_draft: String,
    pub selected_todo: usize,
    pub shift_input: String,
    pub duration_input: String,
    pub duration_error: Option<TimerError>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut todos = TodoStore::new();
        for text in &config.todos {
            todos.add(text);
        }

        let mut timer = CountdownTimer::new();
        if let Err(e) = timer.set_duration(config.timer_minutes) {
            warn!(minutes = config.timer_minutes, error = %e, "keeping default timer duration");
        }

        info!(todos = todos.len(), timer = %timer.display(), "app initialised");

        Self {
            todos,
            shift: ShiftCalculator::from_hours_minutes(config.shift_hours, config.shift_minutes),
            shift_result: ShiftResult::default(),
            timer,
            focus: Focus::Todos,
            todo_draft: String::new(),
            selected_todo: 0,
            shift_input: String::new(),
            duration_input: String::new(),
            duration_error: None,
        }
    }

    pub fn add_todo(&mut self, text: &str) -> Option<TodoId> {
        let id = self.todos.add(text)?;
        self.selected_todo = self.todos.len() - 1;
        Some(id)
    }

    pub fn toggle_todo(&mut self, id: TodoId) -> Option<bool> {
        self.todos.toggle(id)
    }

    pub fn selected_todo_id(&self) -> Option<TodoId> {
        self.todos.items().get(self.selected_todo).map(|item| item.id)
    }

    pub fn calculate_shift(&mut self, start_time: &str) -> &ShiftResult {
        let outcome = self.shift.calculate(start_time);
        if let Err(e) = &outcome {
            debug!(error = %e, "shift calculation rejected");
        }
        self.shift_result = ShiftResult {
            start_time: start_time.to_string(),
            outcome: Some(outcome),
        };
        &self.shift_result
    }

    pub fn set_timer_duration(&mut self, minutes: &str) -> Result<(), TimerError> {
        let result = self.timer.set_duration_input(minutes);
        self.duration_error = result.clone().err();
        result
    }

    pub fn start_timer(&mut self, now: Instant) {
        self.timer.start(now);
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.timer.advance_to(now);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Control::Continue;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Control::Continue;
            }
            // shortcuts we don't bind are not text
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                return Control::Continue
            }
            _ => {}
        }

        match self.focus {
            Focus::Todos => self.on_todo_key(key),
            Focus::Shift => self.on_shift_key(key),
            Focus::Timer => self.on_timer_key(key, now),
        }
        Control::Continue
    }

    fn on_todo_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.todo_draft.push(c),
            KeyCode::Backspace => {
                self.todo_draft.pop();
            }
            KeyCode::Up => self.selected_todo = self.selected_todo.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_todo + 1 < self.todos.len() {
                    self.selected_todo += 1;
                }
            }
            KeyCode::Enter if self.todo_draft.is_empty() => {
                if let Some(id) = self.selected_todo_id() {
                    self.toggle_todo(id);
                }
            }
            KeyCode::Enter => {
                let draft = self.todo_draft.clone();
                if self.add_todo(&draft).is_some() {
                    self.todo_draft.clear();
                }
            }
            _ => {}
        }
    }

    fn on_shift_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                if self.shift_input.len() < MAX_START_TIME_LEN {
                    self.shift_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.shift_input.pop();
            }
            KeyCode::Enter => {
                let input = self.shift_input.clone();
                self.calculate_shift(&input);
            }
            _ => {}
        }
    }

    fn on_timer_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.duration_input.len() < MAX_DURATION_LEN {
                    self.duration_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.duration_input.pop();
            }
            KeyCode::Enter => {
                let input = self.duration_input.clone();
                if self.set_timer_duration(&input).is_ok() {
                    self.duration_input.clear();
                }
            }
            KeyCode::Char('s') => self.start_timer(now),
            KeyCode::Char('p') => self.pause_timer(),
            KeyCode::Char('r') => self.reset_timer(),
            KeyCode::Char(' ') => {
                if self.timer.is_running() {
                    self.pause_timer();
                } else {
                    self.start_timer(now);
                }
            }
            _ => {}
        }
    }
}
