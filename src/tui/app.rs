use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

use crate::alert::Alert;
use crate::controller::{SearchController, SearchState};
use crate::tui::input::InputState;
use crate::tui::ui;
use crate::view::ResultsView;

const PAGE: u16 = 10;

pub struct App {
    controller: Arc<SearchController>,
    state_rx: watch::Receiver<SearchState>,
    alerts_rx: mpsc::UnboundedReceiver<Alert>,
    pub view: ResultsView,

    pub state: SearchState,
    pub input: InputState,
    pub scroll: u16,
    /// Modal alert; swallows the next key press.
    pub alert: Option<Alert>,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    /// Subscribes to the controller and mounts the screen, which dispatches
    /// the initial empty search.
    pub fn new(
        controller: Arc<SearchController>,
        alerts_rx: mpsc::UnboundedReceiver<Alert>,
        view: ResultsView,
    ) -> Self {
        let state_rx = controller.subscribe();
        controller.mount();
        let state = state_rx.borrow().clone();
        Self {
            controller,
            state_rx,
            alerts_rx,
            view,
            state,
            input: InputState::default(),
            scroll: 0,
            alert: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            self.sync();
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Pulls the latest controller state and the next pending alert.
    pub fn sync(&mut self) {
        if self.state_rx.has_changed().unwrap_or(false) {
            self.state = self.state_rx.borrow_and_update().clone();
        }
        if self.alert.is_none() {
            if let Ok(alert) = self.alerts_rx.try_recv() {
                self.alert = Some(alert);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.alert.is_some() {
            self.alert = None;
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let changed = match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('u') if ctrl => self.input.clear(),
            KeyCode::Char(c) if !ctrl && !alt => {
                self.input.insert(c);
                true
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => {
                self.input.left();
                false
            }
            KeyCode::Right => {
                self.input.right();
                false
            }
            KeyCode::Home => {
                self.input.home();
                false
            }
            KeyCode::End => {
                self.input.end();
                false
            }
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                false
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                false
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE);
                false
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(PAGE);
                false
            }
            _ => false,
        };

        if changed {
            self.scroll = 0;
            self.controller.set_query(self.input.value());
        }
    }
}
