use crate::{notify::AlertQueue, storage::KeyValueStore, task::Task, task_list::TaskList};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

/// Poll interval while something is fading.
const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(250);

const TEXT_RGB: (u8, u8, u8) = (230, 230, 230);
const DONE_RGB: (u8, u8, u8) = (170, 170, 170);
const ACCENT: Color = Color::Rgb(92, 92, 255);
const DANGER: Color = Color::Rgb(255, 92, 92);

pub type Board<S> = TaskList<S, AlertQueue>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    List,
}

#[derive(Debug, Default)]
pub struct App {
    pub focus: Focus,
    pub selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn handle_key<S: KeyValueStore>(
        &mut self,
        key: KeyEvent,
        list: &mut Board<S>,
        now: Instant,
    ) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // Alerts are modal.
        if list.notifier_mut().dismiss().is_some() {
            return;
        }

        if list.editing().is_some() {
            self.handle_edit_key(key, list);
        } else {
            match self.focus {
                Focus::Input => self.handle_input_key(key, list, now),
                Focus::List => self.handle_list_key(key, list, now),
            }
        }
        self.clamp(list.len());
    }

    fn handle_input_key<S: KeyValueStore>(
        &mut self,
        key: KeyEvent,
        list: &mut Board<S>,
        now: Instant,
    ) {
        match key.code {
            KeyCode::Char(c) => list.draft_mut().push(c),
            KeyCode::Backspace => {
                list.draft_mut().pop();
            }
            KeyCode::Enter => {
                list.submit_draft(now);
            }
            KeyCode::Tab | KeyCode::Down if !list.is_empty() => self.focus = Focus::List,
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_list_key<S: KeyValueStore>(
        &mut self,
        key: KeyEvent,
        list: &mut Board<S>,
        now: Instant,
    ) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < list.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id(list) {
                    list.toggle_complete(&id);
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task(list).cloned() {
                    list.start_edit(&task.id, &task.text);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id(list) {
                    list.delete_task(&id, now);
                }
            }
            KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::Input,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_edit_key<S: KeyValueStore>(&mut self, key: KeyEvent, list: &mut Board<S>) {
        match key.code {
            KeyCode::Char(c) => {
                if let Some(buffer) = list.edit_buffer_mut() {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = list.edit_buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Enter => {
                if let Some(id) = list.editing().map(|e| e.id.clone()) {
                    list.commit_edit(&id);
                }
            }
            KeyCode::Esc => list.cancel_edit(),
            _ => {}
        }
    }

    /// Tasks on their way out can no longer be acted on.
    fn selected_task<'a, S: KeyValueStore>(&self, list: &'a Board<S>) -> Option<&'a Task> {
        list.tasks()
            .get(self.selected)
            .filter(|t| !list.is_exiting(&t.id))
    }

    fn selected_id<S: KeyValueStore>(&self, list: &Board<S>) -> Option<String> {
        self.selected_task(list).map(|t| t.id.clone())
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.focus = Focus::Input;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    list: &mut Board<S>,
) -> io::Result<()> {
    let mut app = App::default();

    // First frame goes out before the snapshot is read.
    terminal.draw(|f| draw(f, &app, list, Instant::now()))?;
    list.load();

    while !app.should_quit {
        terminal.draw(|f| draw(f, &app, list, Instant::now()))?;

        let timeout = if list.is_animating() { FRAME } else { IDLE };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key, list, Instant::now());
            }
        }
        list.tick(Instant::now());
        app.clamp(list.len());
    }
    Ok(())
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App, list: &Board<S>, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(Span::styled(
            "Simple To-Do List",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    draw_input(f, app, list, chunks[1]);
    draw_tasks(f, app, list, now, chunks[2]);

    f.render_widget(
        Paragraph::new(Span::styled(help_text(app, list), Style::default().fg(Color::DarkGray))),
        chunks[3],
    );

    if let Some(alert) = list.notifier().current() {
        let area = centered(f.area(), 44, 6);
        let popup = Paragraph::new(vec![
            Line::from(alert.body.as_str()),
            Line::from(""),
            Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(alert.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DANGER)),
        );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn draw_input<S: KeyValueStore>(f: &mut Frame, app: &App, list: &Board<S>, area: Rect) {
    let focused = app.focus == Focus::Input && list.editing().is_none();
    let content = if list.draft().is_empty() {
        Span::styled("Add a new task", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(list.draft())
    };
    let input = Paragraph::new(content).block(
        Block::default()
            .title("+")
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(ACCENT)
            } else {
                Style::default()
            }),
    );
    f.render_widget(input, area);

    if focused && list.notifier().is_empty() {
        let typed = u16::try_from(list.draft().chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(typed);
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_tasks<S: KeyValueStore>(
    f: &mut Frame,
    app: &App,
    list: &Board<S>,
    now: Instant,
    area: Rect,
) {
    let editing = list.editing();
    let items: Vec<ListItem> = list
        .tasks()
        .iter()
        .map(|t| {
            let progress = list.progress(&t.id, now);
            let line = match editing {
                Some(edit) if edit.id == t.id => Line::from(vec![
                    Span::raw("[~] "),
                    Span::styled(edit.buffer.as_str(), Style::default().fg(Color::Yellow)),
                    Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                ]),
                _ if t.completed => Line::from(vec![
                    Span::styled("[x] ", Style::default().fg(faded(DONE_RGB, progress))),
                    Span::styled(
                        t.text.as_str(),
                        Style::default()
                            .fg(faded(DONE_RGB, progress))
                            .add_modifier(Modifier::CROSSED_OUT),
                    ),
                ]),
                _ => Line::from(vec![
                    Span::styled("[ ] ", Style::default().fg(faded(TEXT_RGB, progress))),
                    Span::styled(t.text.as_str(), Style::default().fg(faded(TEXT_RGB, progress))),
                ]),
            };
            ListItem::new(line)
        })
        .collect();

    let focused = app.focus == Focus::List;
    let tasks = List::new(items)
        .block(
            Block::default()
                .title(format!("Tasks ({})", list.len()))
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(ACCENT)
                } else {
                    Style::default()
                }),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused && !list.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(tasks, area, &mut state);
}

fn help_text<S: KeyValueStore>(app: &App, list: &Board<S>) -> &'static str {
    if !list.notifier().is_empty() {
        "any key: dismiss"
    } else if list.editing().is_some() {
        "enter: save  esc: cancel"
    } else if app.focus == Focus::List {
        "space: done  e: edit  d: delete  tab: add  q: quit"
    } else {
        "enter: add  tab: list  esc: quit"
    }
}

/// Scales a colour towards black by the fade progress.
fn faded((r, g, b): (u8, u8, u8), progress: f32) -> Color {
    let p = progress.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * p).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
