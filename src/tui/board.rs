//! Kanban board interface.
//!
//! Three columns, one per task status. Cards are moved with a keyboard drag:
//! `Space` picks the selected card up, the arrow keys choose where it would
//! land, and `Space`/`Enter` drops it (or `Esc` cancels). Every drop is turned
//! into a [`DragEvent`] and handed to the board; only a change of column
//! reaches the server.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::{
    api::TaskApi,
    board::Board,
    dates::format_deadline_relative,
    display::{format_priority, stars, truncate},
    drag::{DragEvent, Slot},
    fields::{Priority, Status},
    form::FormMode,
    store::LoadOutcome,
    task::{Task, TaskId, MAX_SCORE},
    tui::{
        colors::{column_color, priority_color, GOLD},
        enums::{BoardMode, Carry},
        input::InputField,
        task_form::{TaskForm, DEADLINE_ORDER, DESCRIPTION_ORDER, PRIORITY_ORDER, STATUS_ORDER, TITLE_ORDER},
        utils::centered_rect,
    },
};

const CARD_HEIGHT: usize = 5;

/// Main board application state
pub struct BoardApp<A> {
    board: Board<A>,
    source_label: String,
    mode: BoardMode,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; 3],
    status_message: String,
    carry: Option<Carry>,
    form: TaskForm,
    comment: InputField,
    pending_reload: bool,
    pending_submit: bool,
}

impl<A: TaskApi> BoardApp<A> {
    /// Create the app. The first frame shows a loading state; tasks are fetched right after.
    pub fn new(board: Board<A>, source_label: String) -> Self {
        BoardApp {
            board,
            source_label,
            mode: BoardMode::Browse,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; 3],
            status_message: String::new(),
            carry: None,
            form: TaskForm::new(),
            comment: InputField::new(),
            pending_reload: true,
            pending_submit: false,
        }
    }

    fn selected_status(&self) -> Status {
        Status::from_index(self.selected_column).unwrap_or(Status::ToDo)
    }

    fn selected_task(&self) -> Option<&Task> {
        self.board
            .columns()
            .get(self.selected_status(), self.selected_card)
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task().and_then(|t| t.id.clone())
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Ensure selected column and card indices are valid
    fn clamp_selection(&mut self) {
        if self.selected_column >= Status::ALL.len() {
            self.selected_column = 0;
        }
        let len = self.board.columns().len(self.selected_status());
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    /// Put the selection on a task, wherever it now is.
    fn select_task(&mut self, id: &TaskId) {
        if let Some((status, index)) = self.board.columns().position_of(id) {
            self.selected_column = status.index();
            self.selected_card = index;
        }
        self.clamp_selection();
    }

    fn reload(&mut self) {
        self.pending_reload = false;
        let keep = self.selected_task_id();
        match self.board.reload() {
            Ok(LoadOutcome::Replaced(n)) => self.set_status_message(format!("Loaded {n} tasks")),
            Ok(LoadOutcome::Stale) => {}
            Err(e) => self.set_status_message(format!("Error loading tasks: {e}")),
        }
        match keep {
            Some(id) => self.select_task(&id),
            None => self.clamp_selection(),
        }
    }

    /// Send the staged form. Runs after a frame showing the form as busy.
    fn process_submit(&mut self) {
        self.pending_submit = false;
        let creating = *self.form.controller.mode() == FormMode::Create;
        match self.form.controller.submit(&mut self.board) {
            Ok(Some(task)) => {
                self.mode = BoardMode::Browse;
                self.set_status_message(if creating { "Task created" } else { "Task updated" });
                if let Some(id) = &task.id {
                    self.select_task(id);
                } else {
                    self.clamp_selection();
                }
            }
            Ok(None) => self.set_status_message("Title is required"),
            Err(e) => {
                // Keep the form on screen so the user can retry.
                self.form.reopen();
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    fn drop_card(&mut self, event: DragEvent) {
        let task_id = event.task_id.clone();
        match self.board.drag(&event) {
            Ok(Some(status)) => self.set_status_message(format!("Moved task to {status}")),
            Ok(None) if event.destination.is_none() => self.set_status_message("Move cancelled"),
            Ok(None) => self.clear_status_message(),
            Err(e) => self.set_status_message(format!("Error moving task: {e}")),
        }
        self.select_task(&task_id);
    }

    /// Move the selected card one column left or right in a single gesture.
    fn move_card(&mut self, right: bool) {
        let from = self.selected_status();
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(to) = (if right { from.next() } else { from.prev() }) else {
            return;
        };
        let destination = Slot::new(to, self.board.columns().len(to));
        self.drop_card(DragEvent {
            task_id: id,
            source: Slot::new(from, self.selected_card),
            destination: Some(destination),
        });
    }

    fn pick_up(&mut self) {
        let Some(id) = self.selected_task_id() else {
            self.set_status_message("No task selected");
            return;
        };
        let slot = Slot::new(self.selected_status(), self.selected_card);
        self.carry = Some(Carry {
            task_id: id,
            source: slot,
            target: slot,
        });
        self.mode = BoardMode::Carrying;
        self.set_status_message("Carrying card: arrows to move, Space/Enter to drop, Esc to cancel");
    }

    /// Number of landing positions in `status` for the carried card.
    fn landing_slots(&self, carry: &Carry, status: Status) -> usize {
        let len = self.board.columns().len(status);
        if status == carry.source.column {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    fn handle_carry_key(&mut self, code: KeyCode) {
        let Some(mut carry) = self.carry.take() else {
            self.mode = BoardMode::Browse;
            return;
        };
        match code {
            KeyCode::Left | KeyCode::Right => {
                let next = if code == KeyCode::Right {
                    carry.target.column.next()
                } else {
                    carry.target.column.prev()
                };
                if let Some(column) = next {
                    let max = self.landing_slots(&carry, column);
                    carry.target = Slot::new(column, carry.target.index.min(max));
                }
            }
            KeyCode::Up => carry.target.index = carry.target.index.saturating_sub(1),
            KeyCode::Down => {
                let max = self.landing_slots(&carry, carry.target.column);
                carry.target.index = (carry.target.index + 1).min(max);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.mode = BoardMode::Browse;
                self.drop_card(DragEvent {
                    task_id: carry.task_id,
                    source: carry.source,
                    destination: Some(carry.target),
                });
                return;
            }
            KeyCode::Esc => {
                self.mode = BoardMode::Browse;
                self.drop_card(DragEvent {
                    task_id: carry.task_id,
                    source: carry.source,
                    destination: None,
                });
                return;
            }
            _ => {}
        }
        self.carry = Some(carry);
    }

    fn handle_browse_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.clear_status_message();
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,

            // Card movement between columns (check first, before regular navigation)
            KeyCode::Left if modifiers.contains(KeyModifiers::CONTROL) => self.move_card(false),
            KeyCode::Right if modifiers.contains(KeyModifiers::CONTROL) => self.move_card(true),

            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if self.selected_column < Status::ALL.len() - 1 {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => self.selected_card = self.selected_card.saturating_sub(1),
            KeyCode::Down => {
                let len = self.board.columns().len(self.selected_status());
                if self.selected_card + 1 < len {
                    self.selected_card += 1;
                }
            }

            KeyCode::Char(' ') => self.pick_up(),
            KeyCode::Enter => {
                if self.selected_task().is_some() {
                    self.mode = BoardMode::Detail;
                }
            }
            KeyCode::Char('a') => {
                self.form.open_create(Local::now().date_naive());
                self.mode = BoardMode::TaskForm;
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task().cloned() {
                    match self.form.open_edit(&task) {
                        Ok(()) => self.mode = BoardMode::TaskForm,
                        Err(e) => self.set_status_message(format!("Error: {e}")),
                    }
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.selected_task().is_some() {
                    self.mode = BoardMode::ConfirmDelete;
                }
            }
            KeyCode::Char('c') => {
                if self.selected_task().is_some() {
                    self.comment.clear();
                    self.mode = BoardMode::Comment;
                }
            }
            KeyCode::Char(d @ '0'..='5') => self.evaluate(d as u8 - b'0'),
            KeyCode::Char('r') => {
                self.pending_reload = true;
                self.set_status_message("Loading tasks...");
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.mode = BoardMode::Help,
            _ => {}
        }
        false
    }

    fn evaluate(&mut self, score: u8) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.board.set_self_evaluation(&id, score) {
            Ok(true) => self.set_status_message(format!("Self evaluation set to {score}/{MAX_SCORE}")),
            Ok(false) => self.set_status_message("Self evaluation is only available for Done tasks"),
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
        self.select_task(&id);
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        if self.pending_submit {
            return;
        }
        match code {
            KeyCode::Esc => {
                self.form.cancel();
                self.mode = BoardMode::Browse;
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left_right(false),
            KeyCode::Right => self.form.handle_left_right(true),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Enter => {
                if !self.form.title_ok() {
                    self.set_status_message("Title is required");
                    return;
                }
                match self.form.apply_to_draft(Local::now().date_naive()) {
                    Ok(()) => self.pending_submit = true,
                    Err(msg) => self.set_status_message(msg),
                }
            }
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    fn handle_comment_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = BoardMode::Browse,
            KeyCode::Enter => {
                self.mode = BoardMode::Browse;
                let Some(id) = self.selected_task_id() else {
                    return;
                };
                match self.board.add_comment(&id, &self.comment.value) {
                    Ok(true) => self.set_status_message("Comment added"),
                    Ok(false) => self.set_status_message("Empty comment ignored"),
                    Err(e) => self.set_status_message(format!("Error adding comment: {e}")),
                }
                self.select_task(&id);
            }
            KeyCode::Backspace => self.comment.handle_backspace(),
            KeyCode::Delete => self.comment.handle_delete(),
            KeyCode::Left => self.comment.move_cursor_left(),
            KeyCode::Right => self.comment.move_cursor_right(),
            KeyCode::Char(c) => self.comment.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.mode = BoardMode::Browse;
                if let Some(id) = self.selected_task_id() {
                    match self.board.delete(&id) {
                        Ok(()) => self.set_status_message("Task deleted"),
                        Err(e) => self.set_status_message(format!("Error deleting task: {e}")),
                    }
                }
                self.clamp_selection();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = BoardMode::Browse,
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match self.mode {
            BoardMode::Browse => return self.handle_browse_key(code, modifiers),
            BoardMode::Carrying => self.handle_carry_key(code),
            BoardMode::TaskForm => self.handle_form_key(code),
            BoardMode::Comment => self.handle_comment_key(code),
            BoardMode::ConfirmDelete => self.handle_confirm_key(code),
            BoardMode::Detail => {
                if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.mode = BoardMode::Browse;
                }
            }
            BoardMode::Help => self.mode = BoardMode::Browse,
        }
        false
    }

    /// Handle keyboard input
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Render the board
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.mode {
            BoardMode::TaskForm => self.render_form(f),
            BoardMode::Comment => self.render_comment(f),
            BoardMode::ConfirmDelete => self.render_confirm(f),
            BoardMode::Detail => self.render_detail(f),
            BoardMode::Help => self.render_help(f),
            BoardMode::Browse | BoardMode::Carrying => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.source_label.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
            Span::raw(format!("  {} tasks", self.board.columns().total())),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        let columns = self.board.columns();
        let carried = self.carry.as_ref().and_then(|c| {
            self.board.task(&c.task_id).map(|t| (t, c.target))
        });

        for status in Status::ALL {
            // What the column looks like with the carried card lifted out and
            // placed at its prospective landing slot.
            let mut cards: Vec<(&Task, bool)> = columns
                .column(status)
                .iter()
                .filter(|t| carried.map_or(true, |(c, _)| c.id != t.id))
                .map(|t| (*t, false))
                .collect();
            if let Some((task, target)) = carried {
                if target.column == status {
                    cards.insert(target.index.min(cards.len()), (task, true));
                }
            }

            let selected = match (&self.carry, status.index() == self.selected_column) {
                (Some(c), _) if c.target.column == status => Some(c.target.index),
                (None, true) => Some(self.selected_card),
                _ => None,
            };
            Self::render_column(
                f,
                layout[status.index()],
                status,
                &cards,
                selected,
                &mut self.column_scroll_offsets[status.index()],
            );
        }
    }

    /// Render a single column
    fn render_column(
        f: &mut Frame,
        area: Rect,
        status: Status,
        cards: &[(&Task, bool)],
        selected: Option<usize>,
        scroll: &mut usize,
    ) {
        let color = column_color(status);
        let border_style = if selected.is_some() {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", status, cards.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if cards.is_empty() {
            let empty = Paragraph::new("No tasks")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let visible = (inner.height as usize / CARD_HEIGHT).max(1);
        if let Some(sel) = selected {
            if sel < *scroll {
                *scroll = sel;
            } else if sel >= *scroll + visible {
                *scroll = sel + 1 - visible;
            }
        }
        *scroll = (*scroll).min(cards.len().saturating_sub(1));

        let mut y = 0;
        let mut rendered = 0;
        for (index, (task, carried)) in cards.iter().enumerate().skip(*scroll) {
            if y + CARD_HEIGHT > inner.height as usize {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            Self::render_card(f, card_area, task, selected == Some(index), *carried, color);
            y += CARD_HEIGHT;
            rendered += 1;
        }

        let remaining = cards.len() - *scroll - rendered;
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below")).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    /// Render a single task card
    fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool, carried: bool, color: Color) {
        let style = if carried {
            Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD | Modifier::ITALIC)
        } else if is_selected {
            Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let width = area.width.saturating_sub(2) as usize;
        let today = Local::now().date_naive();
        let title = if carried { format!("» {}", task.title) } else { task.title.clone() };
        let comment_count = task.comments().count();

        let mut lines = vec![
            Line::from(truncate(&title, width)),
            Line::from(vec![
                Span::styled(
                    format_priority(task.priority),
                    Style::default().fg(if is_selected || carried { Color::Black } else { priority_color(task.priority) }),
                ),
                Span::raw(format!(" | due {}", format_deadline_relative(task.deadline, today))),
            ]),
        ];
        let mut scores = format!("Self {}", stars(task.self_evaluation));
        if task.reviewer_score > 0 {
            scores.push_str(&format!("  Review {}", stars(task.reviewer_score)));
        }
        if comment_count > 0 {
            scores.push_str(&format!("  [{comment_count}]"));
        }
        lines.push(Line::from(truncate(&scores, width)));

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(style);
        f.render_widget(card, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let hidden = self.board.columns().hidden();
        let mut text = if self.pending_reload {
            "Loading tasks...".to_string()
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "Space: Pick up | Ctrl+←/→: Move | a: Add | e: Edit | x: Delete | c: Comment | 0-5: Rate | r: Reload | h: Help"
                .to_string()
        };
        if hidden > 0 {
            text.push_str(&format!("  [{hidden} hidden: unknown status]"));
        }
        let color = column_color(self.selected_status());
        let text_color = if color == GOLD { Color::Rgb(20, 20, 20) } else { Color::White };
        let bar = Paragraph::new(text)
            .style(Style::default().bg(color).fg(text_color))
            .alignment(Alignment::Left);
        f.render_widget(bar, area);
    }

    fn popup_block(title: &str) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    }

    fn with_cursor(input: &InputField, active: bool) -> String {
        if !active {
            return input.value.clone();
        }
        let mut s: String = input.value.chars().take(input.cursor).collect();
        s.push('▏');
        s.extend(input.value.chars().skip(input.cursor));
        s
    }

    fn render_form(&self, f: &mut Frame) {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let form = &self.form;
        let label = |order: usize, name: &str| {
            let style = if form.current_field == order {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(format!("{name:<13}"), style)
        };
        let priority = Priority::ALL[form.priority % Priority::ALL.len()];
        let status = Status::ALL[form.status % Status::ALL.len()];

        let mut lines = vec![
            Line::from(vec![
                label(TITLE_ORDER, "Title"),
                Span::raw(Self::with_cursor(&form.title, form.current_field == TITLE_ORDER)),
            ]),
            Line::from(vec![
                label(DESCRIPTION_ORDER, "Description"),
                Span::raw(Self::with_cursor(&form.description, form.current_field == DESCRIPTION_ORDER)),
            ]),
            Line::from(vec![
                label(PRIORITY_ORDER, "Priority"),
                Span::raw(format!("< {} >", format_priority(priority))),
            ]),
            Line::from(vec![
                label(DEADLINE_ORDER, "Deadline"),
                Span::raw(Self::with_cursor(&form.deadline, form.current_field == DEADLINE_ORDER)),
            ]),
            Line::from(vec![label(STATUS_ORDER, "Status"), Span::raw(format!("< {status} >"))]),
            Line::from(""),
        ];

        let footer = if self.pending_submit {
            Line::from(Span::styled("Processing...", Style::default().fg(Color::Yellow)))
        } else if form.title_ok() {
            Line::from("Enter: Save | Esc: Cancel | Tab: Next field | ←/→: Change")
        } else {
            Line::from(Span::styled(
                "Title is required | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            ))
        };
        lines.push(footer);
        if let Some(err) = form.controller.last_error() {
            lines.push(Line::from(Span::styled(format!("Last error: {err}"), Style::default().fg(Color::Red))));
        }

        let title = if form.is_edit() { "Edit Task" } else { "Add New Task" };
        let popup = Paragraph::new(lines)
            .block(Self::popup_block(title))
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_comment(&self, f: &mut Frame) {
        let area = centered_rect(60, 20, f.area());
        f.render_widget(Clear, area);
        let title = self
            .selected_task()
            .map(|t| format!("Comment on '{}'", t.title))
            .unwrap_or_else(|| "Comment".into());
        let popup = Paragraph::new(vec![
            Line::from(Self::with_cursor(&self.comment, true)),
            Line::from(""),
            Line::from("Enter: Post | Esc: Cancel"),
        ])
        .block(Self::popup_block(&title))
        .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);
        let title = self.selected_task().map(|t| t.title.clone()).unwrap_or_default();
        let popup = Paragraph::new(vec![
            Line::from(Span::styled("Delete Task?", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("'{title}' will be deleted. This action cannot be undone.")),
            Line::from(""),
            Line::from("y: Delete | n: Cancel"),
        ])
        .block(Self::popup_block("Confirm"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_detail(&self, f: &mut Frame) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let area = centered_rect(80, 80, f.area());
        f.render_widget(Clear, area);
        let today = Local::now().date_naive();

        let mut lines = vec![
            Line::from(Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("Id:           {}", task.id.as_ref().map(TaskId::as_str).unwrap_or("-"))),
            Line::from(format!("Status:       {}", task.status)),
            Line::from(format!("Priority:     {}", format_priority(task.priority))),
            Line::from(format!("Deadline:     {}", format_deadline_relative(task.deadline, today))),
            Line::from(format!(
                "Assigned:     {}",
                task.date_assigned.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
            )),
            Line::from(format!("Self:         {}", stars(task.self_evaluation))),
            Line::from(format!("Review:       {}", stars(task.reviewer_score))),
            Line::from(""),
            Line::from("Description:"),
            Line::from(if task.description.is_empty() { "-".to_string() } else { task.description.clone() }),
            Line::from(""),
            Line::from("Comments:"),
        ];
        let mut any = false;
        for comment in task.comments() {
            lines.push(Line::from(format!("  • {comment}")));
            any = true;
        }
        if !any {
            lines.push(Line::from("  -"));
        }

        let popup = Paragraph::new(lines)
            .block(Self::popup_block("Task Details (Enter to close)"))
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 70, f.area());
        f.render_widget(Clear, area);
        let rows = [
            ("←/→ ↑/↓", "Select column / card"),
            ("Space", "Pick up card; Space/Enter drops, Esc cancels"),
            ("Ctrl+←/→", "Move card one column"),
            ("Enter", "Task details"),
            ("a", "Add task"),
            ("e", "Edit task"),
            ("x / Del", "Delete task"),
            ("c", "Comment"),
            ("0-5", "Self evaluation (Done tasks)"),
            ("r", "Reload from server"),
            ("q / Esc", "Quit"),
        ];
        let lines: Vec<Line> = rows
            .iter()
            .map(|(k, v)| {
                Line::from(vec![
                    Span::styled(format!("{k:<12}"), Style::default().fg(Color::Yellow)),
                    Span::raw(*v),
                ])
            })
            .collect();
        let popup = Paragraph::new(lines)
            .block(Self::popup_block("Help (any key to close)"))
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            // Network calls happen after a frame has shown the busy state.
            if self.pending_reload {
                self.reload();
                continue;
            }
            if self.pending_submit {
                self.process_submit();
                continue;
            }

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
