use std::{
    collections::HashSet,
    env, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
};

use quill_tui::assist;
use quill_tui::book::{BlockKind, Book, ContentBlock};
use quill_tui::notes::NotesState;
use quill_tui::outline::{build_outline, total_words};
use quill_tui::outline_view::{
    self, OutlineEvent, OutlineRow, dispatch_click, render_rows, visible_rows,
};
use quill_tui::storage::{self, BookFile};
use quill_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const OUTLINE_WIDTH: u16 = 38;
const MOUSE_SCROLL_LINES: usize = 3;

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(path_arg) = args.next() else {
        eprintln!("Usage: quill <book.json>");
        return Ok(());
    };
    let path = PathBuf::from(path_arg);

    let (file, initial_status) = storage::load_book(&path)?;
    let mut app = App::new(file, path, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Outline,
}

#[derive(Clone, Copy)]
struct KindMenuItem {
    label: &'static str,
    kind: BlockKind,
    shortcut: char,
}

const KIND_MENU_ITEMS: [KindMenuItem; 4] = [
    KindMenuItem {
        label: "Text",
        kind: BlockKind::Text,
        shortcut: '1',
    },
    KindMenuItem {
        label: "Chapter",
        kind: BlockKind::Chapter,
        shortcut: '2',
    },
    KindMenuItem {
        label: "Section",
        kind: BlockKind::Section,
        shortcut: '3',
    },
    KindMenuItem {
        label: "Page Break",
        kind: BlockKind::PageBreak,
        shortcut: '4',
    },
];

struct KindMenuState {
    selected_index: usize,
}

impl KindMenuState {
    fn new(current: BlockKind) -> Self {
        let selected_index = KIND_MENU_ITEMS
            .iter()
            .position(|item| item.kind == current)
            .unwrap_or(0);
        Self { selected_index }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = KIND_MENU_ITEMS.len() as i32;
        self.selected_index = (self.selected_index as i32 + delta).rem_euclid(len) as usize;
    }

    fn current_kind(&self) -> BlockKind {
        KIND_MENU_ITEMS[self.selected_index].kind
    }

    fn shortcut_kind(&mut self, ch: char) -> Option<BlockKind> {
        let (idx, item) = KIND_MENU_ITEMS
            .iter()
            .enumerate()
            .find(|(_, item)| item.shortcut == ch)?;
        self.selected_index = idx;
        Some(item.kind)
    }
}

struct App {
    book: Book,
    notes: NotesState,
    notes_open: bool,
    theme: Theme,
    collapsed: HashSet<String>,
    focus: Focus,
    outline_index: usize,
    outline_rows: Vec<OutlineRow>,
    outline_list: ListState,
    outline_inner: Rect,
    editor_inner: Rect,
    editor_block_lines: Vec<Option<usize>>,
    file_path: PathBuf,
    scroll_top: usize,
    last_view_height: usize,
    should_quit: bool,
    dirty: bool,
    status_message: Option<(String, Instant)>,
    kind_menu: Option<KindMenuState>,
}

impl App {
    fn new(file: BookFile, path: PathBuf, initial_status: Option<String>) -> Self {
        let theme = Theme::by_name(&file.theme);
        Self {
            book: Book::from_blocks(file.blocks),
            notes: NotesState::new(file.notes),
            notes_open: false,
            theme,
            collapsed: HashSet::new(),
            focus: Focus::Editor,
            outline_index: 0,
            outline_rows: Vec::new(),
            outline_list: ListState::default(),
            outline_inner: Rect::default(),
            editor_inner: Rect::default(),
            editor_block_lines: Vec::new(),
            file_path: path,
            scroll_top: 0,
            last_view_height: 1,
            should_quit: false,
            dirty: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
            kind_menu: None,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let status_height = if area.height > 1 { 2 } else { 1 };
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(status_height)])
            .split(area);
        let main_area = vertical[0];
        let status_area = vertical[1];

        let outline_width = OUTLINE_WIDTH.min(main_area.width / 2);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(outline_width),
            ])
            .split(main_area);
        let editor_area = horizontal[0];
        let scrollbar_area = horizontal[1];
        let outline_area = horizontal[2];

        self.draw_editor(frame, editor_area, scrollbar_area);
        self.draw_outline(frame, outline_area);

        let status_text = self.status_line();
        let status_widget = Paragraph::new(Line::from(Span::styled(
            status_text,
            self.theme.status_bar_style(),
        )))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(status_widget, status_area);

        if self.kind_menu.is_some() {
            self.draw_kind_menu(frame, area);
        }
        if self.notes_open {
            self.draw_notes(frame, area);
        }
    }

    fn draw_editor(&mut self, frame: &mut Frame, area: Rect, scrollbar_area: Rect) {
        self.editor_inner = area;

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut block_lines: Vec<Option<usize>> = Vec::new();
        let mut cursor_position: Option<(usize, u16)> = None;

        for (idx, block) in self.book.blocks().iter().enumerate() {
            if idx > 0 {
                lines.push(Line::from(""));
                block_lines.push(None);
            }
            let selected = idx == self.book.selected_index();
            let (line, prefix_width) = editor_line(block, selected, &self.theme);
            if selected {
                let column =
                    prefix_width + display_width(block.content.chars().take(self.book.cursor()));
                cursor_position = Some((lines.len(), column as u16));
            }
            block_lines.push(Some(idx));
            lines.push(line);
        }

        let total_lines = lines.len().max(1);
        let viewport_height = area.height as usize;
        self.last_view_height = viewport_height.max(1);
        self.adjust_scroll(
            cursor_position.map(|(line, _)| line),
            total_lines,
            viewport_height,
        );
        self.editor_block_lines = block_lines;

        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, area);

        let mut scrollbar_state = ScrollbarState::new(total_lines).position(self.scroll_top);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);

        if self.focus == Focus::Editor && self.kind_menu.is_none() && !self.notes_open {
            if let Some((line, column)) = cursor_position {
                if line >= self.scroll_top
                    && line < self.scroll_top + viewport_height
                    && area.width > 0
                {
                    let cursor_y = area.y + (line - self.scroll_top) as u16;
                    let cursor_x = area.x + column.min(area.width - 1);
                    frame.set_cursor_position(Position::new(cursor_x, cursor_y));
                }
            }
        }
    }

    fn draw_outline(&mut self, frame: &mut Frame, area: Rect) {
        let forest = build_outline(self.book.blocks());
        self.outline_rows = visible_rows(&forest, &self.collapsed);
        if self.outline_index >= self.outline_rows.len() {
            self.outline_index = self.outline_rows.len().saturating_sub(1);
        }

        let block = Block::default()
            .title("Outline")
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(self.theme.border));
        self.outline_inner = block.inner(area);

        let items: Vec<ListItem> = render_rows(&self.outline_rows, &self.theme)
            .into_iter()
            .map(ListItem::new)
            .collect();

        let highlight = if self.focus == Focus::Outline {
            self.theme.selection_style()
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let list = List::new(items).block(block).highlight_style(highlight);

        if self.outline_rows.is_empty() {
            self.outline_list.select(None);
        } else {
            self.outline_list.select(Some(self.outline_index));
        }
        frame.render_stateful_widget(list, area, &mut self.outline_list);
    }

    fn draw_kind_menu(&self, frame: &mut Frame, area: Rect) {
        let Some(menu) = &self.kind_menu else {
            return;
        };
        if area.width < 3 || area.height < 3 {
            return;
        }

        let width = 20u16.min(area.width);
        let height = (KIND_MENU_ITEMS.len() as u16 + 2).min(area.height);
        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, popup_area);

        let popup_style = self.theme.popup_style();
        let items: Vec<ListItem> = KIND_MENU_ITEMS
            .iter()
            .map(|item| {
                ListItem::new(Line::from(Span::styled(
                    format!("{} {}", item.shortcut, item.label),
                    popup_style,
                )))
            })
            .collect();

        let mut state = ListState::default();
        state.select(Some(menu.selected_index));

        let list = List::new(items)
            .highlight_style(self.theme.selection_style())
            .style(popup_style)
            .block(
                Block::default()
                    .title("Block Kind")
                    .borders(Borders::ALL)
                    .style(popup_style)
                    .border_style(Style::default().fg(self.theme.border)),
            );
        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn draw_notes(&self, frame: &mut Frame, area: Rect) {
        if area.width < 5 || area.height < 4 {
            return;
        }

        let width = 44u16.min(area.width);
        let content_rows = self.notes.notes().len().max(1) + usize::from(self.notes.is_editing());
        let height = ((content_rows as u16) + 2).min(area.height).max(3);
        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, popup_area);

        let popup_style = self.theme.popup_style();
        let mut items: Vec<ListItem> = Vec::new();
        for note in self.notes.notes() {
            let marker = if note.done { "[✓] " } else { "[ ] " };
            let style = if note.done {
                popup_style.add_modifier(Modifier::CROSSED_OUT)
            } else {
                popup_style
            };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("{marker}{}", note.text),
                style,
            ))));
        }
        if let Some(input) = self.notes.input() {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("> {input}_"),
                popup_style.add_modifier(Modifier::BOLD),
            ))));
        } else if self.notes.is_empty() {
            items.push(ListItem::new(Line::from(Span::styled(
                "no notes — press n to add one",
                popup_style.add_modifier(Modifier::DIM),
            ))));
        }

        let mut state = ListState::default();
        if !self.notes.is_empty() && !self.notes.is_editing() {
            state.select(Some(self.notes.selected_index()));
        }

        let list = List::new(items)
            .highlight_style(self.theme.selection_style())
            .style(popup_style)
            .block(
                Block::default()
                    .title("Notes")
                    .borders(Borders::ALL)
                    .style(popup_style)
                    .border_style(Style::default().fg(self.theme.border)),
            );
        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn adjust_scroll(
        &mut self,
        cursor_line: Option<usize>,
        total_lines: usize,
        viewport_height: usize,
    ) {
        let viewport = viewport_height.max(1);
        let max_scroll = total_lines.saturating_sub(viewport).min(total_lines);
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
        if let Some(line) = cursor_line {
            if line < self.scroll_top {
                self.scroll_top = line;
            } else if line >= self.scroll_top + viewport {
                self.scroll_top = line.saturating_add(1).saturating_sub(viewport);
            }
        }
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
    }

    fn status_line(&mut self) -> String {
        self.prune_status_message();

        let position = format!(
            "[{}/{} {}]",
            self.book.selected_index() + 1,
            self.book.len(),
            self.book.selected_block().kind.label()
        );
        if let Some((message, _)) = &self.status_message {
            return format!("{position} | {message}");
        }

        if self.focus == Focus::Outline {
            if let Some(row) = self.outline_rows.get(self.outline_index) {
                // The full untruncated label, the terminal's tooltip stand-in.
                return format!(
                    "{position} | Outline: {} ({} words) | Enter jump | Space fold",
                    row.label, row.word_count
                );
            }
        }

        let marker = if self.dirty { "*" } else { "" };
        format!(
            "{position} | {}{} | Words: {} | Ctrl-S save | Ctrl-Q quit",
            self.file_path.display(),
            marker,
            total_words(self.book.blocks())
        )
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if self.handle_kind_menu_key(code) {
            return Ok(());
        }
        if self.handle_notes_key(code, modifiers) {
            return Ok(());
        }

        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.save()?;
            }
            (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.export()?;
            }
            (KeyCode::Char('g'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.assist()?;
            }
            (KeyCode::Char('n'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.notes_open = true;
            }
            (KeyCode::Char('t'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.theme = self.theme.next();
                self.mark_dirty();
                let name = self.theme.name;
                self.set_status(format!("Theme: {name}"));
            }
            (KeyCode::Char(' '), m) | (KeyCode::Char('p'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.kind_menu = Some(KindMenuState::new(self.book.selected_block().kind));
            }
            (KeyCode::Tab, _) => {
                self.focus = match self.focus {
                    Focus::Editor => {
                        self.sync_outline_selection();
                        Focus::Outline
                    }
                    Focus::Outline => Focus::Editor,
                };
            }
            _ => match self.focus {
                Focus::Editor => self.handle_editor_key(code, modifiers),
                Focus::Outline => self.handle_outline_key(code),
            },
        }
        Ok(())
    }

    fn handle_editor_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match (code, modifiers) {
            (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => {
                if self.book.move_selected_up() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => {
                if self.book.move_selected_down() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => {
                if self.book.delete_selected() {
                    self.mark_dirty();
                    self.set_status("Block deleted");
                }
            }
            (KeyCode::Up, _) => {
                self.book.select_previous();
            }
            (KeyCode::Down, _) => {
                self.book.select_next();
            }
            (KeyCode::Left, _) => {
                self.book.move_cursor_left();
            }
            (KeyCode::Right, _) => {
                self.book.move_cursor_right();
            }
            (KeyCode::Home, _) => {
                self.book.move_cursor_to_start();
            }
            (KeyCode::End, _) => {
                self.book.move_cursor_to_end();
            }
            (KeyCode::Backspace, _) => {
                if self.book.backspace() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Delete, _) => {
                if self.book.delete() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Enter, _) => {
                self.book.insert_after(BlockKind::Text);
                self.mark_dirty();
            }
            (KeyCode::Char(ch), m)
                if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
            {
                if self.book.insert_char(ch) {
                    self.mark_dirty();
                }
            }
            (KeyCode::PageUp, _) => {
                self.scroll_top = self.scroll_top.saturating_sub(self.last_view_height.max(1));
            }
            (KeyCode::PageDown, _) => {
                self.scroll_top += self.last_view_height.max(1);
            }
            _ => {}
        }
    }

    fn handle_outline_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.focus = Focus::Editor;
            }
            KeyCode::Up => {
                if self.outline_index > 0 {
                    self.outline_index -= 1;
                }
            }
            KeyCode::Down => {
                if self.outline_index + 1 < self.outline_rows.len() {
                    self.outline_index += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(row) = self.outline_rows.get(self.outline_index) {
                    let event = outline_view::activate(row);
                    self.apply_outline_event(event);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(row) = self.outline_rows.get(self.outline_index) {
                    if let Some(event) = outline_view::toggle(row) {
                        self.apply_outline_event(event);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_kind_menu_key(&mut self, code: KeyCode) -> bool {
        if self.kind_menu.is_none() {
            return false;
        }
        match code {
            KeyCode::Esc => {
                self.kind_menu = None;
            }
            KeyCode::Up => {
                if let Some(menu) = self.kind_menu.as_mut() {
                    menu.move_selection(-1);
                }
            }
            KeyCode::Down => {
                if let Some(menu) = self.kind_menu.as_mut() {
                    menu.move_selection(1);
                }
            }
            KeyCode::Enter => {
                if let Some(menu) = &self.kind_menu {
                    let kind = menu.current_kind();
                    if self.book.set_kind(kind) {
                        self.mark_dirty();
                    }
                }
                self.kind_menu = None;
            }
            KeyCode::Char(ch) => {
                let kind = self
                    .kind_menu
                    .as_mut()
                    .and_then(|menu| menu.shortcut_kind(ch));
                if let Some(kind) = kind {
                    if self.book.set_kind(kind) {
                        self.mark_dirty();
                    }
                    self.kind_menu = None;
                }
            }
            _ => {}
        }
        true
    }

    fn handle_notes_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if !self.notes_open {
            return false;
        }

        if self.notes.is_editing() {
            match code {
                KeyCode::Esc => self.notes.cancel_input(),
                KeyCode::Enter => {
                    if self.notes.commit_input() {
                        self.mark_dirty();
                    }
                }
                KeyCode::Backspace => self.notes.backspace_input(),
                KeyCode::Char(ch)
                    if !modifiers.contains(KeyModifiers::CONTROL)
                        && !modifiers.contains(KeyModifiers::ALT) =>
                {
                    self.notes.push_input_char(ch);
                }
                _ => {}
            }
            return true;
        }

        match (code, modifiers) {
            (KeyCode::Esc, _) => {
                self.notes_open = false;
            }
            (KeyCode::Char('n'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.notes_open = false;
            }
            (KeyCode::Char('n'), _) | (KeyCode::Char('a'), _) => {
                self.notes.start_input();
            }
            (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => {
                if self.notes.toggle_selected() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => {
                if self.notes.remove_selected() {
                    self.mark_dirty();
                }
            }
            (KeyCode::Up, _) => self.notes.move_selection(-1),
            (KeyCode::Down, _) => self.notes.move_selection(1),
            _ => {}
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.kind_menu.is_some() || self.notes_open {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                if rect_contains(self.outline_inner, position) {
                    self.outline_click(position);
                } else if rect_contains(self.editor_inner, position) {
                    self.editor_click(position);
                }
            }
            MouseEventKind::ScrollUp => {
                self.scroll_top = self.scroll_top.saturating_sub(MOUSE_SCROLL_LINES);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_top += MOUSE_SCROLL_LINES;
            }
            _ => {}
        }
    }

    fn outline_click(&mut self, position: Position) {
        let offset = self.outline_list.offset();
        let index = offset + (position.y - self.outline_inner.y) as usize;
        let Some(row) = self.outline_rows.get(index) else {
            return;
        };
        self.focus = Focus::Outline;
        self.outline_index = index;
        let column = (position.x - self.outline_inner.x) as usize;
        let event = dispatch_click(row, column);
        self.apply_outline_event(event);
    }

    fn editor_click(&mut self, position: Position) {
        let line = self.scroll_top + (position.y - self.editor_inner.y) as usize;
        let Some(Some(block_index)) = self.editor_block_lines.get(line).copied() else {
            return;
        };
        self.focus = Focus::Editor;
        self.book.select(block_index);
    }

    fn apply_outline_event(&mut self, event: OutlineEvent) {
        match event {
            OutlineEvent::Navigate(id) => {
                // First match wins for duplicate ids.
                if self.book.select_by_id(&id) {
                    self.focus = Focus::Editor;
                }
            }
            OutlineEvent::ToggleCollapse(id) => {
                if !self.collapsed.remove(&id) {
                    self.collapsed.insert(id);
                }
            }
        }
    }

    fn sync_outline_selection(&mut self) {
        let id = &self.book.selected_block().id;
        if let Some(index) = self.outline_rows.iter().position(|row| &row.id == id) {
            self.outline_index = index;
        }
    }

    fn save(&mut self) -> Result<()> {
        let file = BookFile {
            blocks: self.book.blocks().to_vec(),
            notes: self.notes.notes().to_vec(),
            theme: self.theme.name.to_string(),
        };
        storage::save_book(&self.file_path, &file)?;
        self.dirty = false;
        self.set_status("Saved");
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        let path = self.file_path.with_extension("txt");
        storage::export_to(&path, self.book.blocks())?;
        self.set_status(format!("Exported to {}", path.display()));
        Ok(())
    }

    fn assist(&mut self) -> Result<()> {
        let id = self.book.selected_block().id.clone();
        let Some(prompt) = assist::compose_prompt(self.book.blocks(), &id) else {
            self.set_status("Nothing to ask about this block");
            return Ok(());
        };
        let path = self.file_path.with_extension("prompt.txt");
        std::fs::write(&path, format!("{}\n\n{}\n", prompt.prompt, prompt.url()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.set_status(format!("Assist prompt written to {}", path.display()));
        Ok(())
    }
}

fn rect_contains(rect: Rect, position: Position) -> bool {
    position.x >= rect.x
        && position.x < rect.x + rect.width
        && position.y >= rect.y
        && position.y < rect.y + rect.height
}

fn display_width(chars: impl Iterator<Item = char>) -> usize {
    use unicode_width::UnicodeWidthChar;
    chars
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// One editor line per block: a selection gutter, a kind marker, then the
/// content. Returns the line and the prefix display width so the caller can
/// position the terminal cursor.
fn editor_line(block: &ContentBlock, selected: bool, theme: &Theme) -> (Line<'static>, usize) {
    let (marker, content_style) = match block.kind {
        BlockKind::Chapter => (
            "# ",
            Style::default()
                .fg(theme.heading)
                .add_modifier(Modifier::BOLD),
        ),
        BlockKind::Section => ("## ", Style::default().fg(theme.heading)),
        BlockKind::Text => ("", Style::default().fg(theme.foreground)),
        BlockKind::PageBreak => ("", theme.annotation_style()),
    };

    let gutter = if selected { "▌" } else { " " };
    let mut spans = vec![Span::styled(gutter.to_string(), theme.annotation_style())];
    let prefix_width = 1 + display_width(marker.chars());

    if block.kind == BlockKind::PageBreak {
        spans.push(Span::styled(
            "──────── page break ────────".to_string(),
            content_style,
        ));
    } else {
        if !marker.is_empty() {
            spans.push(Span::styled(marker.to_string(), theme.annotation_style()));
        }
        spans.push(Span::styled(block.content.clone(), content_style));
    }

    (Line::from(spans), prefix_width)
}
