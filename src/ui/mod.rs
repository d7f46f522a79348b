mod event;
mod help;
mod layout;
mod prompt;
mod renderer;
mod surface;
mod theme;

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self as crossterm_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    app::{App, Damage},
    config::Config,
    core::{
        ColumnId, CommandExecutor, CommandRequest, Entry, EntryKind, Filesystem,
        open_with_command, run_command,
    },
    error::AppResult,
};

use event::{Action, Input, is_key_press, translate};
use layout::ScreenLayout;
use prompt::{LineEditor, PromptStep, is_confirmation};
use renderer::Renderer;
use surface::{BufferSurface, Surface};
use theme::Palette;

const RETURN_PROMPT: &str = "[press any key to return]";

pub fn run(
    mut app: App,
    config: &Config,
    fs: &dyn Filesystem,
    executor: &dyn CommandExecutor,
) -> AppResult<()> {
    let mut guard = TerminalGuard::new()?;
    let size = guard.terminal_mut().size()?;
    let mut ui = Ui {
        screen: Screen::new(config, size.width, size.height),
        guard,
        config,
        fs,
        executor,
    };
    let mut damage = ui.screen.resize(&mut app, fs, size.width, size.height);
    tracing::info!("browsing {}", app.current_dir.display());

    loop {
        if app.status.take_dirty() {
            damage.push(Damage::Status);
        }
        if !damage.is_empty() {
            ui.present(&app, &damage)?;
        }
        let Some(input) = translate(crossterm_event::read()?) else {
            damage = Vec::new();
            continue;
        };
        app.status.clear();
        damage = match input {
            Input::Action(Action::Quit) => break,
            Input::Action(action) => ui.dispatch(&mut app, action)?,
            Input::Click { x, y } => app.click(x, y, fs),
            Input::Scroll { x, y, steps } => match column_at(&app, x, y) {
                Some(column) => app.scroll(column, steps, fs),
                None => Vec::new(),
            },
            Input::Resize { width, height } => ui.screen.resize(&mut app, fs, width, height),
        };
    }

    tracing::info!("quitting");
    Ok(())
}

fn column_at(app: &App, x: u16, y: u16) -> Option<ColumnId> {
    ColumnId::all()
        .into_iter()
        .find(|id| app.column(*id).geometry().contains(x, y))
}

/// Persistent off-screen surface plus the renderer that keeps it current.
struct Screen {
    surface: BufferSurface,
    renderer: Renderer,
}

impl Screen {
    fn new(config: &Config, width: u16, height: u16) -> Self {
        Self {
            surface: BufferSurface::new(width, height),
            renderer: Renderer::new(
                Palette::new(config.theme.theme()),
                config.script_extension.clone(),
            ),
        }
    }

    fn resize(&mut self, app: &mut App, fs: &dyn Filesystem, width: u16, height: u16) -> Vec<Damage> {
        let layout = ScreenLayout::compute(width, height);
        tracing::debug!(width, height, fits = layout.is_some(), "resize");
        self.renderer.set_layout(layout);
        self.surface.resize(width, height);
        match layout {
            Some(layout) => app.resize(layout.columns, fs),
            None => vec![Damage::Frame],
        }
    }
}

struct Ui<'a> {
    guard: TerminalGuard,
    screen: Screen,
    config: &'a Config,
    fs: &'a dyn Filesystem,
    executor: &'a dyn CommandExecutor,
}

impl Ui<'_> {
    fn present(&mut self, app: &App, damage: &[Damage]) -> AppResult<()> {
        self.screen
            .renderer
            .render(&mut self.screen.surface, app, damage);
        self.flush()
    }

    fn flush(&mut self) -> AppResult<()> {
        let surface = &self.screen.surface;
        self.guard
            .terminal_mut()
            .draw(|frame| surface.blit(frame.buffer_mut()))?;
        Ok(())
    }

    fn dispatch(&mut self, app: &mut App, action: Action) -> AppResult<Vec<Damage>> {
        let fs = self.fs;
        let executor = self.executor;
        let damage = match action {
            Action::CursorUp => app.move_cursor(-1, fs),
            Action::CursorDown => app.move_cursor(1, fs),
            Action::Parent => app.exit_to_parent(fs),
            Action::EnterDir => app.enter_selected(fs),
            Action::Open => match app.selected_entry().map(Entry::is_dir) {
                Some(true) => app.enter_selected(fs),
                Some(false) => self.edit_selected(app)?,
                None => Vec::new(),
            },
            Action::Top => app.move_cursor_to(1, fs),
            Action::Bottom => app.move_to_last(fs),
            Action::PageUp => app.move_page(-1, fs),
            Action::PageDown => app.move_page(1, fs),
            Action::Delete => {
                let Some(name) = app.selected_entry().map(|entry| entry.name().to_string()) else {
                    return Ok(Vec::new());
                };
                if self.confirm(app, &format!("delete {name}? (y/n) "))? {
                    with_status(app.delete_selected(fs, executor))
                } else {
                    vec![Damage::Status]
                }
            }
            Action::Create => match self.prompt(app, "new: ", "")? {
                Some(input) => with_status(app.create_entry(&input, fs, executor)),
                None => vec![Damage::Status],
            },
            Action::Rename => {
                let Some(current) = app
                    .selected_entry()
                    .map(|entry| entry.file_name().to_string())
                else {
                    return Ok(Vec::new());
                };
                match self.prompt(app, "rename: ", &current)? {
                    Some(input) => with_status(app.rename_selected(&input, fs, executor)),
                    None => vec![Damage::Status],
                }
            }
            Action::Yank => app.yank_selected(),
            Action::Paste => app.paste(fs, executor),
            Action::Edit => self.edit_selected(app)?,
            Action::Run => self.run_selected(app)?,
            Action::Home => match dirs::home_dir() {
                Some(home) => app.jump_to(&home, fs),
                None => {
                    app.status.warn("home directory unknown");
                    Vec::new()
                }
            },
            Action::Find => match self.prompt(app, "/", "")? {
                Some(query) => with_status(app.fuzzy_goto(&query, fs)),
                None => vec![Damage::Status],
            },
            Action::Shell => match self.prompt(app, "!", "")? {
                Some(command) if !command.trim().is_empty() => {
                    let request = CommandRequest::attached(&app.current_dir, command);
                    self.run_attached(app, &request, true)?;
                    let mut damage = app.refresh(fs);
                    damage.push(Damage::Frame);
                    damage
                }
                _ => vec![Damage::Status],
            },
            Action::Reload => app.refresh(fs),
            Action::Help => {
                self.show_help()?;
                Vec::new()
            }
            Action::Quit => Vec::new(),
        };
        Ok(damage)
    }

    fn edit_selected(&mut self, app: &mut App) -> AppResult<Vec<Damage>> {
        let Some(path) = app
            .selected_entry()
            .filter(|entry| !entry.is_dir())
            .and_then(|_| app.selected_path())
        else {
            return Ok(Vec::new());
        };
        let command = open_with_command(&self.config.editor_command(), &path);
        let request = CommandRequest::attached(&app.current_dir, command);
        self.run_attached(app, &request, false)?;
        let mut damage = app.reload_preview(self.fs);
        damage.push(Damage::Frame);
        Ok(damage)
    }

    /// Scripts go through the configured runner; other files are executed
    /// directly. An empty argument line runs without arguments.
    fn run_selected(&mut self, app: &mut App) -> AppResult<Vec<Damage>> {
        let Some(entry) = app.selected_entry().filter(|entry| !entry.is_dir()).cloned() else {
            return Ok(Vec::new());
        };
        let Some(path) = app.selected_path() else {
            return Ok(Vec::new());
        };
        let Some(args) = self.prompt(app, &format!("run {} with: ", entry.name()), "")? else {
            return Ok(vec![Damage::Status]);
        };
        let runner = match entry.kind(&self.config.script_extension) {
            EntryKind::ScriptFile => Some(self.config.script_runner.as_str()),
            _ => None,
        };
        let request = CommandRequest::attached(&app.current_dir, run_command(runner, &path, &args));
        self.run_attached(app, &request, true)?;
        let mut damage = app.refresh(self.fs);
        damage.push(Damage::Frame);
        Ok(damage)
    }

    /// Hands the terminal to a child process and takes it back afterwards.
    fn run_attached(&mut self, app: &mut App, request: &CommandRequest, pause: bool) -> AppResult<()> {
        tracing::info!(command = %request.command, "running attached");
        self.guard.suspend()?;
        let result = self.executor.execute(request);
        if pause {
            enable_raw_mode()?;
            let mut stdout = io::stdout();
            write!(stdout, "\r\n{RETURN_PROMPT}")?;
            stdout.flush()?;
            wait_for_key()?;
        }
        self.guard.resume()?;
        if let Err(error) = result {
            tracing::warn!("{} failed: {error}", request.command);
            app.status.error(error.to_string());
        }
        Ok(())
    }

    fn prompt(&mut self, app: &mut App, label: &str, initial: &str) -> AppResult<Option<String>> {
        let mut editor = LineEditor::new(initial);
        loop {
            self.screen
                .renderer
                .draw_prompt(&mut self.screen.surface, label, &editor);
            self.flush()?;
            match crossterm_event::read()? {
                Event::Key(key) => match editor.apply(key) {
                    PromptStep::Pending => {}
                    PromptStep::Submitted => return Ok(Some(editor.into_text())),
                    PromptStep::Cancelled => return Ok(None),
                },
                Event::Resize(width, height) => {
                    let damage = self.screen.resize(app, self.fs, width, height);
                    self.present(app, &damage)?;
                }
                _ => {}
            }
        }
    }

    fn confirm(&mut self, app: &mut App, question: &str) -> AppResult<bool> {
        let editor = LineEditor::default();
        loop {
            self.screen
                .renderer
                .draw_prompt(&mut self.screen.surface, question, &editor);
            self.flush()?;
            match crossterm_event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(is_confirmation(key));
                }
                Event::Resize(width, height) => {
                    let damage = self.screen.resize(app, self.fs, width, height);
                    self.present(app, &damage)?;
                }
                _ => {}
            }
        }
    }

    fn show_help(&mut self) -> AppResult<()> {
        self.screen.surface.stash();
        self.screen.renderer.draw_help(&mut self.screen.surface);
        self.flush()?;
        wait_for_key()?;
        self.screen.surface.swap_buffers();
        self.flush()
    }
}

fn with_status(mut damage: Vec<Damage>) -> Vec<Damage> {
    damage.push(Damage::Status);
    damage
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if is_key_press(&crossterm_event::read()?) {
            return Ok(());
        }
    }
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> AppResult<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = disable_raw_mode();
            return Err(error.into());
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error.into())
            }
        }
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    fn suspend(&mut self) -> io::Result<()> {
        restore_terminal()
    }

    /// Re-enters the alternate screen. The terminal is cleared so the next
    /// draw sends every cell again.
    fn resume(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide
        )?;
        self.terminal.clear()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, Show)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryFs;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use std::path::Path;

    fn buffer_line(buffer: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn screen_flushes_through_terminal() {
        let fs = MemoryFs::new()
            .with_dir("/", &["home/"])
            .with_dir("/home", &["a.txt", "notes/"])
            .with_dir("/home/notes", &[]);
        let mut app = App::load(Path::new("/home"), &fs, 1).unwrap();
        let mut screen = Screen::new(&Config::default(), 40, 8);
        let damage = screen.resize(&mut app, &fs, 40, 8);
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();

        screen
            .renderer
            .render(&mut screen.surface, &app, &damage);
        let surface = &screen.surface;
        terminal
            .draw(|frame| surface.blit(frame.buffer_mut()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(buffer_line(buffer, 0, 40).contains("/home | a.txt"));
        assert!(buffer_line(buffer, 2, 40).contains("a.txt"));
        assert!(buffer_line(buffer, 3, 40).contains("notes/"));
    }

    #[test]
    fn tiny_screen_skips_layout() {
        let fs = MemoryFs::new()
            .with_dir("/", &["home/"])
            .with_dir("/home", &["a.txt"]);
        let mut app = App::load(Path::new("/home"), &fs, 1).unwrap();
        let mut screen = Screen::new(&Config::default(), 10, 3);

        let damage = screen.resize(&mut app, &fs, 10, 3);

        assert_eq!(damage, vec![Damage::Frame]);
        assert_eq!(app.mid.height(), 0);
    }

    #[test]
    fn column_at_finds_column_under_pointer() {
        let fs = MemoryFs::new()
            .with_dir("/", &["home/"])
            .with_dir("/home", &["a.txt"]);
        let mut app = App::load(Path::new("/home"), &fs, 1).unwrap();
        let layout = ScreenLayout::compute(101, 20).unwrap();
        app.resize(layout.columns, &fs);

        assert_eq!(column_at(&app, 5, 5), Some(ColumnId::Left));
        assert_eq!(column_at(&app, 30, 5), Some(ColumnId::Mid));
        assert_eq!(column_at(&app, 70, 5), Some(ColumnId::Right));
        assert_eq!(column_at(&app, 20, 5), None);
        assert_eq!(column_at(&app, 30, 0), None);
    }
}
