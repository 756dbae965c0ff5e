use crate::core::panel::TreePanel;
use crate::core::selection::variable_key;
use crate::tui::{truncate_to_width, TreeSelectorComponent};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;

const IDLE_POLL: Duration = Duration::from_millis(500);

struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut impl Write) -> Result<Self, String> {
        terminal::enable_raw_mode().map_err(|err| err.to_string())?;
        stdout
            .execute(EnterAlternateScreen)
            .map_err(|err| err.to_string())?;
        stdout.execute(Hide).map_err(|err| err.to_string())?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

/// Run the selector until the user exits. Returns the final
/// `var-<name>=<expression>` line.
pub fn run_interactive_mode(panel: TreePanel) -> Result<String, String> {
    let mut stdout = io::stdout();
    let (_, height) = terminal::size().map_err(|err| err.to_string())?;
    let mut selector = TreeSelectorComponent::new(panel, height.max(1) as usize);

    let cancelled = Rc::new(Cell::new(false));
    let cancel_flag = cancelled.clone();
    selector.on_cancel(move || cancel_flag.set(true));

    {
        let _guard = TerminalGuard::enter(&mut stdout)?;
        render(&selector, &mut stdout)?;
        loop {
            let timeout = selector
                .search_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL);
            let mut dirty = false;
            if event::poll(timeout).map_err(|err| err.to_string())? {
                match event::read().map_err(|err| err.to_string())? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if is_exit(&key) {
                            break;
                        }
                        if let Some(data) = key_event_to_input(&key) {
                            selector.handle_input(&data);
                            dirty = true;
                        }
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }
            if cancelled.get() {
                break;
            }
            if selector.tick(Instant::now()) {
                dirty = true;
            }
            if dirty {
                render(&selector, &mut stdout)?;
            }
        }
    }

    let panel = selector.panel();
    Ok(format!(
        "{}={}",
        variable_key(&panel.options().variable_name),
        panel.expression()
    ))
}

fn render(selector: &TreeSelectorComponent, stdout: &mut impl Write) -> Result<(), String> {
    let (width, height) = terminal::size().map_err(|err| err.to_string())?;
    let width = width.max(1) as usize;
    let height = height.max(1) as usize;

    let mut lines = selector.render(width);
    lines.truncate(height);

    stdout
        .execute(MoveTo(0, 0))
        .map_err(|err| err.to_string())?;
    stdout
        .execute(Clear(ClearType::All))
        .map_err(|err| err.to_string())?;
    for (index, line) in lines.iter().enumerate() {
        let truncated = truncate_to_width(line, width);
        if index + 1 == lines.len() {
            write!(stdout, "{truncated}").map_err(|err| err.to_string())?;
        } else {
            write!(stdout, "{truncated}\r\n").map_err(|err| err.to_string())?;
        }
    }
    stdout.flush().map_err(|err| err.to_string())?;
    Ok(())
}

fn is_exit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Translate a crossterm key into the raw sequence the selector parses.
fn key_event_to_input(key: &KeyEvent) -> Option<String> {
    let data = match key.code {
        KeyCode::Up => "\x1b[A".to_string(),
        KeyCode::Down => "\x1b[B".to_string(),
        KeyCode::Right => "\x1b[C".to_string(),
        KeyCode::Left => "\x1b[D".to_string(),
        KeyCode::PageUp => "\x1b[5~".to_string(),
        KeyCode::PageDown => "\x1b[6~".to_string(),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::Esc => "\x1b".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let lower = ch.to_ascii_lowercase();
            if !lower.is_ascii_lowercase() {
                return None;
            }
            char::from_u32(lower as u32 - 96)?.to_string()
        }
        KeyCode::Char(ch) => ch.to_string(),
        _ => return None,
    };
    Some(data)
}
