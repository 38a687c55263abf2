use crate::{
    decoder::{Key, decode_chunk},
    model::{Outcome, SelectItem, SelectList, SelectMode},
    render,
    theme::Theme,
};
use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    terminal,
};
use std::io::{self, Read, Write};

/// Scoped acquisition of raw terminal mode.
///
/// Raw mode is held for exactly one selection session and released on every
/// exit path — confirm, cancel, interrupt, and unwind — by the Drop impl.
/// Never toggled anywhere else.
struct RawModeGuard {
    was_raw: bool,
}

impl RawModeGuard {
    fn acquire() -> Result<Self> {
        let was_raw = terminal::is_raw_mode_enabled().unwrap_or(false);
        if !was_raw {
            terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        }
        let _ = io::stdout().execute(Hide);
        Ok(Self { was_raw })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(Show);
        if !self.was_raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Run one interactive selection session over `items`.
///
/// Reads raw bytes from stdin, decodes them, feeds the model, and redraws
/// after every chunk until the session reaches a terminal state. EOF on
/// stdin counts as cancellation.
pub fn run_select(
    items: Vec<SelectItem>,
    mode: SelectMode,
    title: &str,
    theme: &Theme,
) -> Result<Outcome> {
    let mut list = SelectList::new(items, mode);
    let _guard = RawModeGuard::acquire()?;

    let mut stdout = io::stdout();
    let mut stdin = io::stdin();
    let mut buf = [0u8; 64];

    loop {
        let size = terminal::size().unwrap_or((80, 24));
        render::draw(&mut stdout, &list, title, theme, size)
            .context("failed to draw selection screen")?;

        let n = stdin.read(&mut buf).context("failed to read terminal input")?;
        if n == 0 {
            render::clear(&mut stdout)?;
            return Ok(Outcome::Cancelled);
        }

        for key in decode_chunk(&buf[..n]) {
            if key == Key::Unrecognized {
                // Noise, not an error; trace only.
                log::trace!("discarding unrecognized terminal input");
            }
            if let Some(outcome) = list.handle_key(key) {
                render::clear(&mut stdout)?;
                stdout.flush()?;
                return Ok(outcome);
            }
        }
    }
}
