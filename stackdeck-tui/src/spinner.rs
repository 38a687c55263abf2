use crate::theme::Theme;
use crossterm::{
    QueueableCommand,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::{
    io::{self, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Run `work` on a background thread while animating a spinner on the
/// current line. Communicates liveness only — no input is accepted while the
/// work runs.
pub fn with_spinner<T: Send>(
    label: &str,
    theme: &Theme,
    work: impl FnOnce() -> T + Send,
) -> io::Result<T> {
    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        scope.spawn(move || {
            let _ = tx.send(work());
        });

        let mut stdout = io::stdout();
        let mut frame = 0usize;
        loop {
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print("\r"))?;
            stdout.queue(SetForegroundColor(theme.accent))?;
            stdout.queue(Print(SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]))?;
            stdout.queue(ResetColor)?;
            stdout.queue(Print(format!(" {label}")))?;
            stdout.flush()?;
            frame += 1;

            match rx.recv_timeout(FRAME_INTERVAL) {
                Ok(value) => {
                    stdout.queue(Clear(ClearType::CurrentLine))?;
                    stdout.queue(Print("\r"))?;
                    stdout.flush()?;
                    return Ok(value);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // The worker died without sending; scope propagates its
                    // panic once we return.
                    return Err(io::Error::other("background work terminated abnormally"));
                }
            }
        }
    })
}
