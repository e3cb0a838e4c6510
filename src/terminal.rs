// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::{Cell, Frame};

pub struct Terminal {
    stdout: Stdout,
    /// Size of the frame last flushed; a change forces a full repaint.
    shown: Option<(u16, u16)>,
    run: String,
}

fn leave(out: &mut Stdout) {
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(event::EnableMouseCapture)?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: None,
            run: String::with_capacity(256),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn set_colors(&mut self, cell: Cell, cur: &mut Option<(Option<Color>, Option<Color>)>) -> Result<()> {
        if *cur == Some((cell.fg, cell.bg)) {
            return Ok(());
        }
        self.stdout
            .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
        self.stdout
            .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
        *cur = Some((cell.fg, cell.bg));
        Ok(())
    }

    /// Flush `frame`: every cell after a resize, otherwise only the dirty
    /// cells, batched into same-colored horizontal runs.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let mut cur = None;
        let resized = self.shown != Some((frame.width, frame.height));
        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        if resized || frame.is_dirty_all() {
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let cell = frame.get(x, y).unwrap_or(Cell::BLANK);
                    self.set_colors(cell, &mut cur)?;
                    self.stdout.queue(Print(cell.glyph))?;
                }
            }
        } else {
            let mut dirty = frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let width = frame.width as usize;

            let mut i = 0;
            while i < dirty.len() {
                let first = dirty[i];
                let head = frame.cell_at_index(first);
                self.run.clear();
                self.run.push(head.glyph);

                let mut j = i + 1;
                while j < dirty.len() {
                    let idx = dirty[j];
                    let cell = frame.cell_at_index(idx);
                    let same_row = idx / width == first / width;
                    if idx != dirty[j - 1] + 1 || !same_row || (cell.fg, cell.bg) != (head.fg, head.bg) {
                        break;
                    }
                    self.run.push(cell.glyph);
                    j += 1;
                }

                let (x, y) = ((first % width) as u16, (first / width) as u16);
                self.stdout.queue(cursor::MoveTo(x, y))?;
                self.set_colors(head, &mut cur)?;
                self.stdout.queue(Print(self.run.as_str()))?;
                i = j;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.shown = Some((frame.width, frame.height));
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
