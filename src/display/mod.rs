//! Terminal backend: all terminal I/O lives here.
//!
//! The 600 x 800 world is mapped onto a 75 x 50 grid of character cells
//! (8 x 16 px per cell). Draw calls paint an off-screen canvas; `present`
//! sends only the cells that changed since the previous frame.

pub mod glyphs;
pub mod input;

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::backend::{Graphics, Rect};
use crate::config::{CELL_HEIGHT, CELL_WIDTH, GAME_TITLE, TERMINAL_COLS, TERMINAL_ROWS};
use crate::error::StartupError;
use crate::sprite::{FrameId, SpriteFrames};

use glyphs::{Cell, GlyphFrame};

const C_TEXT: Color = Color::White;

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A full playfield of cells. Also serves as the frozen pause backdrop.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    cells: Vec<Cell>,
}

impl Canvas {
    pub const COLS: i32 = TERMINAL_COLS as i32;
    pub const ROWS: i32 = TERMINAL_ROWS as i32;

    pub fn blank() -> Self {
        Self {
            cells: vec![Cell::BLANK; (Self::COLS * Self::ROWS) as usize],
        }
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        if col < 0 || row < 0 || col >= Self::COLS || row >= Self::ROWS {
            return None;
        }
        Some(self.cells[(row * Self::COLS + col) as usize])
    }

    /// Write one cell; anything off the playfield is clipped.
    pub fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= Self::COLS || row >= Self::ROWS {
            return;
        }
        self.cells[(row * Self::COLS + col) as usize] = cell;
    }

    /// The characters of one row, for inspection.
    pub fn row_text(&self, row: i32) -> String {
        (0..Self::COLS)
            .filter_map(|col| self.get(col, row))
            .map(|cell| cell.ch)
            .collect()
    }
}

// ── Graphics backend ──────────────────────────────────────────────────────────

pub struct TerminalGraphics<W: Write> {
    out: W,
    frames: Vec<GlyphFrame>,
    canvas: Canvas,
    /// What is on the terminal right now; `None` forces a full redraw.
    shown: Option<Canvas>,
    /// Terminal cell of the playfield's top-left corner.
    origin: (u16, u16),
}

impl<W: Write> TerminalGraphics<W> {
    pub fn new(out: W, origin: (u16, u16)) -> Self {
        Self {
            out,
            frames: Vec::new(),
            canvas: Canvas::blank(),
            shown: None,
            origin,
        }
    }

    /// The frame being drawn.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

/// Pixel span `[start, start + len)` as a whole-cell span.
fn cells(start: i32, len: i32, cell: i32) -> (i32, i32) {
    (start.div_euclid(cell), (len + cell - 1).div_euclid(cell))
}

impl<W: Write> Graphics for TerminalGraphics<W> {
    type Backdrop = Canvas;

    const FRAME_EXTENSION: &'static str = "txt";

    fn load_visual_resource(&mut self, path: &Path) -> Result<SpriteFrames, StartupError> {
        let loaded = glyphs::load_frames(path)?;
        let (cols, rows) = loaded
            .first()
            .map(|f| (f.cols, f.rows))
            .ok_or_else(|| StartupError::MissingAsset {
                path: path.to_path_buf(),
            })?;

        let first = self.frames.len() as u32;
        let ids = (first..first + loaded.len() as u32).map(FrameId).collect();
        self.frames.extend(loaded);

        Ok(SpriteFrames::new(ids, cols * CELL_WIDTH, rows * CELL_HEIGHT))
    }

    fn render_region(&mut self, frame: FrameId, src: Rect, dest: Rect) {
        let Some(glyph) = self.frames.get(frame.0 as usize) else {
            return;
        };

        let (src_col, cols) = cells(src.x, src.w, CELL_WIDTH);
        let (src_row, rows) = cells(src.y, src.h, CELL_HEIGHT);
        let dest_col = dest.x.div_euclid(CELL_WIDTH);
        let dest_row = dest.y.div_euclid(CELL_HEIGHT);

        for row in 0..rows {
            for col in 0..cols {
                if let Some(cell) = glyph.at(src_col + col, src_row + row) {
                    self.canvas.put(dest_col + col, dest_row + row, cell);
                }
            }
        }
    }

    fn render_text(&mut self, text: &str, x: i32, y: i32) {
        let col = x.div_euclid(CELL_WIDTH);
        let row = y.div_euclid(CELL_HEIGHT);
        for (i, ch) in text.chars().enumerate() {
            self.canvas.put(col + i as i32, row, Cell::new(ch, C_TEXT));
        }
    }

    fn text_size(&self, text: &str) -> (i32, i32) {
        (text.chars().count() as i32 * CELL_WIDTH, CELL_HEIGHT)
    }

    fn present(&mut self) -> io::Result<()> {
        let (ox, oy) = self.origin;
        let mut fg: Option<Color> = None;
        let mut next: Option<(i32, i32)> = None;

        for row in 0..Canvas::ROWS {
            for col in 0..Canvas::COLS {
                let cell = self.canvas.cells[(row * Canvas::COLS + col) as usize];
                let unchanged = self
                    .shown
                    .as_ref()
                    .and_then(|shown| shown.get(col, row))
                    .is_some_and(|old| old == cell);
                if unchanged {
                    continue;
                }

                if next != Some((col, row)) {
                    self.out
                        .queue(cursor::MoveTo(ox + col as u16, oy + row as u16))?;
                }
                if fg != Some(cell.fg) {
                    self.out.queue(style::SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                self.out.queue(Print(cell.ch))?;
                next = Some((col + 1, row));
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()?;

        self.shown = Some(std::mem::replace(&mut self.canvas, Canvas::blank()));
        Ok(())
    }

    fn capture_current_frame(&mut self) -> Canvas {
        self.shown.clone().unwrap_or_else(Canvas::blank)
    }

    fn render_backdrop(&mut self, backdrop: &Canvas) {
        self.canvas.clone_from(backdrop);
    }
}

// ── Terminal session ──────────────────────────────────────────────────────────

/// The playfield needs one cell per 8 x 16 px.
pub fn check_screen_size(cols: u16, rows: u16) -> Result<(), StartupError> {
    if cols < TERMINAL_COLS || rows < TERMINAL_ROWS {
        return Err(StartupError::ScreenTooSmall {
            need_cols: TERMINAL_COLS,
            need_rows: TERMINAL_ROWS,
            cols,
            rows,
        });
    }
    Ok(())
}

/// Centre the playfield on a `cols` x `rows` terminal.
pub fn playfield_origin(cols: u16, rows: u16) -> (u16, u16) {
    (
        cols.saturating_sub(TERMINAL_COLS) / 2,
        rows.saturating_sub(TERMINAL_ROWS) / 2,
    )
}

/// Raw mode plus alternate screen, undone by `restore`.
#[derive(Debug)]
pub struct TerminalSession {
    pub size: (u16, u16),
    pub keyboard_enhanced: bool,
}

impl TerminalSession {
    pub fn enter<W: Write>(out: &mut W) -> Result<Self, StartupError> {
        if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
            return Err(StartupError::DisplayUnavailable);
        }

        let size = terminal::size()?;
        check_screen_size(size.0, size.1)?;

        terminal::enable_raw_mode()?;
        let mut session = Self {
            size,
            keyboard_enhanced: false,
        };
        if let Err(err) = session.setup(out) {
            session.restore(out);
            return Err(err.into());
        }

        log::info!(
            "terminal {}x{} (key release events: {})",
            size.0,
            size.1,
            session.keyboard_enhanced
        );
        Ok(session)
    }

    fn setup<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(terminal::SetTitle(GAME_TITLE))?;
        out.execute(cursor::Hide)?;
        out.execute(terminal::Clear(terminal::ClearType::All))?;

        // Release events let held keys end exactly; other terminals fall
        // back to hold windows in the input reader.
        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            self.keyboard_enhanced = out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        }
        Ok(())
    }

    /// Always restore the terminal, ignoring errors on the way out.
    pub fn restore<W: Write>(&self, out: &mut W) {
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(style::ResetColor);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
