//! Text-file sprite frames.
//!
//! A frame is a plain text file; each character is one terminal cell and
//! a space is transparent. The resource `name.txt` is stored on disk as
//! `name00.txt`, `name01.txt`, ... in the same directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::style::Color;

use crate::error::StartupError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
    };

    pub fn new(ch: char, fg: Color) -> Self {
        Self { ch, fg }
    }
}

/// One loaded frame, `cols` x `rows` cells.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphFrame {
    pub cols: i32,
    pub rows: i32,
    cells: Vec<Option<Cell>>,
}

impl GlyphFrame {
    /// `None` for transparent cells and anything outside the frame.
    pub fn at(&self, col: i32, row: i32) -> Option<Cell> {
        if col < 0 || row < 0 || col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[(row * self.cols + col) as usize]
    }
}

/// Colour given to every glyph of a resource.
pub fn palette(stem: &str) -> Color {
    match stem {
        "purple" | "missile" => Color::Magenta,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "cyan" | "playmis" => Color::Cyan,
        "bigblue" | "missiles" => Color::Blue,
        "explosion" => Color::Red,
        "line" => Color::DarkBlue,
        "background" => Color::DarkGrey,
        "asteroid" | "ul" | "ur" | "ll" | "lr" => Color::DarkYellow,
        _ => Color::White,
    }
}

pub fn parse_frame(text: &str, fg: Color) -> GlyphFrame {
    let lines: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();

    let cols = lines.iter().map(Vec::len).max().unwrap_or(0);
    let rows = lines.len();

    let mut cells = vec![None; cols * rows];
    for (row, line) in lines.iter().enumerate() {
        for (col, &ch) in line.iter().enumerate() {
            if ch != ' ' {
                cells[row * cols + col] = Some(Cell::new(ch, fg));
            }
        }
    }

    GlyphFrame {
        cols: cols as i32,
        rows: rows as i32,
        cells,
    }
}

/// `dir/stem07.ext` for `base = dir/stem.ext` and `index = 7`.
pub fn frame_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}{:02}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}{:02}", stem, index),
    };
    base.with_file_name(name)
}

/// Read every numbered frame of `base`. Frame `00` must exist and must not
/// be empty; loading stops at the first missing number.
pub fn load_frames(base: &Path) -> Result<Vec<GlyphFrame>, StartupError> {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let fg = palette(&stem);

    let mut frames = Vec::new();
    for index in 0.. {
        let path = frame_path(base, index);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let frame = parse_frame(&text, fg);
                if index == 0 && (frame.cols == 0 || frame.rows == 0) {
                    return Err(StartupError::MissingAsset { path });
                }
                frames.push(frame);
            }
            Err(err) if index == 0 => {
                log::error!("cannot read {}: {}", path.display(), err);
                return Err(StartupError::MissingAsset { path });
            }
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    log::warn!("stopped at {}: {}", path.display(), err);
                }
                break;
            }
        }
    }

    Ok(frames)
}
