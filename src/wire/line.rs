//! Ad hoc single-line messages.

use std::fmt;

use thiserror::Error;

use super::Kind;
use crate::color::{Percentages, Rgb};

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 22;

/// Longest grid line for a single-digit effect id: every cell `255,255,255`.
pub const MAX_GRID_LINE_LEN: usize = max_grid_line_len();

const fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

const fn max_grid_line_len() -> usize {
    // "<effect>|" then cells separated by single spaces.
    let mut len = 2 + GRID_ROWS * GRID_COLS - 1;
    let mut row = 0;
    while row < GRID_ROWS {
        let mut col = 0;
        while col < GRID_COLS {
            len += digits(row) + 1 + digits(col) + ",255,255,255".len();
            col += 1;
        }
        row += 1;
    }
    len
}

/// A 6×22 keyboard grid of cell colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGrid {
    cells: [[Rgb; GRID_COLS]; GRID_ROWS],
}

impl Default for KeyGrid {
    fn default() -> Self {
        KeyGrid::filled(Rgb::default())
    }
}

impl KeyGrid {
    pub fn filled(rgb: Rgb) -> KeyGrid {
        KeyGrid {
            cells: [[rgb; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Build from a grid of COLORREFs as passed by the keyboard SDK.
    pub fn from_colorrefs(colors: &[[u32; GRID_COLS]; GRID_ROWS]) -> KeyGrid {
        let mut grid = KeyGrid::default();
        for (row, values) in colors.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                grid.cells[row][col] = Rgb::from_colorref(*value);
            }
        }
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    /// Returns false if the cell is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, rgb: Rgb) -> bool {
        match self.cells.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            Some(cell) => {
                *cell = rgb;
                true
            }
            None => false,
        }
    }

    /// Every cell as `(row, col, colour)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Rgb)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, rgb)| (row, col, *rgb))
        })
    }
}

/// The three line framings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMessage {
    /// `<mode> <hex modifier> <r%> <g%> <b%>`
    Broadcast {
        mode: u32,
        modifier: u32,
        color: Percentages,
    },
    /// `<mode> <key id> <r%> <g%> <b%>`
    Key {
        mode: u32,
        key: u32,
        color: Percentages,
    },
    /// `<effect id>|<row>,<col>,<r>,<g>,<b> ...`
    Grid { effect: u32, grid: Box<KeyGrid> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("percentage {0} above 100")]
    PercentOutOfRange(u32),
    #[error("missing effect separator")]
    MissingSeparator,
    #[error("cell {row},{col} outside the grid")]
    CellOutOfRange { row: usize, col: usize },
    #[error("grid has {0} cells")]
    IncompleteGrid(usize),
    #[error("documents are not lines")]
    NotALine,
}

pub type LineResult<T> = Result<T, LineError>;

impl fmt::Display for LineMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineMessage::Broadcast {
                mode,
                modifier,
                color,
            } => write!(
                f,
                "{} {:X} {} {} {}",
                mode, modifier, color.red, color.green, color.blue
            ),
            LineMessage::Key { mode, key, color } => write!(
                f,
                "{} {} {} {} {}",
                mode, key, color.red, color.green, color.blue
            ),
            LineMessage::Grid { effect, grid } => {
                write!(f, "{}|", effect)?;
                for (i, (row, col, rgb)) in grid.cells().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{},{},{},{},{}", row, col, rgb.red, rgb.green, rgb.blue)?;
                }
                Ok(())
            }
        }
    }
}

impl LineMessage {
    /// Parse a line whose framing is already known from the envelope.
    pub fn parse(kind: Kind, text: &str) -> LineResult<LineMessage> {
        match kind {
            Kind::Broadcast => {
                let [mode, modifier, r, g, b] = fields::<5>(text, ' ')?;
                Ok(LineMessage::Broadcast {
                    mode: number(mode, 10)?,
                    modifier: number(modifier, 16)?,
                    color: percentages(r, g, b)?,
                })
            }
            Kind::Key => {
                let [mode, key, r, g, b] = fields::<5>(text, ' ')?;
                Ok(LineMessage::Key {
                    mode: number(mode, 10)?,
                    key: number(key, 10)?,
                    color: percentages(r, g, b)?,
                })
            }
            Kind::Grid => parse_grid(text),
            Kind::Document => Err(LineError::NotALine),
        }
    }
}

fn parse_grid(text: &str) -> LineResult<LineMessage> {
    let (effect, cells) = text.split_once('|').ok_or(LineError::MissingSeparator)?;
    let mut grid = KeyGrid::default();
    let mut count = 0;
    for cell in cells.split(' ').filter(|cell| !cell.is_empty()) {
        let [row, col, r, g, b] = fields::<5>(cell, ',')?;
        let (row, col) = (number(row, 10)? as usize, number(col, 10)? as usize);
        let rgb = Rgb::new(byte(r)?, byte(g)?, byte(b)?);
        if !grid.set(row, col, rgb) {
            return Err(LineError::CellOutOfRange { row, col });
        }
        count += 1;
    }
    if count != GRID_ROWS * GRID_COLS {
        return Err(LineError::IncompleteGrid(count));
    }
    Ok(LineMessage::Grid {
        effect: number(effect, 10)?,
        grid: Box::new(grid),
    })
}

fn fields<const N: usize>(text: &str, sep: char) -> LineResult<[&str; N]> {
    let parts: Vec<&str> = text.split(sep).collect();
    let actual = parts.len();
    parts.try_into().map_err(|_| LineError::FieldCount {
        expected: N,
        actual,
    })
}

fn number(text: &str, radix: u32) -> LineResult<u32> {
    u32::from_str_radix(text, radix).map_err(|_| LineError::InvalidNumber(text.to_owned()))
}

fn byte(text: &str) -> LineResult<u8> {
    text.parse().map_err(|_| LineError::InvalidNumber(text.to_owned()))
}

fn percentages(r: &str, g: &str, b: &str) -> LineResult<Percentages> {
    let mut pct = [0u8; 3];
    for (slot, text) in pct.iter_mut().zip([r, g, b]) {
        let value = number(text, 10)?;
        if value > 100 {
            return Err(LineError::PercentOutOfRange(value));
        }
        *slot = value as u8;
    }
    Ok(Percentages {
        red: pct[0],
        green: pct[1],
        blue: pct[2],
    })
}
