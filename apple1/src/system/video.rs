//! Apple 1 terminal display.
//!
//! A 40x24 uppercase character terminal. It only moves forward: characters
//! are written at the cursor, Return starts a new line, and writing past the
//! bottom row scrolls everything up by one line.
//!
//! The buffer is a fixed row arena mutated in place. Every visible change
//! bumps `version`, so a host can poll cheaply and redraw only when the
//! number moves.

use serde::{Deserialize, Serialize};

/// Characters per row.
pub const COLUMNS: usize = 40;

/// Rows on screen.
pub const ROWS: usize = 24;

const CR: u8 = 0x0D;
const BACKSPACE: u8 = 0x08;
const RUBOUT: u8 = 0x5F;
const BLANK: u8 = b' ';

/// Serializable screen contents and cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoState {
    /// One string per row, each exactly [`COLUMNS`] characters.
    pub rows: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    #[serde(default)]
    pub version: u64,
}

/// Character terminal fed by the PIA port B strobe.
#[derive(Debug, Clone)]
pub struct Video {
    rows: Vec<[u8; COLUMNS]>,
    cursor_row: usize,
    cursor_col: usize,
    crt_bs_support: bool,
    version: u64,
}

impl Video {
    /// Creates a blank screen.
    pub fn new(crt_bs_support: bool) -> Self {
        Self {
            rows: vec![[BLANK; COLUMNS]; ROWS],
            cursor_row: 0,
            cursor_col: 0,
            crt_bs_support,
            version: 0,
        }
    }

    /// Enables erasing on `_`/BS. With it off, `_` prints like any other
    /// character and BS is ignored, as on the original terminal.
    pub fn set_crt_bs_support(&mut self, enabled: bool) {
        self.crt_bs_support = enabled;
    }

    pub fn crt_bs_support(&self) -> bool {
        self.crt_bs_support
    }

    /// Consumes one character from the display port (bit 7 already
    /// stripped). Returns `true` if the screen changed.
    pub fn write(&mut self, ch: u8) -> bool {
        let changed = match ch {
            CR => {
                self.new_line();
                true
            }
            RUBOUT | BACKSPACE if self.crt_bs_support => self.erase_previous(),
            0x20..=0x5F => {
                self.put(ch);
                true
            }
            // Lowercase folded to the uppercase character set
            0x60..=0x7E => {
                self.put(ch - 0x20);
                true
            }
            _ => false,
        };
        if changed {
            self.version += 1;
        }
        changed
    }

    fn put(&mut self, ch: u8) {
        self.rows[self.cursor_row][self.cursor_col] = ch;
        self.cursor_col += 1;
        if self.cursor_col == COLUMNS {
            self.new_line();
        }
    }

    fn new_line(&mut self) {
        self.cursor_col = 0;
        if self.cursor_row + 1 < ROWS {
            self.cursor_row += 1;
        } else {
            self.rows.rotate_left(1);
            self.rows[ROWS - 1] = [BLANK; COLUMNS];
        }
    }

    fn erase_previous(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = COLUMNS - 1;
        } else {
            return false;
        }
        self.rows[self.cursor_row][self.cursor_col] = BLANK;
        true
    }

    /// Blanks the screen and homes the cursor.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            *row = [BLANK; COLUMNS];
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.version += 1;
    }

    /// Change counter. Increases on every visible change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Text of row `index`, or `None` past the bottom.
    pub fn row_text(&self, index: usize) -> Option<String> {
        self.rows.get(index).map(|row| row_to_string(row))
    }

    /// Whole screen, rows separated by newlines, trailing blanks trimmed.
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row_to_string(row).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn snapshot(&self) -> VideoState {
        VideoState {
            rows: self.rows.iter().map(|row| row_to_string(row)).collect(),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
            version: self.version,
        }
    }

    /// Restores screen contents. Short or missing rows are blank-padded and
    /// an out-of-range cursor is clamped onto the screen.
    pub fn restore(&mut self, state: &VideoState) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            *row = [BLANK; COLUMNS];
            if let Some(text) = state.rows.get(index) {
                for (cell, ch) in row.iter_mut().zip(text.chars()) {
                    *cell = if ch.is_ascii() && !ch.is_ascii_control() {
                        ch as u8
                    } else {
                        BLANK
                    };
                }
            }
        }
        self.cursor_row = state.cursor_row.min(ROWS - 1);
        self.cursor_col = state.cursor_col.min(COLUMNS - 1);
        // Always move forward so pollers notice the restore
        self.version = self.version.max(state.version) + 1;
    }
}

fn row_to_string(row: &[u8; COLUMNS]) -> String {
    row.iter().map(|&b| b as char).collect()
}
