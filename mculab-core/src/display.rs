//! Character display abstraction
//!
//! Implemented by the HD44780 driver; exercises only need cursor placement
//! and text output.

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Row or column outside the display
    InvalidPosition,
}

/// Text-only character display
pub trait CharacterDisplay {
    /// Clear the display and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor, 0-based row and column
    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write text at the cursor
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// (columns, rows)
    fn dimensions(&self) -> (u8, u8) {
        (16, 2)
    }

    /// Replace a whole row: text is clipped to the width and the rest of
    /// the row is blanked.
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let (cols, rows) = self.dimensions();
        if row >= rows {
            return Err(DisplayError::InvalidPosition);
        }
        self.set_cursor(row, 0)?;

        let mut written = 0u8;
        for (i, c) in text.char_indices().take(cols as usize) {
            self.write_str(&text[i..i + c.len_utf8()])?;
            written += 1;
        }
        while written < cols {
            self.write_str(" ")?;
            written += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDisplay {
        rows: [[u8; 16]; 2],
        row: usize,
        col: usize,
        clears: u32,
    }

    impl MockDisplay {
        fn new() -> Self {
            Self {
                rows: [[b'?'; 16]; 2],
                row: 0,
                col: 0,
                clears: 0,
            }
        }

        fn row_text(&self, row: usize) -> &str {
            core::str::from_utf8(&self.rows[row]).unwrap()
        }
    }

    impl CharacterDisplay for MockDisplay {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.rows = [[b' '; 16]; 2];
            self.clears += 1;
            self.set_cursor(0, 0)
        }

        fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
            if row >= 2 || col >= 16 {
                return Err(DisplayError::InvalidPosition);
            }
            self.row = row as usize;
            self.col = col as usize;
            Ok(())
        }

        fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
            for b in text.bytes() {
                if self.col < 16 {
                    self.rows[self.row][self.col] = b;
                }
                self.col += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_line_pads() {
        let mut d = MockDisplay::new();
        d.write_line(0, "MMCOE").unwrap();
        assert_eq!(d.row_text(0), "MMCOE           ");
    }

    #[test]
    fn test_write_line_truncates() {
        let mut d = MockDisplay::new();
        d.write_line(1, "Digital:  512    ").unwrap();
        assert_eq!(d.row_text(1), "Digital:  512   ");
    }

    #[test]
    fn test_write_line_rejects_bad_row() {
        let mut d = MockDisplay::new();
        assert_eq!(d.write_line(2, "x"), Err(DisplayError::InvalidPosition));
    }

    #[test]
    fn test_clear() {
        let mut d = MockDisplay::new();
        d.clear().unwrap();
        assert_eq!(d.clears, 1);
        assert_eq!(d.row_text(0), "                ");
    }
}
