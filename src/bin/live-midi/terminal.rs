//! Stdout wrapper for raw mode.
//!
//! Raw mode turns off the terminal's newline translation, so a bare `\n`
//! only moves the cursor down. Writing `\r\n` works in both modes.

use std::io::{self, Write};

pub struct CrlfWriter<W: Write> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if byte == b'\n' {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_crlf() {
        let mut out = CrlfWriter::new(Vec::new());
        write!(out, "\nExiting...\n").unwrap();
        assert_eq!(out.inner, b"\r\nExiting...\r\n");
    }

    #[test]
    fn text_without_newline_passes_through() {
        let mut out = CrlfWriter::new(Vec::new());
        write!(out, "Enter the port number: ").unwrap();
        assert_eq!(out.inner, b"Enter the port number: ");
    }
}
