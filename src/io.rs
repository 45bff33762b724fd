//! Input sources and output sinks the engine talks to.
//!
//! The engine never touches stdin/stdout directly. `,` pulls one character
//! from an [`InputSource`] and `.` pushes one character into an
//! [`OutputSink`]. Adapters for the standard streams live here, along with
//! in-memory implementations that make runs deterministic.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};

/// Something `,` can read a character from.
pub trait InputSource {
    /// Read the next character. `Ok(None)` means the source is exhausted.
    fn read_char(&mut self) -> io::Result<Option<u8>>;
}

/// Something `.` can write a character to.
pub trait OutputSink {
    /// Write one character. Implementations must make it visible right away;
    /// output written before a failure must not be lost.
    fn write_char(&mut self, byte: u8) -> io::Result<()>;
}

/// Reads raw bytes, one per `,`. End of stream is exhaustion.
pub struct ByteInput<R: Read> {
    reader: R,
}

impl<R: Read> ByteInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> InputSource for ByteInput<R> {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Interactive, line-oriented input.
///
/// Every `,` writes a `> ` prompt on a fresh line, reads a whole line and
/// keeps only its first character. An empty line or end of stream counts as
/// exhaustion, so the user cannot silently feed a zero byte.
pub struct LineInput<R: BufRead, W: Write> {
    reader: R,
    prompt: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        Self { reader, prompt }
    }
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        write!(self.prompt, "\n> ")?;
        self.prompt.flush()?;

        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        // Cells are one byte wide; a multi-byte character contributes its lead byte.
        Ok(line.first().copied().filter(|b| !matches!(b, b'\n' | b'\r')))
    }
}

impl InputSource for VecDeque<u8> {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

/// Writes each character straight through and flushes it.
pub struct FlushingOutput<W: Write> {
    writer: W,
}

impl<W: Write> FlushingOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputSink for FlushingOutput<W> {
    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])?;
        self.writer.flush()
    }
}

impl OutputSink for Vec<u8> {
    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn byte_input_reads_one_byte_at_a_time() {
        let mut input = ByteInput::new(Cursor::new(b"ab".to_vec()));
        assert_eq!(input.read_char().unwrap(), Some(b'a'));
        assert_eq!(input.read_char().unwrap(), Some(b'b'));
        assert_eq!(input.read_char().unwrap(), None);
    }

    #[test]
    fn line_input_keeps_first_character_and_prompts() {
        let mut prompt = Vec::new();
        {
            let mut input = LineInput::new(Cursor::new(b"hello\nz\n".to_vec()), &mut prompt);
            assert_eq!(input.read_char().unwrap(), Some(b'h'));
            assert_eq!(input.read_char().unwrap(), Some(b'z'));
            assert_eq!(input.read_char().unwrap(), None);
        }
        assert_eq!(prompt, b"\n> \n> \n> ");
    }

    #[test]
    fn line_input_treats_empty_line_as_exhausted() {
        let mut input = LineInput::new(Cursor::new(b"\nx\n".to_vec()), io::sink());
        assert_eq!(input.read_char().unwrap(), None);
    }

    #[test]
    fn line_input_stores_lead_byte_of_multibyte_character() {
        let mut input = LineInput::new(Cursor::new("é\n".as_bytes().to_vec()), io::sink());
        assert_eq!(input.read_char().unwrap(), Some(0xc3));
    }

    #[test]
    fn line_input_accepts_non_utf8_bytes() {
        let mut input = LineInput::new(Cursor::new(b"\xe9t\xe9\n".to_vec()), io::sink());
        assert_eq!(input.read_char().unwrap(), Some(0xe9));
    }

    #[test]
    fn line_input_handles_crlf() {
        let mut input = LineInput::new(Cursor::new(b"\r\n".to_vec()), io::sink());
        assert_eq!(input.read_char().unwrap(), None);
    }

    #[test]
    fn flushing_output_passes_bytes_through() {
        let mut buf = Vec::new();
        {
            let mut out = FlushingOutput::new(&mut buf);
            out.write_char(b'h').unwrap();
            out.write_char(b'i').unwrap();
        }
        assert_eq!(buf, b"hi");
    }
}
