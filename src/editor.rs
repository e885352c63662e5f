//! Character-at-a-time line editor with command-name completion.
//!
//! The editor expects the terminal to already be in raw mode (see
//! [`crate::terminal::RawMode`]): it echoes every keystroke itself and emits `\r\n`
//! line breaks. Only appending at the end of the line and deleting the last
//! character are supported; cursor movement keys are swallowed.

use crate::completion::{Completer, Completion, CompletionState};
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::fmt;
use std::io::{self, Read, Write};

const INTERRUPT: char = '\u{3}';
const END_OF_TRANSMISSION: char = '\u{4}';
const BACKSPACE: char = '\u{8}';
const DELETE: char = '\u{7f}';
const ESCAPE: char = '\u{1b}';
const BELL: char = '\u{7}';

/// The prompt printed in front of the line being edited.
#[derive(Debug, Clone)]
pub struct Prompt {
    label: String,
    color: bool,
}

impl Prompt {
    pub fn new(label: impl Into<String>, color: bool) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.color {
            write!(f, "{}", self.label.as_str().bold().green())?;
        } else {
            f.write_str(&self.label)?;
        }
        f.write_str(" ➜ ")
    }
}

/// How a call to [`LineReader::read_line`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// Enter was pressed; the line as typed, without the line break.
    Line(String),
    /// Ctrl-C was pressed. The shell terminates.
    Interrupted,
    /// Input ended, or Ctrl-D was pressed on an empty line.
    Eof,
}

/// Line editor state: the line being composed and the Tab-press bookkeeping.
///
/// Both are scoped to one line and reset once it is submitted.
pub struct LineReader {
    prompt: Prompt,
    completer: Completer,
    buffer: String,
    completion: CompletionState,
}

impl LineReader {
    pub fn new(prompt: Prompt, completer: Completer) -> Self {
        Self {
            prompt,
            completer,
            buffer: String::new(),
            completion: CompletionState::default(),
        }
    }

    /// Replaces the completion source, e.g. after the working directory changed.
    pub fn set_completer(&mut self, completer: Completer) {
        self.completer = completer;
    }

    #[cfg(test)]
    fn buffer(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    fn completion_state(&self) -> &CompletionState {
        &self.completion
    }

    /// Prints the prompt and edits one line read from `input`, echoing to `output`.
    pub fn read_line<R: Read, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<ReadEvent> {
        queue!(output, Print('\r'), Print(&self.prompt))?;
        output.flush()?;

        let mut keys = InputBytes::new(input);
        loop {
            let Some(ch) = keys.next_char()? else {
                self.clear();
                return Ok(ReadEvent::Eof);
            };
            if ch == ESCAPE {
                keys.skip_escape_sequence()?;
                continue;
            }

            let event = self.handle_key(ch, output)?;
            output.flush()?;
            if let Some(event) = event {
                return Ok(event);
            }
        }
    }

    /// Applies one keystroke. Returns an event when the line is finished.
    pub fn handle_key<W: Write>(
        &mut self,
        ch: char,
        output: &mut W,
    ) -> io::Result<Option<ReadEvent>> {
        match ch {
            INTERRUPT => {
                queue!(output, Print("\r\n"))?;
                self.clear();
                return Ok(Some(ReadEvent::Interrupted));
            }
            END_OF_TRANSMISSION if self.buffer.is_empty() => {
                queue!(output, Print("\r\n"))?;
                self.clear();
                return Ok(Some(ReadEvent::Eof));
            }
            '\r' | '\n' => {
                queue!(output, Print("\r\n"))?;
                let line = std::mem::take(&mut self.buffer);
                self.completion.reset();
                return Ok(Some(ReadEvent::Line(line)));
            }
            DELETE | BACKSPACE => {
                self.buffer.pop();
                self.completion.reset();
                self.redraw(output)?;
            }
            '\t' => self.complete(output)?,
            c if c.is_control() => {}
            c => {
                self.buffer.push(c);
                self.completion.reset();
                self.redraw(output)?;
            }
        }
        Ok(None)
    }

    fn complete<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        // Only the command name is completed.
        if self.buffer.contains(' ') {
            self.completion.reset();
            return Ok(());
        }

        let presses = self.completion.press(&self.buffer);
        match self.completer.complete(&self.buffer, presses) {
            Completion::Unique(suffix) => {
                self.buffer.push_str(&suffix);
                self.buffer.push(' ');
                self.completion.reset();
                self.redraw(output)
            }
            Completion::Partial(suffix) => {
                self.buffer.push_str(&suffix);
                self.completion.reset();
                self.redraw(output)
            }
            Completion::Ambiguous(candidates) => {
                queue!(
                    output,
                    Print("\r\n"),
                    Print(candidates.join("  ")),
                    Print("\r\n")
                )?;
                self.redraw(output)
            }
            Completion::None => queue!(output, Print(BELL)),
        }
    }

    fn redraw<W: Write>(&self, output: &mut W) -> io::Result<()> {
        queue!(
            output,
            Print('\r'),
            Clear(ClearType::CurrentLine),
            Print(&self.prompt),
            Print(&self.buffer)
        )
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.completion.reset();
    }
}

/// Byte source with one byte of push-back.
struct InputBytes<'a, R> {
    input: &'a mut R,
    pending: Option<u8>,
}

impl<'a, R: Read> InputBytes<'a, R> {
    fn new(input: &'a mut R) -> Self {
        Self {
            input,
            pending: None,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn unread(&mut self, b: u8) {
        self.pending = Some(b);
    }

    /// Reads one UTF-8 encoded character, skipping malformed sequences.
    ///
    /// A byte that cannot continue the current sequence starts the next one.
    fn next_char(&mut self) -> io::Result<Option<char>> {
        'decode: loop {
            let Some(first) = self.next_byte()? else {
                return Ok(None);
            };
            let width = utf8_width(first);
            if width == 0 {
                tracing::warn!("ignoring invalid UTF-8 input byte {:#04x}", first);
                continue;
            }

            let mut buf = [first, 0, 0, 0];
            for slot in buf.iter_mut().take(width).skip(1) {
                match self.next_byte()? {
                    Some(b) if (0x80..=0xbf).contains(&b) => *slot = b,
                    Some(b) => {
                        tracing::warn!("ignoring truncated UTF-8 sequence at {:#04x}", first);
                        self.unread(b);
                        continue 'decode;
                    }
                    None => return Ok(None),
                }
            }
            match std::str::from_utf8(&buf[..width]) {
                Ok(s) => {
                    if let Some(c) = s.chars().next() {
                        return Ok(Some(c));
                    }
                }
                Err(e) => tracing::warn!("ignoring invalid UTF-8 input: {}", e),
            }
        }
    }

    /// Consumes the rest of an escape sequence whose `ESC` was already read.
    ///
    /// A lone `ESC` consumes nothing more.
    fn skip_escape_sequence(&mut self) -> io::Result<()> {
        match self.next_byte()? {
            // CSI: parameters and intermediates, then one final byte in 0x40..=0x7e.
            Some(b'[') => {
                while let Some(b) = self.next_byte()? {
                    if (0x40..=0x7e).contains(&b) {
                        break;
                    }
                }
            }
            // SS3, used by some terminals for arrow and function keys.
            Some(b'O') => {
                self.next_byte()?;
            }
            Some(b) => self.unread(b),
            None => {}
        }
        Ok(())
    }
}

/// Number of bytes in the UTF-8 sequence introduced by `first`, 0 if it cannot start one.
fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}
