//! Serial console line parser
//!
//! Commands are single lines terminated by `\n`. A backslash escapes the
//! next byte, so values may contain newlines or backslashes.
//!
//! | Command          | Meaning                   |
//! |------------------|---------------------------|
//! | `e<text>`        | echo `<text>`             |
//! | `v`              | local firmware version    |
//! | `r`              | local role                |
//! | `g<key>`         | read a value              |
//! | `s<key><value>`  | write a value             |

use heapless::{String, Vec};

/// Input line capacity in bytes
pub const IN_BUFFER_SIZE: usize = 128;

/// Line terminator
pub const END_OF_COMMAND: u8 = b'\n';

/// Escape byte
pub const ESCAPE: u8 = b'\\';

/// Console error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Response did not fit the output buffer
    ResponseTooLong,
    /// Line longer than [`IN_BUFFER_SIZE`]
    InputTooLong,
    /// First byte is not a known command
    UnknownCommand,
    /// Known command with bad arguments
    Malformed,
}

impl ConsoleError {
    /// Text written back to the console
    pub fn code(self) -> &'static str {
        match self {
            ConsoleError::ResponseTooLong => "ERR 01",
            ConsoleError::InputTooLong => "ERR 02",
            ConsoleError::UnknownCommand => "ERR 03",
            ConsoleError::Malformed => "ERR 04",
        }
    }
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Echo(String<IN_BUFFER_SIZE>),
    Version,
    Role,
    Get(u8),
    Set {
        key: u8,
        value: String<IN_BUFFER_SIZE>,
    },
}

/// Incremental line parser
#[derive(Debug, Default)]
pub struct CommandParser {
    buffer: Vec<u8, IN_BUFFER_SIZE>,
    escaped: bool,
    overflowed: bool,
}

impl CommandParser {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            escaped: false,
            overflowed: false,
        }
    }

    /// Feed one received byte
    ///
    /// Returns a result once a line is complete, or immediately when the
    /// line overflows the buffer. The rest of an overflowing line is
    /// discarded. Blank lines produce nothing.
    pub fn feed(&mut self, byte: u8) -> Option<Result<Command, ConsoleError>> {
        if self.escaped {
            self.escaped = false;
            return self.push(byte);
        }

        match byte {
            ESCAPE => {
                self.escaped = true;
                None
            }
            END_OF_COMMAND => {
                let was_overflowed = self.overflowed;
                self.overflowed = false;
                if was_overflowed {
                    self.buffer.clear();
                    return None;
                }
                let result = parse_line(&self.buffer);
                self.buffer.clear();
                result
            }
            _ => self.push(byte),
        }
    }

    fn push(&mut self, byte: u8) -> Option<Result<Command, ConsoleError>> {
        if self.overflowed {
            return None;
        }
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.overflowed = true;
            return Some(Err(ConsoleError::InputTooLong));
        }
        None
    }
}

fn parse_line(line: &[u8]) -> Option<Result<Command, ConsoleError>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let (&cmd, args) = line.split_first()?;

    let command = match cmd {
        b'e' => text(args).map(Command::Echo),
        b'v' if args.is_empty() => Ok(Command::Version),
        b'r' if args.is_empty() => Ok(Command::Role),
        b'v' | b'r' => Err(ConsoleError::Malformed),
        b'g' => match args {
            [key] => Ok(Command::Get(*key)),
            _ => Err(ConsoleError::Malformed),
        },
        b's' => match args.split_first() {
            Some((&key, value)) => text(value).map(|value| Command::Set { key, value }),
            None => Err(ConsoleError::Malformed),
        },
        _ => Err(ConsoleError::UnknownCommand),
    };
    Some(command)
}

fn text(bytes: &[u8]) -> Result<String<IN_BUFFER_SIZE>, ConsoleError> {
    let s = core::str::from_utf8(bytes).map_err(|_| ConsoleError::Malformed)?;
    String::try_from(s).map_err(|_| ConsoleError::Malformed)
}
