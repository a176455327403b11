//! Communication Protocols
//!
//! Console command parsing and response formatting for the serial link.
//! Commands are two upper-case letters, optionally followed by an
//! argument, and terminated by `;`.
//!
//! | Command         | Meaning                          |
//! |-----------------|----------------------------------|
//! | `RQ;`           | Query the latest spectrum        |
//! | `ID;`           | Identify device and platform     |
//! | `ST;`           | Cycle counters and update state  |
//! | `UP<password>;` | Request a firmware update        |

use heapless::{String, Vec};

use crate::config::COMMAND_BUFFER_SIZE;
use crate::types::PlatformInfo;
use crate::update::UpdateStatus;

/// Maximum password length accepted by `UP`
pub const MAX_PASSWORD_LEN: usize = 32;

/// Console command parser
pub struct CommandParser {
    /// Command buffer
    buffer: Vec<u8, COMMAND_BUFFER_SIZE>,
    /// Set after an overflow; bytes are dropped up to the next `;`
    discarding: bool,
}

impl CommandParser {
    /// Create a new command parser
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feed a byte to the parser
    /// Returns a command if one is complete
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        // Commands end with ';'
        if byte == b';' {
            let cmd = if self.discarding {
                None
            } else {
                self.parse_buffer()
            };
            self.clear();
            cmd
        } else if byte == b'\r' || byte == b'\n' || self.discarding {
            // Ignore line endings and the tail of an overlong command
            None
        } else {
            let _ = self.buffer.push(byte);

            // Prevent overflow
            if self.buffer.len() >= COMMAND_BUFFER_SIZE {
                self.buffer.clear();
                self.discarding = true;
            }

            None
        }
    }

    /// Parse the current buffer as a command
    fn parse_buffer(&self) -> Option<Command> {
        if self.buffer.len() < 2 {
            return None;
        }

        let cmd = core::str::from_utf8(&self.buffer).ok()?;
        if !cmd.is_char_boundary(2) {
            return None;
        }

        match &cmd[..2] {
            "RQ" if cmd.len() == 2 => Some(Command::Query),
            "ID" if cmd.len() == 2 => Some(Command::Identify),
            "ST" if cmd.len() == 2 => Some(Command::Status),
            "UP" => Self::parse_update(&cmd[2..]),
            code => {
                let mut unknown = String::new();
                unknown.push_str(code).ok()?;
                Some(Command::Unknown(unknown))
            }
        }
    }

    fn parse_update(password: &str) -> Option<Command> {
        let mut pw = String::new();
        pw.push_str(password).ok()?;
        Some(Command::Update(pw))
    }

    /// Clear the buffer and any pending discard
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Console command parsed from serial input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send the latest spectrum document
    Query,
    /// Send device and platform identification
    Identify,
    /// Send cycle counters and update state
    Status,
    /// Request a firmware update with the given password
    Update(String<MAX_PASSWORD_LEN>),
    /// Unknown/unparsed command
    Unknown(String<4>),
}

#[cfg(feature = "embedded")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Query => defmt::write!(f, "Query"),
            Self::Identify => defmt::write!(f, "Identify"),
            Self::Status => defmt::write!(f, "Status"),
            Self::Update(_) => defmt::write!(f, "Update(***)"),
            Self::Unknown(code) => defmt::write!(f, "Unknown({})", code.as_str()),
        }
    }
}

/// Maximum short response length
pub const MAX_RESPONSE_LEN: usize = 96;

/// Console response formatter
pub struct Response {
    buffer: String<MAX_RESPONSE_LEN>,
}

impl Response {
    /// Create a new response formatter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Format identification response
    pub fn identify(&mut self, device: &str, platform: PlatformInfo) {
        self.buffer.clear();
        let _ = core::fmt::write(
            &mut self.buffer,
            format_args!("ID{device},{},{};", platform.name, platform.firmware_version),
        );
    }

    /// Format status response
    pub fn status(&mut self, cycles: u32, failures: u32, update: UpdateStatus) {
        self.buffer.clear();
        let _ = core::fmt::write(
            &mut self.buffer,
            format_args!("ST{cycles},{failures},{};", update.code()),
        );
    }

    /// Format "no spectrum yet" response
    pub fn no_data(&mut self) {
        self.set("RQ0;");
    }

    /// Format update request acknowledgement
    pub fn update(&mut self, accepted: bool) {
        self.set(if accepted { "UP1;" } else { "UP0;" });
    }

    /// Format unknown command response
    pub fn unknown(&mut self) {
        self.set("?;");
    }

    fn set(&mut self, text: &str) {
        self.buffer.clear();
        let _ = self.buffer.push_str(text);
    }

    /// Get the response string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the response bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Clear the response buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
