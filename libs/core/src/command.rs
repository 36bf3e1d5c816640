use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use crate::wire::SENTINEL;

/// Identifies a variable slot on the display.
///
/// The display names its variable components `va0` through `va255`; the id
/// is the numeric suffix. Nothing enforces that a given id actually exists
/// in the display's firmware — assignments to unknown slots are silently
/// ignored on the far end.
///
/// # Examples
///
/// ```
/// use touchlink_core::VarId;
///
/// let id = VarId(7);
/// assert_eq!("va7", id.to_string());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u8);

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "va{}", self.0)
    }
}

/// An outbound command in the display's ASCII command language.
///
/// [`to_bytes`](Self::to_bytes) produces the wire form: the command text
/// followed unconditionally by the 3-byte [`SENTINEL`] terminator. The
/// `Display` impl renders the text alone, which is what log lines want.
///
/// # Examples
///
/// ```
/// use touchlink_core::{Command, VarId, SENTINEL};
///
/// let command = Command::SetInt(VarId(2), 750);
/// assert_eq!("var.va2.val=750", command.to_string());
///
/// let bytes = command.to_bytes();
/// assert!(bytes.starts_with(b"var.va2.val=750"));
/// assert!(bytes.ends_with(&SENTINEL));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command<'a> {
    /// Assigns an integer value to a display variable.
    SetInt(VarId, i32),

    /// Assigns a text value to a display variable.
    ///
    /// The text is embedded between double quotes verbatim: it must not
    /// contain `"` characters or `0xFF` bytes, and escaping it is the
    /// caller's responsibility.
    SetText(VarId, &'a str),

    /// Enables the display's local timer 0, which display firmware
    /// conventionally wires to a screen refresh.
    Refresh,

    /// Asks the display to echo the single liveness byte
    /// [`PROBE_ACK`](crate::PROBE_ACK). Used by the handshake.
    Probe,

    /// Reprograms the display's baud rate. Takes effect as soon as the
    /// sentinel is received; no response is sent.
    SetBaud(u32),
}

impl Command<'_> {
    /// Converts the command to its wire format, sentinel included.
    ///
    /// # Examples
    ///
    /// ```
    /// use touchlink_core::{Command, VarId};
    ///
    /// let bytes = Command::SetText(VarId(1), "hi").to_bytes();
    /// assert_eq!(b"var.va1.txt=\"hi\"\xFF\xFF\xFF", bytes.as_slice());
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let text = self.to_string();
        let mut output = Vec::with_capacity(text.len() + SENTINEL.len());
        output.extend_from_slice(text.as_bytes());
        output.extend_from_slice(&SENTINEL);
        output
    }

    /// Writes the wire format of the command to a writer.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying write.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

impl Display for Command<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetInt(id, value) => write!(f, "var.{}.val={}", id, value),
            Command::SetText(id, text) => write!(f, "var.{}.txt=\"{}\"", id, text),
            Command::Refresh => f.write_str("tm0.en=1"),
            Command::Probe => f.write_str("printh AA"),
            Command::SetBaud(rate) => write!(f, "baud={}", rate),
        }
    }
}
