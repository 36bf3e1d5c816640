//! Constants of the display's wire protocol.
//!
//! Outbound traffic is ASCII command text terminated by [`SENTINEL`];
//! inbound traffic is binary frames introduced by a type tag byte.

/// Terminates every outbound command.
///
/// The display does not act on a command until it has seen all three bytes.
/// Written on its own (with no preceding command text) it makes the display
/// discard whatever partial garbage is sitting in its command buffer, which
/// the handshake relies on after probing at a mismatched rate.
pub const SENTINEL: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Single byte the display echoes in response to a probe command.
pub const PROBE_ACK: u8 = 0xAA;

/// Tag byte introducing an integer-update frame: id, 4 little-endian value
/// bytes, and a terminator byte expected to be `0`.
pub const INT_TAG: u8 = b'I';

/// Tag byte introducing a text-update frame: id, data bytes, and a `0`
/// terminator.
pub const TEXT_TAG: u8 = b'T';

/// Maximum number of data bytes in a text-update frame.
///
/// A frame whose body runs past this without a terminator is dropped.
pub const MAX_TEXT_LEN: usize = 31;

/// Rate the display ships with and falls back to, in baud.
pub const FACTORY_BAUD: u32 = 9600;

/// Rates the display's `baud=` command accepts.
pub const SUPPORTED_BAUDS: [u32; 7] = [2400, 4800, 9600, 19200, 38400, 57600, 115_200];
