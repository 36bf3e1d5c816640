use std::collections::VecDeque;

use log::debug;
use thiserror::Error;

use touchlink_core::{Command, Link, LinkError, VarId, INT_TAG, PROBE_ACK, SENTINEL, TEXT_TAG};

/// Errors produced by [`VirtualPanel`]'s [`Link`] implementation.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VirtualPanelError {
    /// A byte was read with nothing queued. The engine checks availability
    /// before every read, so hitting this in a test means it misbehaved.
    #[error("Read past the end of the queued response bytes")]
    ReadUnderrun,
}

/// Mock implementation of the display end of the wire.
///
/// `VirtualPanel` implements [`Link`] but behaves like the device rather
/// than the transport: it keeps its own programmed baud rate (which, like
/// the real hardware's, persists across the controller closing and
/// reopening the port), parses sentinel-terminated commands when the rates
/// agree, answers probes with [`PROBE_ACK`], and obeys `baud=` commands.
///
/// While most likely not a 100% accurate simulation of the firmware, it is
/// sufficient to exercise every path of the handshake and receive state
/// machine without hardware.
///
/// Bytes written while the controller's rate disagrees with the panel's are
/// received as garbage: they are counted, never parsed, and they leave the
/// panel's command buffer dirty, so the next sentinel-terminated chunk after
/// the rates re-align is discarded along with them. A handshake that skips
/// the bare-sentinel purge therefore loses its first real command, just as
/// the hardware would lose it.
///
/// # Examples
///
/// ```
/// use touchlink_core::{Command, Link, PROBE_ACK};
/// use touchlink_testing::VirtualPanel;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let mut panel = VirtualPanel::new(9600);
/// panel.open(9600)?;
/// panel.send(&Command::Probe.to_bytes())?;
///
/// assert_eq!(1, panel.available()?);
/// assert_eq!(PROBE_ACK, panel.read_byte()?);
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct VirtualPanel {
    device_baud: u32,
    link_baud: Option<u32>,
    pending: Vec<u8>,
    dirty: bool,
    garbage: usize,
    responses: VecDeque<u8>,
    commands: Vec<String>,
}

impl VirtualPanel {
    /// Creates a new `VirtualPanel` programmed for the given baud rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use touchlink_testing::VirtualPanel;
    ///
    /// let panel = VirtualPanel::new(9600);
    /// assert_eq!(9600, panel.device_baud());
    /// ```
    pub fn new(device_baud: u32) -> Self {
        VirtualPanel {
            device_baud,
            link_baud: None,
            pending: Vec::new(),
            dirty: false,
            garbage: 0,
            responses: VecDeque::new(),
            commands: Vec::new(),
        }
    }

    /// Returns the commands the panel has parsed, in arrival order, as
    /// ASCII text with the sentinel stripped.
    ///
    /// Useful when writing tests in order to verify what the controller
    /// actually put on the wire.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns the rate the panel is currently programmed for.
    pub fn device_baud(&self) -> u32 {
        self.device_baud
    }

    /// Returns the rate the controller most recently opened, if the link
    /// is open.
    pub fn link_baud(&self) -> Option<u32> {
        self.link_baud
    }

    /// Returns how many bytes arrived while the rates disagreed.
    pub fn garbage_bytes(&self) -> usize {
        self.garbage
    }

    /// Queues an integer-update frame for the controller to receive.
    ///
    /// # Examples
    ///
    /// ```
    /// use touchlink_core::{Link, VarId};
    /// use touchlink_testing::VirtualPanel;
    ///
    /// let mut panel = VirtualPanel::new(9600);
    /// panel.push_int(VarId(5), 42);
    /// assert_eq!(7, panel.available().unwrap());
    /// ```
    pub fn push_int(&mut self, id: VarId, value: i32) {
        self.responses.push_back(INT_TAG);
        self.responses.push_back(id.0);
        self.responses.extend(value.to_le_bytes());
        self.responses.push_back(0);
    }

    /// Queues a text-update frame for the controller to receive.
    pub fn push_text(&mut self, id: VarId, text: &str) {
        self.responses.push_back(TEXT_TAG);
        self.responses.push_back(id.0);
        self.responses.extend(text.bytes());
        self.responses.push_back(0);
    }

    /// Queues raw bytes verbatim, for stray-byte and malformed-frame tests.
    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.responses.extend(bytes.iter().copied());
    }

    fn matched(&self) -> bool {
        self.link_baud == Some(self.device_baud)
    }

    /// Accumulates inbound bytes and runs each complete command.
    fn accept(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        while let Some(end) = find_sentinel(&self.pending) {
            let chunk: Vec<u8> = self.pending.drain(..end + SENTINEL.len()).collect();
            let body = &chunk[..end];
            if self.dirty {
                // Mis-rated garbage is glued to the front of whatever
                // terminator arrives next; the whole chunk is unusable.
                self.dirty = false;
                debug!("VirtualPanel: discarded {} byte(s) stuck to stale garbage", body.len());
                continue;
            }
            if body.is_empty() {
                continue;
            }
            let text = String::from_utf8_lossy(body).into_owned();
            self.execute(&text);
            self.commands.push(text);
        }
    }

    fn execute(&mut self, command: &str) {
        if command == Command::Probe.to_string() {
            debug!("VirtualPanel: probed, echoing liveness byte");
            self.responses.push_back(PROBE_ACK);
        } else if let Some(rate) = command.strip_prefix("baud=") {
            if let Ok(rate) = rate.parse::<u32>() {
                debug!("VirtualPanel: reprogrammed to {} baud", rate);
                self.device_baud = rate;
            }
        }
        // Variable assignments and timer kicks are only recorded.
    }
}

impl Link for VirtualPanel {
    fn open(&mut self, baud: u32) -> Result<(), LinkError> {
        self.link_baud = Some(baud);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        self.link_baud = None;
        Ok(())
    }

    fn available(&mut self) -> Result<usize, LinkError> {
        Ok(self.responses.len())
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        Ok(self.responses.pop_front().ok_or(VirtualPanelError::ReadUnderrun)?)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if self.matched() {
            self.accept(bytes);
        } else {
            self.garbage += bytes.len();
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Finds the offset of the first sentinel in `buffer`, if any.
fn find_sentinel(buffer: &[u8]) -> Option<usize> {
    buffer.windows(SENTINEL.len()).position(|window| window == SENTINEL)
}
