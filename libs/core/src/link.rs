use std::fmt::{self, Debug, Formatter};

/// Boxed error type returned by [`Link`] operations.
///
/// Implementations report failures in whatever error type suits them; the
/// engine only needs to propagate them, so they travel boxed.
pub type LinkError = Box<dyn std::error::Error + Send + Sync>;

/// Abstraction over the duplex byte stream connecting controller and display.
///
/// Typically `SerialLink` from `touchlink-serial` or `VirtualPanel` from
/// `touchlink-testing` are sufficient, and you do not need to implement this
/// yourself.
///
/// The engine drives the link strictly from one thread and never reads more
/// than [`available`](Self::available) reports, so implementations may treat
/// `read_byte` on an empty buffer as an error rather than blocking.
///
/// # Examples
///
/// Implementing a custom link that echoes writes back as reads:
///
/// ```
/// use touchlink_core::{Link, LinkError};
///
/// #[derive(Debug, Default)]
/// struct LoopbackLink {
///     buffer: Vec<u8>,
/// }
///
/// impl Link for LoopbackLink {
///     fn open(&mut self, _baud: u32) -> Result<(), LinkError> {
///         Ok(())
///     }
///
///     fn close(&mut self) -> Result<(), LinkError> {
///         Ok(())
///     }
///
///     fn available(&mut self) -> Result<usize, LinkError> {
///         Ok(self.buffer.len())
///     }
///
///     fn read_byte(&mut self) -> Result<u8, LinkError> {
///         Ok(self.buffer.remove(0))
///     }
///
///     fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
///         self.buffer.extend_from_slice(bytes);
///         Ok(())
///     }
///
///     fn flush(&mut self) -> Result<(), LinkError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Link {
    /// Opens the stream at the given baud rate.
    ///
    /// Opening an already-open link reopens it at the new rate; the
    /// handshake also calls [`close`](Self::close) first to make the rate
    /// change explicit.
    fn open(&mut self, baud: u32) -> Result<(), LinkError>;

    /// Closes the stream. Closing a closed link is a no-op.
    fn close(&mut self) -> Result<(), LinkError>;

    /// Returns how many received bytes can be read without blocking.
    fn available(&mut self) -> Result<usize, LinkError>;

    /// Reads one received byte.
    fn read_byte(&mut self) -> Result<u8, LinkError>;

    /// Writes the given bytes to the stream.
    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Blocks until all written bytes have left the controller.
    fn flush(&mut self) -> Result<(), LinkError>;
}

// Provide a Debug representation so types that contain trait objects can derive Debug.
impl Debug for dyn Link {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Link trait>")
    }
}
