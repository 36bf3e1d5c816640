use std::time::Duration;

use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

/// How long a blocking read may wait for a byte.
///
/// The engine only reads bytes the port has already buffered, so this is a
/// backstop against a byte evaporating between the availability check and
/// the read, not a protocol timeout.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Opens and configures the named serial port for display communication.
///
/// The displays speak 8N1 with no flow control at whatever rate they are
/// currently programmed for; only the rate varies.
///
/// # Errors
///
/// Returns a [`serialport::Error`] if the port cannot be opened or
/// configured.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), serialport::Error> {
/// let port = touchlink_serial::open_port("/dev/ttyUSB0", 115_200)?;
/// // Now ready for raw communication with a display (8N1, no flow control).
/// #
/// # Ok(()) }
/// ```
pub fn open_port(path: &str, baud: u32) -> Result<Box<dyn SerialPort>, serialport::Error> {
    debug!("Opening {} at {} baud", path, baud);
    serialport::new(path, baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
}
