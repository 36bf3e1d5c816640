use std::fmt::{self, Debug, Formatter};
use std::io::{Read, Write};

use log::debug;
use serialport::SerialPort;
use thiserror::Error;

use touchlink_core::{Link, LinkError};

use crate::port::open_port;

/// Errors specific to [`SerialLink`] operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerialLinkError {
    /// An operation other than `open` was attempted while the port was closed.
    #[error("Serial port {path} is not open")]
    NotOpen {
        /// The device path of the port.
        path: String,
    },
}

/// An implementation of [`Link`] over a real UART via the `serialport` crate.
///
/// Construction does not touch the hardware; the port is opened by
/// [`Link::open`], which is also how the handshake re-tunes the rate
/// (each `open` replaces any previously open handle).
///
/// # Examples
///
/// ```no_run
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use touchlink_serial::SerialLink;
///
/// let link = Rc::new(RefCell::new(SerialLink::new("/dev/ttyUSB0")));
/// // Can now hand the link to a Panel.
/// ```
pub struct SerialLink {
    path: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    /// Creates a new `SerialLink` for the named serial device.
    ///
    /// # Examples
    ///
    /// ```
    /// use touchlink_serial::SerialLink;
    ///
    /// let link = SerialLink::new("COM3");
    /// assert_eq!("COM3", link.path());
    /// ```
    pub fn new<S: Into<String>>(path: S) -> Self {
        SerialLink {
            path: path.into(),
            port: None,
        }
    }

    /// Returns the device path this link opens.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns whether the port is currently open.
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, SerialLinkError> {
        let path = &self.path;
        self.port.as_mut().ok_or_else(|| SerialLinkError::NotOpen { path: path.clone() })
    }
}

impl Link for SerialLink {
    fn open(&mut self, baud: u32) -> Result<(), LinkError> {
        self.port = Some(open_port(&self.path, baud)?);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        if self.port.take().is_some() {
            debug!("Closed {}", self.path);
        }
        Ok(())
    }

    fn available(&mut self) -> Result<usize, LinkError> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        let mut byte = [0u8; 1];
        self.port()?.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.port()?.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        self.port()?.flush()?;
        Ok(())
    }
}

impl Debug for SerialLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("open", &self.port.is_some())
            .finish()
    }
}
