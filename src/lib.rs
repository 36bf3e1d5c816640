//! A library for exchanging typed variable updates with Nextion-style
//! touch displays over a UART link.
//!
//! Provides a way to connect to a display, negotiate its baud rate once at
//! startup, push integer and text values into named display variables, and
//! receive touch-driven updates back through a non-blocking polling loop.
//! No rendering functionality is provided; the display's own firmware draws
//! the screens, and this crate only exchanges variable values with it.
//!
//! # Examples
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use touchlink::{Panel, SerialLink, VarId};
//!
//! # fn main() -> Result<(), touchlink::PanelError> {
//! #
//! // Set up the link. Because it can be shared, it must be
//! // wrapped in an Rc<RefCell>.
//! let link = Rc::new(RefCell::new(SerialLink::new("/dev/ttyUSB0")));
//!
//! // Create the panel and negotiate the operating rate.
//! let mut panel = Panel::new(link);
//! if !panel.connect(115_200)? {
//!     eprintln!("display not responding; running offline");
//! }
//!
//! // Push values out and make them visible.
//! panel.set_int(VarId(0), 42)?;
//! panel.set_text(VarId(1), "ready")?;
//! panel.request_update()?;
//!
//! // Handle updates the display sends when the user touches it.
//! panel.set_int_handler(|id, value| println!("{} = {}", id, value));
//! loop {
//!     panel.poll()?;
//!     // ... the rest of the application's main loop ...
//! #   break;
//! }
//! #
//! # Ok(()) }
//! ```
//!
//! # Sub-crates
//!
//! In addition to the high-level API of [`Panel`], several lower-level
//! components are provided that can be combined for more specialized
//! use-cases.
//!
//! - [`touchlink-core`] \(re-exported as `core`\) contains the wire-level
//!   vocabulary of the protocol, and is useful if you want to implement a
//!   custom [`Link`] or build command bytes yourself.
//! - [`touchlink-serial`] \(re-exported as `serial`\) contains the
//!   [`SerialLink`] transport over a real UART.
//! - [`touchlink-testing`] contains tools not directly related to
//!   communicating with displays, but useful for testing and debugging.
//!
//! [`Panel`]: struct.Panel.html
//! [`touchlink-core`]: https://docs.rs/touchlink-core
//! [`touchlink-serial`]: https://docs.rs/touchlink-serial
//! [`touchlink-testing`]: https://docs.rs/touchlink-testing
//! [`Link`]: trait.Link.html
//! [`SerialLink`]: struct.SerialLink.html
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

pub use touchlink_core as core;
pub use touchlink_serial as serial;

mod panel;

pub use self::panel::{Panel, PanelError, DEFAULT_RX_TIMEOUT};

pub use crate::core::{Clock, Command, Link, LinkError, SystemClock, VarId};
pub use crate::serial::SerialLink;
