//! Serial transport for touchlink displays.
//!
//! For the basic task of talking to a display, you likely want the
//! high-level `Panel` API in the [`touchlink`] crate instead.
//!
//! However, you can use the [`open_port`] function to configure a serial
//! port appropriately if you're doing custom lower-level communication.
//!
//! # Examples
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use touchlink_serial::SerialLink;
//!
//! let link = Rc::new(RefCell::new(SerialLink::new("/dev/ttyUSB0")));
//! // Now ready to be driven by a Panel.
//! ```
//!
//! [`touchlink`]: https://docs.rs/touchlink
//! [`open_port`]: fn.open_port.html
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

mod port;
mod serial_link;

pub use self::port::open_port;
pub use self::serial_link::{SerialLink, SerialLinkError};
