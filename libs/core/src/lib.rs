//! Core types for the touchlink serial display protocol.
//!
//! For the basic task of talking to a display, you likely want the
//! high-level `Panel` API in the [`touchlink`] crate instead.
//!
//! However, `touchlink-core` is useful for crates that want to work with
//! the wire protocol at a lower level, or that provide their own [`Link`]
//! implementations for `touchlink` to drive.
//!
//! # Examples
//!
//! ```
//! use touchlink_core::{Command, VarId, SENTINEL};
//!
//! // Build the wire form of a variable assignment.
//! let command = Command::SetInt(VarId(2), 750);
//! let bytes = command.to_bytes();
//!
//! assert!(bytes.starts_with(b"var.va2.val=750"));
//! assert!(bytes.ends_with(&SENTINEL));
//! ```
//!
//! [`touchlink`]: https://docs.rs/touchlink
//! [`Link`]: trait.Link.html
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

mod clock;
mod command;
mod link;
mod wire;

pub use self::clock::{Clock, SystemClock};
pub use self::command::{Command, VarId};
pub use self::link::{Link, LinkError};
pub use self::wire::{FACTORY_BAUD, INT_TAG, MAX_TEXT_LEN, PROBE_ACK, SENTINEL, SUPPORTED_BAUDS, TEXT_TAG};
