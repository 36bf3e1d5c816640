//! Tools for testing and debugging touchlink display communications.
//!
//! For the basic task of talking to a display, you likely want the
//! high-level `Panel` API in the [`touchlink`] crate instead.
//!
//! This crate isn't directly related to controlling real hardware, but
//! provides some helpful diagnostic tools. [`VirtualPanel`] is a
//! general-purpose mock of the display end of the wire, and [`FakeClock`]
//! drives the engine's deadlines with simulated time.
//!
//! # Examples
//!
//! ```
//! use touchlink_core::{Command, Link};
//! use touchlink_testing::VirtualPanel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let mut panel = VirtualPanel::new(9600);
//! panel.open(9600)?;
//!
//! // Anything a controller writes is parsed into sentinel-framed commands.
//! panel.send(&Command::Refresh.to_bytes())?;
//! assert_eq!(panel.commands(), ["tm0.en=1"]);
//! #
//! # Ok(()) }
//! ```
//!
//! [`touchlink`]: https://docs.rs/touchlink
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

mod fake_clock;
mod virtual_panel;

pub use self::fake_clock::FakeClock;
pub use self::virtual_panel::{VirtualPanel, VirtualPanelError};

pub use touchlink_core::VarId;
