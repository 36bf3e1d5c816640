use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use std::str;
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

use crate::core::{
    Clock, Command, Link, SystemClock, VarId, FACTORY_BAUD, INT_TAG, MAX_TEXT_LEN, PROBE_ACK, SENTINEL, TEXT_TAG,
};

/// Default limit on how long a started frame may take to complete before
/// the engine abandons it and resynchronizes.
pub const DEFAULT_RX_TIMEOUT: Duration = Duration::from_millis(200);

/// Pause between reopening at a freshly programmed rate and the confirming
/// probe; the display needs a moment to retune its UART.
const BAUD_SETTLE: Duration = Duration::from_millis(100);

/// Pause between polls while waiting for a probe response.
const PROBE_POLL: Duration = Duration::from_millis(1);

/// Byte length of an integer frame body: id, four value bytes, terminator.
const INT_BODY_LEN: usize = 6;

/// Errors related to [`Panel`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PanelError {
    /// The link failed to carry out a transport operation.
    #[error("Link failed to carry out a transport operation")]
    Link {
        /// The underlying link error.
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Which kind of frame the receive state machine is collecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RxState {
    Idle,
    Int,
    Text,
}

/// A single touch display on an associated link.
///
/// Basic operation consists of negotiating the baud rate once with
/// [`connect`](Self::connect), pushing values out with
/// [`set_int`](Self::set_int)/[`set_text`](Self::set_text), and calling
/// [`poll`](Self::poll) from the application's main loop to receive
/// touch-driven updates back. The displays are active peers: they render and
/// refresh on their own, so the controller only exchanges variable values
/// with them.
///
/// Received updates are delivered through the two handler slots (one for
/// integer updates, one for text). A slot with no handler causes matching
/// messages to be decoded and dropped. Handlers run synchronously inside
/// `poll` and must not block; the `&str` passed to the text handler borrows
/// the engine's scratch buffer and cannot be retained.
///
/// # Examples
///
/// ```no_run
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use touchlink::{Panel, SerialLink, VarId};
///
/// # fn main() -> Result<(), touchlink::PanelError> {
/// #
/// // Set up the link. Because it can be shared, it must be
/// // wrapped in an Rc<RefCell>.
/// let link = Rc::new(RefCell::new(SerialLink::new("/dev/ttyUSB0")));
///
/// // Create the panel and negotiate the operating rate once at startup.
/// let mut panel = Panel::new(link);
/// if !panel.connect(115_200)? {
///     eprintln!("display not responding; running offline");
/// }
///
/// // Push values to the display and let its refresh timer show them.
/// panel.set_int(VarId(0), 42)?;
/// panel.set_text(VarId(1), "ready")?;
/// panel.request_update()?;
///
/// // React to touch-driven updates from the display.
/// panel.set_int_handler(|id, value| println!("{} = {}", id, value));
/// loop {
///     panel.poll()?;
///     // ... the rest of the application's main loop ...
/// #   break;
/// }
/// #
/// # Ok(()) }
/// ```
pub struct Panel {
    link: Rc<RefCell<dyn Link>>,
    clock: Box<dyn Clock>,
    default_baud: u32,
    connected_baud: Option<u32>,
    rx_timeout: Duration,
    rx_state: RxState,
    rx_id: VarId,
    rx_has_id: bool,
    text_buf: [u8; MAX_TEXT_LEN],
    text_len: usize,
    frame_started: Option<Instant>,
    on_int: Option<Box<dyn FnMut(VarId, i32)>>,
    on_text: Option<Box<dyn FnMut(VarId, &str)>>,
}

impl Panel {
    /// Creates a new `Panel` on the given link, assuming the display falls
    /// back to the factory rate of 9600 baud.
    ///
    /// Both handler slots start unset; no I/O happens until
    /// [`connect`](Self::connect) or a send operation is called.
    pub fn new(link: Rc<RefCell<dyn Link>>) -> Self {
        Self::with_default_baud(link, FACTORY_BAUD)
    }

    /// Creates a new `Panel` whose display has been configured with a
    /// non-factory fallback rate.
    pub fn with_default_baud(link: Rc<RefCell<dyn Link>>, default_baud: u32) -> Self {
        Self::with_clock(link, default_baud, Box::new(SystemClock))
    }

    /// Creates a new `Panel` with an explicit time source.
    ///
    /// The clock drives the receive deadline, the probe wait, and the
    /// settle delay after a rate change; tests substitute a simulated one.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use touchlink::Panel;
    /// use touchlink_testing::{FakeClock, VirtualPanel};
    ///
    /// let link = Rc::new(RefCell::new(VirtualPanel::new(9600)));
    /// let clock = FakeClock::new();
    /// let panel = Panel::with_clock(link, 9600, Box::new(clock.clone()));
    /// ```
    pub fn with_clock(link: Rc<RefCell<dyn Link>>, default_baud: u32, clock: Box<dyn Clock>) -> Self {
        Panel {
            link,
            clock,
            default_baud,
            connected_baud: None,
            rx_timeout: DEFAULT_RX_TIMEOUT,
            rx_state: RxState::Idle,
            rx_id: VarId(0),
            rx_has_id: false,
            text_buf: [0; MAX_TEXT_LEN],
            text_len: 0,
            frame_started: None,
            on_int: None,
            on_text: None,
        }
    }

    /// Returns the rate the display answered at, once
    /// [`connect`](Self::connect) has succeeded.
    pub fn baud(&self) -> Option<u32> {
        self.connected_baud
    }

    /// Returns the fallback rate assumed for the display.
    pub fn default_baud(&self) -> u32 {
        self.default_baud
    }

    /// Returns the receive timeout currently in force.
    pub fn rx_timeout(&self) -> Duration {
        self.rx_timeout
    }

    /// Sets how long a started frame may take to complete, and how long a
    /// probe waits for its response. Defaults to [`DEFAULT_RX_TIMEOUT`].
    pub fn set_rx_timeout(&mut self, timeout: Duration) {
        self.rx_timeout = timeout;
    }

    /// Assigns the handler invoked for decoded integer updates, replacing
    /// any previous one.
    pub fn set_int_handler(&mut self, handler: impl FnMut(VarId, i32) + 'static) {
        self.on_int = Some(Box::new(handler));
    }

    /// Assigns the handler invoked for decoded text updates, replacing any
    /// previous one.
    pub fn set_text_handler(&mut self, handler: impl FnMut(VarId, &str) + 'static) {
        self.on_text = Some(Box::new(handler));
    }

    /// Establishes communication with the display at the given rate.
    ///
    /// Returns `Ok(true)` once the display has answered a probe at
    /// `baud`, reprogramming it from the fallback rate if necessary.
    /// `Ok(false)` means no live display could be confirmed at either
    /// rate; the caller decides whether to retry or run offline. Transport
    /// failures surface as [`PanelError::Link`].
    ///
    /// The rates the displays accept are listed in
    /// [`SUPPORTED_BAUDS`](crate::core::SUPPORTED_BAUDS).
    ///
    /// This is the one blocking operation: each probe busy-waits up to the
    /// receive timeout for the display's answer. It is meant to run once at
    /// startup.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Link`] if the underlying link failed to open,
    /// write, or read.
    pub fn connect(&mut self, baud: u32) -> Result<bool, PanelError> {
        // A controller-side restart leaves the display still talking at
        // whatever rate it was last programmed for, so try the target
        // rate first.
        self.link.borrow_mut().open(baud)?;
        if self.probe()? {
            debug!("Display answered at {} baud", baud);
            self.connected_baud = Some(baud);
            return Ok(true);
        }

        // No answer; fall back to the display's default rate. The
        // mis-rated probe left garbage in the display's command buffer,
        // and a bare terminator makes it discard the partial command
        // before the next probe.
        {
            let mut link = self.link.borrow_mut();
            link.close()?;
            link.open(self.default_baud)?;
            link.send(&SENTINEL)?;
        }
        if !self.probe()? {
            debug!("Display did not answer at {} or {} baud", baud, self.default_baud);
            return Ok(false);
        }

        // Alive at the default rate; reprogram it and follow along.
        {
            let mut link = self.link.borrow_mut();
            link.send(&Command::SetBaud(baud).to_bytes())?;
            link.close()?;
            link.open(baud)?;
        }
        self.clock.sleep(BAUD_SETTLE);
        let confirmed = self.probe()?;
        if confirmed {
            debug!("Display reprogrammed to {} baud", baud);
            self.connected_baud = Some(baud);
        }
        Ok(confirmed)
    }

    /// Assigns an integer value to a display variable.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Link`] if the underlying link failed to write.
    pub fn set_int(&mut self, id: VarId, value: i32) -> Result<(), PanelError> {
        self.send(Command::SetInt(id, value))
    }

    /// Assigns a text value to a display variable.
    ///
    /// The text is put on the wire verbatim between double quotes; it must
    /// not contain `"` characters or `0xFF` bytes. Escaping is the
    /// caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Link`] if the underlying link failed to write.
    pub fn set_text(&mut self, id: VarId, text: &str) -> Result<(), PanelError> {
        self.send(Command::SetText(id, text))
    }

    /// Kicks the display's local refresh timer so newly assigned values
    /// become visible.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Link`] if the underlying link failed to write.
    pub fn request_update(&mut self) -> Result<(), PanelError> {
        self.send(Command::Refresh)
    }

    /// Reads and decodes whatever the display has sent since the last call.
    ///
    /// To be called repeatedly from the application's main loop. Each call
    /// does a bounded amount of work and never blocks: at most one byte is
    /// consumed while idle or collecting text, and an integer body is only
    /// consumed once all six of its bytes have arrived. Completed messages
    /// are dispatched synchronously to the registered handlers before the
    /// call returns.
    ///
    /// Line noise never surfaces as an error: stray bytes are discarded one
    /// at a time, overlong text is dropped, and a frame that stalls longer
    /// than the receive timeout is abandoned so a fresh tag byte can
    /// resynchronize the stream.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Link`] if the underlying link failed to report
    /// availability or read.
    pub fn poll(&mut self) -> Result<(), PanelError> {
        match self.rx_state {
            RxState::Idle => {
                let tag = {
                    let mut link = self.link.borrow_mut();
                    if link.available()? > 0 {
                        Some(link.read_byte()?)
                    } else {
                        None
                    }
                };
                match tag {
                    Some(INT_TAG) => {
                        self.rx_state = RxState::Int;
                        self.frame_started = Some(self.clock.now());
                    }
                    Some(TEXT_TAG) => {
                        self.rx_state = RxState::Text;
                        self.frame_started = Some(self.clock.now());
                    }
                    Some(other) => debug!("Dropped stray byte 0x{:02X} while idle", other),
                    None => {}
                }
            }
            RxState::Int => {
                // Wait until the whole body is readable, then take it in
                // one piece; a started decode is never interrupted.
                let body = {
                    let mut link = self.link.borrow_mut();
                    if link.available()? >= INT_BODY_LEN {
                        let id = VarId(link.read_byte()?);
                        let mut value = [0; 4];
                        for byte in value.iter_mut() {
                            *byte = link.read_byte()?;
                        }
                        Some((id, i32::from_le_bytes(value), link.read_byte()?))
                    } else {
                        None
                    }
                };
                match body {
                    Some((id, value, 0)) => {
                        if let Some(handler) = self.on_int.as_mut() {
                            handler(id, value);
                        }
                        self.reset_rx();
                    }
                    Some((id, _, terminator)) => {
                        // Consume the frame to keep the stream aligned, but
                        // don't trust the payload.
                        debug!("Integer frame for {} ended in 0x{:02X}, expected 0; dropped", id, terminator);
                        self.reset_rx();
                    }
                    None => self.check_rx_deadline(),
                }
            }
            RxState::Text => {
                let byte = {
                    let mut link = self.link.borrow_mut();
                    if link.available()? > 0 {
                        Some(link.read_byte()?)
                    } else {
                        None
                    }
                };
                match byte {
                    Some(byte) if !self.rx_has_id => {
                        self.rx_id = VarId(byte);
                        self.rx_has_id = true;
                        self.check_rx_deadline();
                    }
                    Some(0) => {
                        self.dispatch_text();
                        self.reset_rx();
                    }
                    Some(byte) => {
                        if self.text_len < MAX_TEXT_LEN {
                            self.text_buf[self.text_len] = byte;
                            self.text_len += 1;
                            self.check_rx_deadline();
                        } else {
                            warn!("Text for {} exceeded {} bytes; dropped", self.rx_id, MAX_TEXT_LEN);
                            self.reset_rx();
                        }
                    }
                    None => self.check_rx_deadline(),
                }
            }
        }
        Ok(())
    }

    /// Borrows the link mutably and writes one command.
    ///
    /// Enforces that only leaf calls borrow the link to avoid runtime
    /// errors, and conveniently localizes the logging.
    fn send(&mut self, command: Command<'_>) -> Result<(), PanelError> {
        debug!("Command: {}", command);
        let mut link = self.link.borrow_mut();
        link.send(&command.to_bytes())?;
        Ok(())
    }

    /// Sends the probe command and busy-waits for the liveness byte.
    ///
    /// Other bytes read while waiting are consumed and discarded. Gives up
    /// after the receive timeout.
    fn probe(&mut self) -> Result<bool, PanelError> {
        {
            let mut link = self.link.borrow_mut();
            link.send(&Command::Probe.to_bytes())?;
            link.flush()?;
        }
        let started = self.clock.now();
        loop {
            {
                let mut link = self.link.borrow_mut();
                if link.available()? > 0 && link.read_byte()? == PROBE_ACK {
                    return Ok(true);
                }
            }
            if self.clock.now().duration_since(started) > self.rx_timeout {
                return Ok(false);
            }
            self.clock.sleep(PROBE_POLL);
        }
    }

    /// Hands the finished text message to the handler, if one is set.
    fn dispatch_text(&mut self) {
        let body = &self.text_buf[..self.text_len];
        match str::from_utf8(body) {
            Ok(text) => {
                if let Some(handler) = self.on_text.as_mut() {
                    handler(self.rx_id, text);
                }
            }
            Err(_) => debug!("Text for {} is not UTF-8; dropped", self.rx_id),
        }
    }

    /// Abandons the current frame if it has outlived the receive timeout.
    fn check_rx_deadline(&mut self) {
        if let Some(started) = self.frame_started {
            if self.clock.now().duration_since(started) >= self.rx_timeout {
                debug!("Frame timed out after {:?}; resynchronizing", self.rx_timeout);
                self.reset_rx();
            }
        }
    }

    /// Resets the per-message bookkeeping and returns to idle.
    fn reset_rx(&mut self) {
        self.rx_state = RxState::Idle;
        self.rx_has_id = false;
        self.text_len = 0;
        self.frame_started = None;
    }
}

impl Debug for Panel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("link", &self.link)
            .field("default_baud", &self.default_baud)
            .field("connected_baud", &self.connected_baud)
            .field("rx_timeout", &self.rx_timeout)
            .field("rx_state", &self.rx_state)
            .finish_non_exhaustive()
    }
}
