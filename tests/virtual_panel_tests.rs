use touchlink::core::Command;
use touchlink::{Link, VarId};
use touchlink_testing::{VirtualPanel, VirtualPanelError};

#[test]
fn commands_split_across_writes_are_reassembled() {
    let mut panel = VirtualPanel::new(9600);
    panel.open(9600).unwrap();

    panel.send(b"var.va1.val=4").unwrap();
    panel.send(b"2\xFF\xFF\xFF").unwrap();

    assert_eq!(panel.commands(), ["var.va1.val=42"]);
}

#[test]
fn multiple_commands_in_one_write() {
    let mut panel = VirtualPanel::new(9600);
    panel.open(9600).unwrap();

    let mut bytes = Command::SetInt(VarId(1), 1).to_bytes();
    bytes.extend(Command::Refresh.to_bytes());
    panel.send(&bytes).unwrap();

    assert_eq!(panel.commands(), ["var.va1.val=1", "tm0.en=1"]);
}

#[test]
fn probe_is_answered_only_when_rates_match() {
    let mut panel = VirtualPanel::new(9600);

    panel.open(115_200).unwrap();
    panel.send(&Command::Probe.to_bytes()).unwrap();
    assert_eq!(0, panel.available().unwrap());
    assert!(panel.garbage_bytes() > 0);

    panel.close().unwrap();
    panel.open(9600).unwrap();
    // Without a purge, the first properly rated command is glued to the
    // stale garbage and lost with it.
    panel.send(&Command::Probe.to_bytes()).unwrap();
    assert_eq!(0, panel.available().unwrap());
    assert!(panel.commands().is_empty());

    // The next one goes through.
    panel.send(&Command::Probe.to_bytes()).unwrap();
    assert_eq!(1, panel.available().unwrap());
    assert_eq!(panel.commands(), ["printh AA"]);
}

#[test]
fn bare_sentinel_purges_stale_garbage() {
    use touchlink::core::SENTINEL;

    let mut panel = VirtualPanel::new(9600);
    panel.open(115_200).unwrap();
    panel.send(&Command::Probe.to_bytes()).unwrap();

    panel.close().unwrap();
    panel.open(9600).unwrap();
    panel.send(&SENTINEL).unwrap();

    // The purge sacrificed itself; the probe is parsed cleanly.
    panel.send(&Command::Probe.to_bytes()).unwrap();
    assert_eq!(1, panel.available().unwrap());
    assert_eq!(panel.commands(), ["printh AA"]);
}

#[test]
fn baud_command_reprograms_the_panel() {
    let mut panel = VirtualPanel::new(9600);
    panel.open(9600).unwrap();

    panel.send(&Command::SetBaud(19_200).to_bytes()).unwrap();
    assert_eq!(19_200, panel.device_baud());

    // The controller is still at the old rate, so further traffic is
    // garbage until it follows along.
    panel.send(&Command::Probe.to_bytes()).unwrap();
    assert_eq!(0, panel.available().unwrap());
    assert!(panel.garbage_bytes() > 0);
}

#[test]
fn pushed_int_frame_has_the_wire_layout() {
    let mut panel = VirtualPanel::new(9600);
    panel.push_int(VarId(5), 42);

    let mut bytes = Vec::new();
    while panel.available().unwrap() > 0 {
        bytes.push(panel.read_byte().unwrap());
    }
    assert_eq!(vec![b'I', 0x05, 0x2A, 0x00, 0x00, 0x00, 0x00], bytes);
}

#[test]
fn pushed_negative_int_frame_is_little_endian() {
    let mut panel = VirtualPanel::new(9600);
    panel.push_int(VarId(1), -2);

    let mut bytes = Vec::new();
    while panel.available().unwrap() > 0 {
        bytes.push(panel.read_byte().unwrap());
    }
    assert_eq!(vec![b'I', 0x01, 0xFE, 0xFF, 0xFF, 0xFF, 0x00], bytes);
}

#[test]
fn pushed_text_frame_has_the_wire_layout() {
    let mut panel = VirtualPanel::new(9600);
    panel.push_text(VarId(7), "hi");

    let mut bytes = Vec::new();
    while panel.available().unwrap() > 0 {
        bytes.push(panel.read_byte().unwrap());
    }
    assert_eq!(vec![b'T', 0x07, b'h', b'i', 0x00], bytes);
}

#[test]
fn reading_past_the_queue_is_an_error() {
    let mut panel = VirtualPanel::new(9600);

    let error = panel.read_byte().unwrap_err();
    assert_eq!(
        Some(&VirtualPanelError::ReadUnderrun),
        error.downcast_ref::<VirtualPanelError>()
    );
}

#[test]
fn open_and_close_are_tracked() {
    let mut panel = VirtualPanel::new(9600);
    assert_eq!(None, panel.link_baud());

    panel.open(57_600).unwrap();
    assert_eq!(Some(57_600), panel.link_baud());

    panel.close().unwrap();
    assert_eq!(None, panel.link_baud());

    // The panel's own rate is unaffected by the controller's side.
    assert_eq!(9600, panel.device_baud());
}
