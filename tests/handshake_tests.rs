use std::cell::RefCell;
use std::rc::Rc;

use touchlink::Panel;
use touchlink_testing::{FakeClock, VirtualPanel};

fn harness(device_baud: u32, default_baud: u32) -> (Rc<RefCell<VirtualPanel>>, FakeClock, Panel) {
    let link = Rc::new(RefCell::new(VirtualPanel::new(device_baud)));
    let clock = FakeClock::new();
    let panel = Panel::with_clock(link.clone(), default_baud, Box::new(clock.clone()));
    (link, clock, panel)
}

#[test]
fn connect_succeeds_when_display_already_at_target_rate() {
    // A controller-side restart: the display kept its programmed rate.
    let (link, _clock, mut panel) = harness(115_200, 9600);

    assert!(panel.connect(115_200).unwrap());
    assert_eq!(Some(115_200), panel.baud());

    let link = link.borrow();
    // The cheap path: one probe, no fallback, no reprogramming.
    assert_eq!(link.commands(), ["printh AA"]);
    assert_eq!(0, link.garbage_bytes());
}

#[test]
fn connect_falls_back_and_reprograms_the_display() {
    // Both sides freshly powered: the display wakes at the factory rate.
    let (link, _clock, mut panel) = harness(9600, 9600);

    assert!(panel.connect(115_200).unwrap());
    assert_eq!(Some(115_200), panel.baud());

    let link = link.borrow();
    // The target-rate probe arrived as garbage, then the default-rate
    // leg probed, issued exactly one baud change, and confirmed it.
    assert!(link.garbage_bytes() > 0);
    assert_eq!(link.commands(), ["printh AA", "baud=115200", "printh AA"]);
    assert_eq!(1, link.commands().iter().filter(|c| c.starts_with("baud=")).count());
    assert_eq!(115_200, link.device_baud());
}

#[test]
fn connect_fails_when_no_display_answers() {
    // The display sits at a rate the controller never tries.
    let (link, _clock, mut panel) = harness(4800, 19_200);

    assert!(!panel.connect(115_200).unwrap());
    assert_eq!(None, panel.baud());

    let link = link.borrow();
    assert!(link.commands().is_empty());
    assert!(link.garbage_bytes() > 0);
    // The display was never reprogrammed.
    assert_eq!(4800, link.device_baud());
}

#[test]
fn probe_discards_noise_while_waiting_for_the_ack() {
    let (link, _clock, mut panel) = harness(115_200, 9600);
    link.borrow_mut().push_raw(&[0x12]);

    assert!(panel.connect(115_200).unwrap());
}

#[test]
fn connect_with_target_equal_to_default_rate() {
    let (link, _clock, mut panel) = harness(9600, 9600);

    assert!(panel.connect(9600).unwrap());
    assert_eq!(Some(9600), panel.baud());

    let link = link.borrow();
    assert_eq!(link.commands(), ["printh AA"]);
    assert_eq!(9600, link.device_baud());
}
