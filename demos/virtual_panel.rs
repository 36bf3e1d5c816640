use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use touchlink::{Panel, VarId};
use touchlink_testing::VirtualPanel;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // A virtual display stands in for real hardware.
    // To control a real display you would use SerialLink instead.
    let link = Rc::new(RefCell::new(VirtualPanel::new(9600)));
    let mut panel = Panel::new(link.clone());

    // The virtual display wakes at the factory rate, so this exercises
    // the full fallback-and-reprogram leg of the handshake.
    if !panel.connect(115_200)? {
        return Err("virtual display did not answer".into());
    }

    panel.set_int_handler(|id, value| println!("display set {} to {}", id, value));

    panel.set_int(VarId(0), 42)?;
    panel.set_text(VarId(1), "hello")?;
    panel.request_update()?;

    // Simulate the display reporting a touch-driven change back.
    link.borrow_mut().push_int(VarId(0), 43);
    for _ in 0..10 {
        panel.poll()?;
    }

    println!("Commands the display received:");
    for command in link.borrow().commands() {
        println!("  {}", command);
    }

    Ok(())
}
