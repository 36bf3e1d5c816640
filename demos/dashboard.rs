use std::cell::RefCell;
use std::env;
use std::error::Error;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use touchlink::{Panel, SerialLink, VarId};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: dashboard <serial_port> [baud]");
        println!();
        println!("serial_port should be a port name like /dev/ttyUSB0 or COM3");
        println!("baud defaults to 115200");
        return Ok(());
    }

    let baud = if args.len() > 2 { args[2].parse()? } else { 115_200 };

    let link = Rc::new(RefCell::new(SerialLink::new(&args[1])));
    let mut panel = Panel::new(link);

    if !panel.connect(baud)? {
        return Err("display did not answer at the target or default rate".into());
    }
    println!("Connected at {} baud", baud);

    panel.set_int_handler(|id, value| println!("{} = {}", id, value));
    panel.set_text_handler(|id, text| println!("{} = {:?}", id, text));

    // Publish a counter into va0 and let the display's refresh timer
    // show it, while echoing any touch-driven updates it sends back.
    let mut count = 0;
    loop {
        panel.set_int(VarId(0), count)?;
        panel.request_update()?;
        count += 1;

        for _ in 0..100 {
            panel.poll()?;
            thread::sleep(Duration::from_millis(10));
        }
    }
}
