//! Authentication example
//!
//! Enrolls a finger, keeps the template in an in-memory store, then asks
//! for the same finger again and verifies it on-device.

use r307::{Device, MemoryStore, SerialConfig, TemplateStore};

fn main() -> r307::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::open(&SerialConfig::new(port))?;
    let mut store = MemoryStore::new();

    println!("Enrolling: place finger on the sensor...");
    let template = device.enroll("alice")?;
    store.save("alice", &template).expect("memory store is infallible");

    println!("Now authenticate: place the same finger again...");
    let stored = store.load("alice").expect("memory store is infallible").unwrap();
    let outcome = device.authenticate("alice", &stored)?;

    if outcome.matched {
        println!("Welcome, alice! (confidence {})", outcome.confidence);
    } else {
        println!("Access denied");
    }

    Ok(())
}
