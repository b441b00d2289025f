//! Enrollment example
//!
//! Captures a fingerprint from the sensor and prints the template that a
//! real application would hand to its storage layer.

use r307::{Device, SerialConfig};

fn main() -> r307::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let user = std::env::var("SENSOR_USER").unwrap_or_else(|_| "alice".to_string());

    let mut device = Device::open(&SerialConfig::new(port))?;

    println!("Place finger on the sensor...");
    let template = device.enroll(&user)?;

    println!(
        "Enrolled {}: {} byte template, first bytes {}",
        user,
        template.len(),
        hex::encode(&template.as_bytes()[..8])
    );

    Ok(())
}
