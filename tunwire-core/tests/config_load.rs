use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tunwire_core::load_from_path;

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_nanos();
    std::env::temp_dir().join(format!("tunwire-{nanos}-{name}.json"))
}

#[test]
fn loads_minimal_client_config() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = tmp_path("minimal");
    let body = r#"{
        "dev": "tun0",
        "mode": "tun",
        "remote": "10.0.0.2:5000",
        "max_pay": 1400,
        "key": "000102030405060708090a0b0c0d0e0f"
    }"#;
    fs::write(&path, body)?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.dev, "tun0");
    assert_eq!(cfg.remote.unwrap().to_string(), "10.0.0.2:5000");
    assert_eq!(cfg.max_pay, 1400);
    assert_eq!(cfg.key.len(), 16);
    assert_eq!(cfg.hello_secs, 0);
    assert_eq!(cfg.log_down_secs, 0);
    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn loads_server_config_with_hello_and_comments() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = tmp_path("server");
    let body = r#"{
        # server mode: no remote configured, learned from traffic
        "dev": "tap0",
        "mode": "tap",
        "local": "0.0.0.0:5000",
        "max_pay": 1000,
        "key": "101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e2f",
        "hello_secs": 10,
        "log_down_secs": 30
    }"#;
    fs::write(&path, body)?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.dev, "tap0");
    assert!(cfg.remote.is_none());
    assert_eq!(cfg.key.len(), 32);
    assert_eq!(cfg.hello_secs, 10);
    assert_eq!(cfg.log_down_secs, 30);
    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn rejects_config_with_no_addresses() {
    let path = tmp_path("no-address");
    let body = r#"{
        "dev": "tun0",
        "mode": "tun",
        "max_pay": 1400,
        "key": "000102030405060708090a0b0c0d0e0f"
    }"#;
    fs::write(&path, body).unwrap();

    assert!(load_from_path(&path).is_err());
    fs::remove_file(&path).ok();
}
