#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fragment;
pub mod iface;
pub mod id;
pub mod peer;
pub mod reassembly;
pub mod run;
pub mod socket;
pub mod tasks;
pub mod timers;
pub mod wire;

pub use config::{load_from_path, Config, Mode};
pub use error::{Result, TunnelError};
pub use run::run;
