//! Edge-triggered up/down reporting based on receive-idle time (spec.md
//! §4.7). Disabled entirely when `log_down_secs == 0`.

use std::time::Duration;

use tracing::{info, warn};

use crate::timers::Timers;

#[derive(PartialEq, Eq)]
enum LinkState {
    Up,
    Down,
}

pub async fn run(timers: Timers, log_down: Duration) -> ! {
    timers.seed_recv_as_down_for(log_down);
    // No prior state: the first check always logs, matching the seeded
    // "down until proven otherwise" starting assumption.
    let mut state: Option<LinkState> = None;

    loop {
        let idle = timers.since_recv();
        if idle >= log_down {
            if state != Some(LinkState::Down) {
                warn!("remote is down");
                state = Some(LinkState::Down);
            }
            tokio::time::sleep(log_down / 4).await;
        } else {
            if state != Some(LinkState::Up) {
                info!("remote is up");
                state = Some(LinkState::Up);
            }
            tokio::time::sleep(log_down - idle).await;
        }
    }
}
