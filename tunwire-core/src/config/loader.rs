use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{Result, TunnelError};
use crate::fragment::MAX_FRAGMENTS;
use crate::wire::{align_up, HEADER_LEN, IO_BUF_LEN};

/// Strips `#`-prefixed comment lines, blanking rather than removing them so
/// line numbers in JSON parse errors still point at the original file.
fn strip_comments(txt: &str) -> String {
    txt.lines()
        .map(|line| if line.trim_start().starts_with('#') { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let path = p.as_ref();
    let txt = fs::read_to_string(path)
        .map_err(|e| TunnelError::Config(format!("failed to read {}: {e}", path.display())))?;

    let stripped = strip_comments(&txt);
    let cfg: Config = serde_json::from_str(&stripped)
        .map_err(|e| TunnelError::Config(format!("{}:{}: {e}", path.display(), e.line())))?;

    validate_config(&cfg)?;
    Ok(cfg)
}

/// `IFNAMSIZ` on Linux: the kernel's hard limit on interface names,
/// including the terminating NUL it appends.
const IFNAMSIZ: usize = 16;

fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.dev.is_empty() || cfg.dev.len() >= IFNAMSIZ {
        return Err(TunnelError::Config(format!(
            "dev name {:?} must be 1..{} bytes",
            cfg.dev, IFNAMSIZ
        )));
    }

    if cfg.max_pay == 0 {
        return Err(TunnelError::Config("max_pay must be greater than 0".into()));
    }

    // A single TUN/TAP read can be up to IO_BUF_LEN bytes; the fragmenter
    // needs ceil(n / max_pay) <= 255 (FragNum is a u8, 0 reserved for hello)
    // for every reachable n, so max_pay must clear IO_BUF_LEN / 255.
    let min_max_pay = IO_BUF_LEN.div_ceil(MAX_FRAGMENTS);
    if cfg.max_pay < min_max_pay {
        return Err(TunnelError::Config(format!(
            "max_pay {} is too small: a {}-byte read would need more than {} fragments",
            cfg.max_pay, IO_BUF_LEN, MAX_FRAGMENTS
        )));
    }

    match cfg.key.len() {
        16 | 24 | 32 => {}
        n => {
            return Err(TunnelError::Config(format!(
                "key must decode to 16, 24, or 32 bytes, got {n}"
            )))
        }
    }

    if cfg.local.is_none() && cfg.remote.is_none() {
        return Err(TunnelError::Config(
            "at least one of local/remote must be set".into(),
        ));
    }

    let framed = align_up(HEADER_LEN + cfg.max_pay);
    if framed > IO_BUF_LEN {
        return Err(TunnelError::Config(format!(
            "max_pay {} produces a {}-byte frame, exceeding the {}-byte I/O buffer",
            cfg.max_pay, framed, IO_BUF_LEN
        )));
    }

    Ok(())
}
