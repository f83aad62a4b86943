//! `tenacious config` – show config path and effective values.

use anyhow::Result;
use tenacious_core::config::{self, TenaciousConfig};

pub fn run_config(cfg: &TenaciousConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml_string()?);
    Ok(())
}
