//! Loads node configuration from an optional `.env` file and, when building
//! for the RP2040, puts `memory.x` on the linker search path.
//!
//! Configuration values end up as compile-time constants (see
//! `src/common/config.rs`); nothing is read at runtime.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

const CONFIG_KEYS: [&str; 5] = ["WIFI_SSID", "WIFI_PASSWORD", "SERVER_URL", "DEVICE_ID", "ZONE"];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    if let Ok(env_path) = dotenvy::dotenv() {
        println!("cargo:warning=Loaded config from {:?}", env_path);
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }

    // Host builds (tests) need none of the linker setup below.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
