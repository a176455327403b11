//! Build script for the biosignal sensor firmware
//!
//! Handles:
//! - Memory layout configuration
//! - Platform capability description (`BIOSPEC_PLATFORM`)
//! - Rebuilds when compiled-in device settings change

fn main() {
    // Tell Cargo to re-run this if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Device settings are read with `option_env!` in src/config.rs
    println!("cargo:rerun-if-env-changed=BIOSPEC_DEVICE_NAME");
    println!("cargo:rerun-if-env-changed=BIOSPEC_UPDATE_PASSWORD");

    // Link memory.x from project directory
    println!("cargo:rustc-link-search={}", std::env::var("CARGO_MANIFEST_DIR").unwrap());

    // Resolve the platform name once, here, instead of branching on it in code
    let target = std::env::var("TARGET").unwrap_or_default();
    let platform = if target.starts_with("thumbv7em") {
        "STM32G474"
    } else {
        "host"
    };
    println!("cargo:rustc-env=BIOSPEC_PLATFORM={platform}");
}
