use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Put `memory.x` where the linker can find it (firmware targets only
    // use it, but copying is harmless on the host)
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    // Read gauge configuration from environment variables (optional)
    // These become compile-time defaults in core::config

    // Log file name on the SD card (8.3 name)
    if let Ok(name) = env::var("GAUGE_LOG_FILE") {
        println!("cargo:rustc-env=GAUGE_LOG_FILE={}", name);
        println!("cargo:warning=Using GAUGE_LOG_FILE from environment: {}", name);
    } else {
        println!("cargo:rustc-env=GAUGE_LOG_FILE=DATALOG.CSV");
    }

    // Distance samples taken per wake cycle
    if let Ok(samples) = env::var("GAUGE_SAMPLES") {
        println!("cargo:rustc-env=GAUGE_SAMPLES={}", samples);
        println!("cargo:warning=Using GAUGE_SAMPLES from environment: {}", samples);
    } else {
        println!("cargo:rustc-env=GAUGE_SAMPLES=5");
    }

    // Gap between consecutive samples in milliseconds
    if let Ok(gap) = env::var("GAUGE_SAMPLE_GAP_MS") {
        println!("cargo:rustc-env=GAUGE_SAMPLE_GAP_MS={}", gap);
        println!(
            "cargo:warning=Using GAUGE_SAMPLE_GAP_MS from environment: {}",
            gap
        );
    } else {
        println!("cargo:rustc-env=GAUGE_SAMPLE_GAP_MS=60");
    }

    // Build timestamp, used to restore the RTC after battery loss.
    // Overridable for reproducible builds.
    if let Ok(unix) = env::var("GAUGE_BUILD_UNIX") {
        println!("cargo:rustc-env=GAUGE_BUILD_UNIX={}", unix);
        println!("cargo:warning=Using GAUGE_BUILD_UNIX from environment: {}", unix);
    } else {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        println!("cargo:rustc-env=GAUGE_BUILD_UNIX={}", now);
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=GAUGE_LOG_FILE");
    println!("cargo:rerun-if-env-changed=GAUGE_SAMPLES");
    println!("cargo:rerun-if-env-changed=GAUGE_SAMPLE_GAP_MS");
    println!("cargo:rerun-if-env-changed=GAUGE_BUILD_UNIX");
}
