//! Build script for mculab-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lab.toml at compile time
//! - Encodes the validated configuration as a postcard image for the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mculab_core::config::{ConfigError, Exercise, LabConfig};

/// Top-level keys `lab.toml` may contain
const KNOWN_KEYS: &[&str] = &[
    "version",
    "exercise",
    "clock",
    "uart",
    "pins",
    "waveform_hz",
    "lcd_bus",
    "lcd_lines",
    "counter_hold_ms",
    "counter_flash",
    "fixed_pattern",
    "button_rotate",
    "buzzer_mode",
    "adc_layout",
    "adc_vref_mv",
    "device_name",
];

fn main() {
    setup_linker();
    let config = validate_config();
    write_image(&config);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = out_dir();

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x in OUT_DIR");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn out_dir() -> PathBuf {
    PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"))
}

/// Check lab.toml and return the configuration it describes
fn validate_config() -> LabConfig {
    println!("cargo:rerun-if-changed=lab.toml");

    let config_path = Path::new("lab.toml");
    if !config_path.exists() {
        fail(
            "lab.toml not found",
            &[
                "The firmware requires a lab.toml configuration file".into(),
                "in the mculab-firmware directory.".into(),
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read lab.toml", &[e.to_string()]),
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in lab.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    validate_keys(&value);

    let config: LabConfig = match value.try_into() {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid value in lab.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    if let Err(e) = config.validate() {
        fail("Invalid lab configuration", &[describe(&config, e)]);
    }

    println!(
        "cargo:warning=lab.toml validated: exercise '{}'",
        config.exercise.name()
    );
    config
}

/// Required and unknown keys, and the exercise name
fn validate_keys(value: &toml::Value) {
    let mut errors = Vec::new();

    let Some(table) = value.as_table() else {
        fail("lab.toml must be a table", &[]);
    };

    match table.get("exercise") {
        Some(toml::Value::String(name)) => {
            if Exercise::from_name(name).is_err() {
                errors.push(format!("unknown exercise '{}'", name));
                errors.push(format!(
                    "expected one of: {}",
                    Exercise::ALL.map(|e| e.name()).join(", ")
                ));
            }
        }
        Some(_) => errors.push("'exercise' must be a string".into()),
        None => errors.push("missing 'exercise'".into()),
    }

    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            errors.push(format!("unknown key '{}'", key));
        }
    }

    if let Some(toml::Value::Integer(hz)) = table.get("waveform_hz") {
        if *hz <= 0 {
            errors.push("waveform_hz must be positive".into());
        }
    }

    if let Some(toml::Value::Integer(ms)) = table.get("counter_hold_ms") {
        if *ms <= 0 {
            errors.push("counter_hold_ms must be positive".into());
        }
    }

    if !errors.is_empty() {
        fail("Invalid lab.toml", &errors);
    }
}

fn describe(config: &LabConfig, error: ConfigError) -> String {
    let exercise = config.exercise.name();
    match error {
        ConfigError::UnknownExercise => "unknown exercise".into(),
        ConfigError::InvalidPin(pin) => {
            format!("pin {} is out of range or unusable for '{}'", pin, exercise)
        }
        ConfigError::DuplicatePin(pin) => format!("pin {} is used twice by '{}'", pin, exercise),
        ConfigError::InvalidFrequency => "waveform_hz is zero or unreachable".into(),
        ConfigError::InvalidTiming => {
            "a hold time, reference voltage or baud rate is zero or unreachable".into()
        }
    }
}

/// Encode the configuration for `include_bytes!`
fn write_image(config: &LabConfig) {
    let image = match postcard::to_stdvec(config) {
        Ok(image) => image,
        Err(e) => fail("Failed to encode lab configuration", &[e.to_string()]),
    };
    let path = out_dir().join("lab.bin");
    fs::write(&path, image).expect("write lab.bin");
}

/// Abort the build with a boxed message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
