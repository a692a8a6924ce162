//! Fuzz target for `regosql.toml` parsing and resolution.
//!
//! Goal: The parser and resolver should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_toml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(cfg) = regosql_settings::parse_config_toml(text) {
            let _ = regosql_settings::resolve_config(cfg, regosql_settings::Overrides::default());
        }
    }
});
