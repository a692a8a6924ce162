//! Fuzz target for residual decoding and compilation.
//!
//! Goal: decoding and compiling should **never panic** on any input.
//! Both may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_residual_decode
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use regosql_domain::{
    CompileConfig, DuplicateColumns, EmptyResidual, LiteralStyle, UnknownCollection,
    compile_residual,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(residual) = regosql_opa::decode_compile_response(text) else {
        return;
    };
    let Ok(users) = UnknownCollection::parse("data.users") else {
        return;
    };

    let mut cfg = CompileConfig::new(users);
    let _ = compile_residual(&residual, &cfg);

    cfg.duplicate_columns = DuplicateColumns::LastWins;
    cfg.empty_residual = EmptyResidual::Reject;
    cfg.literal_style = LiteralStyle::Sql;
    let _ = compile_residual(&residual, &cfg);
});
