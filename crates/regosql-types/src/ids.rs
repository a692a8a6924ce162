//! Stable error codes.
//!
//! Codes are short snake_case discriminators; they appear in reports and must not change.

// Compile errors
pub const CODE_UNSUPPORTED_OPERATOR: &str = "unsupported_operator";
pub const CODE_UNRECOGNIZED_OPERAND: &str = "unrecognized_operand";
pub const CODE_MALFORMED_COMPARISON: &str = "malformed_comparison";
pub const CODE_UNSUPPORTED_VALUE: &str = "unsupported_value";
pub const CODE_CONFLICTING_BINDING: &str = "conflicting_binding";
pub const CODE_EMPTY_RESIDUAL: &str = "empty_residual";

// Engine errors (passed through from the policy engine)
pub const CODE_ENGINE_ERROR: &str = "engine_error";

/// All compile error codes, in declaration order.
pub const COMPILE_CODES: &[&str] = &[
    CODE_UNSUPPORTED_OPERATOR,
    CODE_UNRECOGNIZED_OPERAND,
    CODE_MALFORMED_COMPARISON,
    CODE_UNSUPPORTED_VALUE,
    CODE_CONFLICTING_BINDING,
    CODE_EMPTY_RESIDUAL,
];
