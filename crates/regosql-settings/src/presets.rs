use regosql_domain::policy::{DuplicateColumns, EmptyResidual, LiteralStyle};

/// Compile policy knobs before an unknown collection is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub profile: String,
    pub empty_residual: EmptyResidual,
    pub duplicate_columns: DuplicateColumns,
    pub literal_style: LiteralStyle,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything else goes into repo config.
pub fn preset(profile: &str) -> Option<Preset> {
    match profile {
        "strict" => Some(strict_profile()),
        "compat" => Some(compat_profile()),
        _ => None,
    }
}

fn strict_profile() -> Preset {
    Preset {
        profile: "strict".to_string(),
        empty_residual: EmptyResidual::Deny,
        duplicate_columns: DuplicateColumns::RejectConflicts,
        literal_style: LiteralStyle::Rego,
    }
}

fn compat_profile() -> Preset {
    // Repeated columns overwrite each other in the bindings, like a plain map assignment.
    Preset {
        profile: "compat".to_string(),
        empty_residual: EmptyResidual::Deny,
        duplicate_columns: DuplicateColumns::LastWins,
        literal_style: LiteralStyle::Rego,
    }
}
