//! Well-known tokens shared by the model, the builder and the exporter.
//!
//! Keeping them here avoids scattering magic strings throughout the workspace.

/// Prefix every resource-slot flag token must carry (`-pu0`, `-pu1`, ...).
pub const RESOURCE_FLAG_PREFIX: &str = "-pu";

/// Opening bracket of a template placeholder (`[e1]`).
pub const PLACEHOLDER_OPEN: char = '[';

/// Closing bracket of a template placeholder.
pub const PLACEHOLDER_CLOSE: char = ']';

/// Number of characters between the placeholder brackets.
pub const PLACEHOLDER_LEN: usize = 2;

/// Leading characters a run-variable key may start with (events and scenarios).
pub const RUN_VARIABLE_KINDS: [char; 2] = ['e', 's'];

/// Batch variable holding the engine executable path in the exported command log.
pub const EXE_VARIABLE: &str = "ENGINE_EXE";

/// Batch variable holding the template path in the exported command log.
pub const TEMPLATE_VARIABLE: &str = "TEMPLATE";

/// Returns `true` if `key` is a permitted run-variable key (`e1..e9`, `s1..s9`).
pub fn is_run_variable(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(kind), Some(digit), None) => {
            RUN_VARIABLE_KINDS.contains(&kind) && ('1'..='9').contains(&digit)
        }
        _ => false,
    }
}

/// Returns `true` if `token` is a well-formed resource flag (`-pu` followed by digits).
pub fn is_resource_flag(token: &str) -> bool {
    token
        .strip_prefix(RESOURCE_FLAG_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
