use crate::resolver::InstanceFilter;

pub const MISSING_PROJECT_MESSAGE: &str = "--project must be set unless --force is given";

/// Mutating commands refuse to run fleet-wide unless a project is named or
/// the caller forces it.
pub fn project_or_force(filter: &InstanceFilter, force: bool) -> bool {
    filter.project().is_some() || force
}
