use std::collections::BTreeMap;

use crate::errors::LoadError;
use crate::record::MeshRotationRecord;

/// Apply format migrations from `from_version` to `to_version`, one version
/// step at a time.
pub fn migrate(
    entries: BTreeMap<String, MeshRotationRecord>,
    from_version: u32,
    to_version: u32,
) -> Result<BTreeMap<String, MeshRotationRecord>, LoadError> {
    // Version 1 is the first published format; nothing older can be read.
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!("no migration path from v{from_version} to v{to_version}"),
        });
    }
    Ok(entries)
}
