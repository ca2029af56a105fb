//! Conflict zone star progress.

use crate::models::{NameMap, Snapshot, ZoneDefinitions, ZoneProgress};

/// Star progress of every conflict zone recorded in `snapshot`.
///
/// Zone ids resolve to planet labels through `names`; zones without a
/// definition report no stars.
pub fn zone_progress(
    snapshot: &Snapshot,
    names: &NameMap,
    zones: &ZoneDefinitions,
) -> Vec<ZoneProgress> {
    snapshot
        .document
        .conflict_zone_status
        .iter()
        .map(|zone| {
            let status = &zone.zone_status;
            let label = names.resolve(&status.zone_id);
            let definition = zones.get(label);

            ZoneProgress {
                zone_id: status.zone_id.clone(),
                label: label.to_string(),
                alignment: definition.map(|d| d.alignment.clone()),
                score: status.score,
                stars: definition.map_or(0, |d| d.stars_for(status.score)),
                next_threshold: definition.and_then(|d| d.next_threshold(status.score)),
            }
        })
        .collect()
}
