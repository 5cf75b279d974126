//! Placement records and topmost-placement resolution.
//!
//! # Responsibilities
//! - Model one content-on-page placement row
//! - Decide, per page, which single plugin instance is topmost in the
//!   primary layout region
//! - Resolve the effective controller/action of that instance from its
//!   configuration blob, falling back to registry defaults
//!
//! # Design Decisions
//! - Records arrive pre-filtered and pre-sorted by ordering key ascending;
//!   the first registered record per page wins
//! - A blob that fails to flatten counts as absent (fail open)
//! - A controller switch without the `->` separator counts as absent

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flexform;
use crate::registry::snapshot::RegistrySnapshot;

/// Separator between controller and action in a controller switch setting.
const CONTROLLER_ACTION_SEPARATOR: &str = "->";

/// One content-on-page row, sourced externally and read-only here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    /// Page the content lives on.
    pub page_id: u64,

    /// Plugin signature of the placed content element.
    pub signature: String,

    /// Ordering key within the layout region, lower is topmost.
    pub sorting: i64,

    /// Optional structured configuration blob attached to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flexform: Option<Value>,
}

/// Page ids on which the given plugin's controller/action is the topmost
/// placement in the primary layout region.
///
/// Selection runs in record order (ascending ordering key): the first record
/// per page whose signature belongs to any registered plugin claims that
/// page; later records for the same page are ignored. The surviving record's
/// effective controller/action comes from its configuration blob when it
/// carries a usable controller switch, otherwise from the plugin's first
/// declared controller and action.
pub fn pages_for_action(
    records: &[PlacementRecord],
    registry: &RegistrySnapshot,
    extension: &str,
    plugin: &str,
    controller: &str,
    action: &str,
    target_signature: &str,
    registered_signatures: &[String],
) -> Vec<u64> {
    let mut topmost: IndexMap<u64, &PlacementRecord> = IndexMap::new();
    for record in records {
        if !registered_signatures.contains(&record.signature) {
            continue;
        }
        topmost.entry(record.page_id).or_insert(record);
    }

    let mut pages = Vec::new();
    for (page_id, record) in topmost {
        let (effective_controller, effective_action) =
            match effective_controller_action(record, registry, extension, plugin) {
                Some(pair) => pair,
                None => continue,
            };
        if record.signature == target_signature
            && effective_controller == controller
            && effective_action == action
        {
            pages.push(page_id);
        }
    }
    pages
}

/// Resolve the controller/action a placement record is configured for.
fn effective_controller_action(
    record: &PlacementRecord,
    registry: &RegistrySnapshot,
    extension: &str,
    plugin: &str,
) -> Option<(String, String)> {
    if let Some(blob) = &record.flexform {
        let settings = flexform::flatten(blob);
        if let Some(Value::String(switch)) = settings.get("switchableControllerActions") {
            if let Some((controller, action)) = switch.split_once(CONTROLLER_ACTION_SEPARATOR) {
                return Some((controller.to_string(), action.to_string()));
            }
            tracing::debug!(
                page_id = record.page_id,
                switch = switch.as_str(),
                "Controller switch without separator, using registry default"
            );
        }
    }
    registry
        .default_controller_action(extension, plugin)
        .map(|(controller, action)| (controller.to_string(), action.to_string()))
}
