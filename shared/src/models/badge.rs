//! Badge Model

use serde::Serialize;

/// Badge definition (static catalog entry)
///
/// Only slugs are stored per-user; the full catalog is compiled-in constant
/// data in the engine crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_path: &'static str,
}
