use std::path::{Path, PathBuf};

use super::APP_NAME;

/// Name of the asset directory shipped next to the executable
pub const ASSET_DIR_NAME: &str = "assets";

/// Resolve where textures and cue files live.
///
/// Order: explicit path, `assets/` beside the executable, then the platform
/// data directory (`<data>/erfx`).
pub fn resolve_asset_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ASSET_DIR_NAME)));
    if let Some(dir) = beside_exe.filter(|dir| dir.is_dir()) {
        return Some(dir);
    }

    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}
