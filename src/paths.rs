//! Search-directory resolution.
//!
//! Computes, for a project name, the three directories config files are looked
//! up in. Nothing here touches the filesystem: a directory that doesn't exist
//! is still returned, and the enumerator later finds no files in it. Slots that
//! cannot be computed at all come back as `None`.

use std::path::PathBuf;

use crate::types::SearchDirectories;

/// Subdirectory of the program's own directory that holds bundled config.
pub const INSTALL_CONFIG_SUBDIR: &str = "config";

/// Root of the system-wide config tree on POSIX-like platforms.
pub const SYSTEM_CONFIG_ROOT: &str = "/etc";

/// `std::env::consts::OS` values that have no `/etc`-style config tree.
pub const SYSTEM_CONFIG_DENYLIST: &[&str] = &["", "windows", "uefi", "wasi", "unknown"];

/// Resolve the search directories for `project_name` on the running platform.
pub fn search_directories(project_name: &str) -> SearchDirectories {
    SearchDirectories::new(
        install_config_directory(),
        system_config_directory(project_name),
        home_directory(project_name),
    )
}

/// `<dir of the running program>/config`.
///
/// Falls back to the first command-line argument when the executable path is
/// unavailable, resolving it against the current directory if relative.
pub fn install_config_directory() -> Option<PathBuf> {
    let program = std::env::current_exe().ok().or_else(|| {
        let arg0 = PathBuf::from(std::env::args_os().next()?);
        if arg0.is_absolute() {
            Some(arg0)
        } else {
            std::env::current_dir().ok().map(|cwd| cwd.join(arg0))
        }
    })?;
    let dir = program.parent()?;
    Some(dir.join(INSTALL_CONFIG_SUBDIR))
}

/// `/etc/<project>` on the running platform, `None` where there is no such tree.
pub fn system_config_directory(project_name: &str) -> Option<PathBuf> {
    system_config_directory_for(std::env::consts::OS, project_name)
}

/// Like [`system_config_directory`] but for an explicit OS identifier.
pub fn system_config_directory_for(os: &str, project_name: &str) -> Option<PathBuf> {
    if SYSTEM_CONFIG_DENYLIST.contains(&os) {
        return None;
    }
    let root = PathBuf::from(SYSTEM_CONFIG_ROOT);
    match project_name.trim() {
        "" => Some(root),
        name => Some(root.join(name)),
    }
}

/// `~/.<project>`.
///
/// On Windows the base is the roaming app-data directory rather than the
/// profile directory.
pub fn home_directory(project_name: &str) -> Option<PathBuf> {
    let base = directories::BaseDirs::new()?;
    let root = if cfg!(windows) {
        base.config_dir().to_path_buf()
    } else {
        base.home_dir().to_path_buf()
    };
    Some(with_dotted_project(root, project_name))
}

fn with_dotted_project(root: PathBuf, project_name: &str) -> PathBuf {
    match project_name.trim() {
        "" => root,
        name => root.join(format!(".{name}")),
    }
}
