use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/flinch`, or the platform local data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("flinch"))
        } else {
            ProjectDirs::from("", "", "flinch")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("flinch.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lives_in_state_dir() {
        if let (Some(dir), Some(log)) = (AppDirs::state_dir(), AppDirs::log_path()) {
            assert_eq!(log.parent(), Some(dir.as_path()));
            assert_eq!(log.file_name().and_then(|n| n.to_str()), Some("flinch.log"));
        }
    }
}
