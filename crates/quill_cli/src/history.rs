use rustyline::{history::FileHistory, Editor, Helper};
use std::path::PathBuf;
use tracing::debug;

/// Returns the path to the persistent history file: `~/.quill_history`.
pub fn history_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".quill_history"))
}

/// Load `~/.quill_history` into the editor. A missing or unreadable file is
/// not an error.
pub fn load_history<H: Helper>(rl: &mut Editor<H, FileHistory>) {
    let Some(path) = history_path() else { return };
    if !path.exists() {
        return;
    }
    match rl.load_history(&path) {
        Ok(_) => debug!("Loaded history from {}", path.display()),
        Err(e) => debug!("Could not load history: {}", e),
    }
}

pub fn save_history<H: Helper>(rl: &mut Editor<H, FileHistory>) {
    if let Some(path) = history_path() {
        match rl.save_history(&path) {
            Ok(_) => debug!("Saved history to {}", path.display()),
            Err(e) => debug!("Could not save history: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_path_ends_with_quill_history() {
        if let Some(p) = history_path() {
            assert_eq!(p.file_name().unwrap(), ".quill_history");
        }
    }
}
