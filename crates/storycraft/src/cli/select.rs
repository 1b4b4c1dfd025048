//! Scene selection command handler.

use std::path::Path;
use storycraft::{StorageError, StorageErrorKind, StorycraftResult, select_scene_document};

/// Print one scene's prompts and voiceover from a blueprint file.
///
/// An unreadable file is an error; anything readable, including an error
/// document, prints a selection.
pub fn select_scene(path: &Path, index: usize) -> StorycraftResult<()> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    println!("{}", select_scene_document(&json, index));
    Ok(())
}
