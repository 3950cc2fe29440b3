//! Blob keys and file name sanitization.

use crate::error::{BlobError, BlobResult};
use std::fmt;

/// Returns the upload directory of a workspace's images, relative to the
/// upload root.
#[must_use]
pub fn workspace_image_dir(workspace_id: i64) -> String {
    format!("workspace_{workspace_id}/images")
}

/// Makes a client-supplied file name safe to use as a single path component.
///
/// Drops control characters, removes every `..`, and replaces `/`, `\` and
/// `:` with `_`. The result may be empty or a lone `.`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let printable: String = name.chars().filter(|c| !c.is_control()).collect();
    printable
        .replace("..", "")
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// A relative, normalized key naming one stored blob.
///
/// Keys use `/` as separator, never start with `/`, and contain no empty,
/// `.` or `..` components. Keys produced by [`BlobKey::image`] always live
/// under [`workspace_image_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobKey(String);

impl BlobKey {
    /// Builds the key of an image file of a workspace.
    ///
    /// `file_name` must already be sanitized.
    pub fn image(workspace_id: i64, file_name: &str) -> BlobResult<Self> {
        let key = Self::parse(&format!("{}/{}", workspace_image_dir(workspace_id), file_name))?;
        key.ensure_within_workspace(workspace_id)?;
        Ok(key)
    }

    /// Parses and validates a stored key.
    pub fn parse(raw: &str) -> BlobResult<Self> {
        if raw.is_empty() {
            return Err(BlobError::invalid_key(raw, "empty key"));
        }
        if raw.starts_with('/') {
            return Err(BlobError::invalid_key(raw, "absolute key"));
        }
        if raw.contains('\\') || raw.contains(':') {
            return Err(BlobError::invalid_key(raw, "platform-specific separator"));
        }
        if raw.chars().any(char::is_control) {
            return Err(BlobError::invalid_key(raw, "control character"));
        }
        for component in raw.split('/') {
            match component {
                "" => return Err(BlobError::invalid_key(raw, "empty component")),
                "." | ".." => return Err(BlobError::invalid_key(raw, "relative component")),
                _ => {}
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns true if the key lives directly inside the workspace's image
    /// directory.
    #[must_use]
    pub fn is_within_workspace(&self, workspace_id: i64) -> bool {
        let dir = workspace_image_dir(workspace_id);
        match self.0.strip_prefix(&dir) {
            Some(rest) => rest.len() > 1 && rest.starts_with('/') && !rest[1..].contains('/'),
            None => false,
        }
    }

    /// Fails unless the key lives inside the workspace's image directory.
    pub fn ensure_within_workspace(&self, workspace_id: i64) -> BlobResult<()> {
        if self.is_within_workspace(workspace_id) {
            Ok(())
        } else {
            Err(BlobError::OutsideWorkspace {
                key: self.0.clone(),
                workspace_id,
            })
        }
    }

    /// Returns the key's components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Returns the last component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
