use std::fs;
use std::path::PathBuf;

/// Source of the optional bearer token. Attachment is best-effort: a
/// provider returning `None` never fails the request, it just goes out
/// without an `Authorization` header.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Provider for unauthenticated use.
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Fixed token handed in at construction, e.g. from a CLI flag.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Token persisted in a local file at a fixed path, read fresh on every
/// request.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        FileTokenStore { path }
    }

    /// Conventional location: `<config dir>/mathdash/auth_token`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mathdash").join("auth_token"))
    }
}

impl TokenProvider for FileTokenStore {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }
}
