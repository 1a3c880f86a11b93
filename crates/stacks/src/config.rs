//! Library configuration.
//!
//! A [`Config`] names the library root; everything else (archive, shelves,
//! bookmarks) is derived from it. Configuration is loaded from a TOML file
//! and passed explicitly into [`Archive::open`](crate::Archive::open) — there
//! is no global, implicitly discovered state.
//!
//! ```toml
//! # ~/.config/stacks/config.toml
//! library = "~/library"
//! ```

use super::*;

/// Location of the library and its derived directories.
///
/// The library root contains three subdirectories:
///
/// - `archive/` — one directory per archived key
/// - `shelves/` — user-curated symlink collections
/// - `bookmarks/` — symlinks created by [`Bookmark`](crate::archive::Bookmark)
///
/// # Examples
///
/// ```
/// use stacks::Config;
///
/// let config = Config::default().with_library("/tmp/library");
/// assert!(config.archive().ends_with("library/archive"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  /// Root directory of the library.
  library: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      library: dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")).join("library"),
    }
  }
}

impl Config {
  /// Loads configuration from a TOML file, expanding a leading `~` in the
  /// library path.
  ///
  /// # Errors
  ///
  /// Returns [`StacksError::Io`] if the file cannot be read and
  /// [`StacksError::TomlDe`] if it is not valid TOML.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let content = fs::read_to_string(path.as_ref())?;
    let mut config: Config = toml::from_str(&content)?;
    config.library = expand_tilde(&config.library);
    Ok(config)
  }

  /// Returns the default path for the configuration file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.config/stacks/config.toml`
  /// - On macOS: `~/Library/Application Support/stacks/config.toml`
  /// - On Windows: `%APPDATA%\stacks\config.toml`
  /// - Fallback: `./config.toml` in the current directory
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("stacks").join("config.toml")
  }

  /// Sets the library root.
  pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
    self.library = library.into();
    self
  }

  /// Root directory of the library.
  pub fn library(&self) -> &Path { &self.library }

  /// Directory holding one subdirectory per archived key.
  pub fn archive(&self) -> PathBuf { self.library.join("archive") }

  /// Directory holding user-curated symlink collections.
  pub fn shelves(&self) -> PathBuf { self.library.join("shelves") }

  /// Directory holding bookmark symlinks.
  pub fn bookmarks(&self) -> PathBuf { self.library.join("bookmarks") }
}

/// Expands a leading `~` or `~/` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let Some(home) = dirs::home_dir() else { return path.to_path_buf() };
  match path.strip_prefix("~") {
    Ok(rest) if rest.as_os_str().is_empty() => home,
    Ok(rest) => home.join(rest),
    Err(_) => path.to_path_buf(),
  }
}
