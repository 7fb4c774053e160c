use std::{fs, io, path::PathBuf};

/// Storage for named script snippets.
///
/// The interpreter core never persists anything; hosts use a store to
/// feed source text in and to keep what the user wrote. Identifiers are
/// free-form names chosen by the host.
pub trait SnippetStore {
    /// Saves `source` under `id`, replacing any previous snippet.
    ///
    /// # Errors
    /// Returns an I/O error when the backing storage rejects the write.
    fn save_snippet(&mut self, id: &str, source: &str) -> io::Result<()>;

    /// Loads the snippet saved under `id`; missing snippets load as the
    /// empty string.
    ///
    /// # Errors
    /// Returns an I/O error when the backing storage cannot be read.
    fn load_snippet(&self, id: &str) -> io::Result<String>;
}

/// A snippet store backed by one file per snippet inside a directory.
#[derive(Debug, Clone)]
pub struct DirSnippetStore {
    root: PathBuf,
}

impl DirSnippetStore {
    /// Creates a store rooted at `root`. The directory is created lazily
    /// on the first save.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // Snippet ids become file names; path separators are flattened so
        // an id cannot escape the store directory.
        let safe: String = id.chars()
                             .map(|c| if c == '/' || c == '\\' { '_' } else { c })
                             .collect();
        self.root.join(format!("{safe}.bq"))
    }
}

impl SnippetStore for DirSnippetStore {
    fn save_snippet(&mut self, id: &str, source: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(id), source)
    }

    fn load_snippet(&self, id: &str) -> io::Result<String> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(source) => Ok(source),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(error) => Err(error),
        }
    }
}
