/// Suffixes of build artifacts that are never offered for picking
const DEFAULT_IGNORED_SUFFIXES: &[&str] = &[".o", ".obj"];

/// Returns true for dotfiles, dot-directories and object files.
pub fn should_ignore(name: &str) -> bool {
    name.starts_with('.')
        || DEFAULT_IGNORED_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
}

/// Entry filter used by the scanner.
///
/// The built-in rules of [`should_ignore`] always apply; user-configured
/// suffixes are checked on top of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    extra_suffixes: Vec<String>,
}

impl PathFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds suffixes such as `.pyc` or `lock`. A missing leading dot is
    /// not added, so `lock` also hides `Cargo.lock`.
    pub fn with_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_suffixes: suffixes
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    pub fn should_ignore(&self, name: &str) -> bool {
        should_ignore(name)
            || self
                .extra_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }
}
