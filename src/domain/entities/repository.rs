use std::fmt;

/// One configured package source, as reported by the manager's most recent
/// listing. Records are value objects: rebuilt wholesale on every listing,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// 1-based position in the latest listing. Assigned by enumeration
    /// order and not stable across add/delete; must not be cached across
    /// a refresh.
    pub index: usize,
    pub alias: String,
    pub name: String,
    pub priority: i64,
    pub enabled: bool,
    pub autorefresh: bool,
    pub gpgcheck: bool,
    pub uri: String,
}

impl Repository {
    pub fn new(alias: String, uri: String) -> Self {
        Self {
            index: 0,
            alias,
            name: String::new(),
            priority: 99,
            enabled: true,
            autorefresh: false,
            gpgcheck: false,
            uri,
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_autorefresh(mut self, autorefresh: bool) -> Self {
        self.autorefresh = autorefresh;
        self
    }

    pub fn set_gpgcheck(mut self, gpgcheck: bool) -> Self {
        self.gpgcheck = gpgcheck;
        self
    }

    /// `.repo` locators are passed to the manager as repository description
    /// files rather than plain URLs.
    pub fn is_repo_file(&self) -> bool {
        self.uri.ends_with(".repo")
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.alias, self.uri)
    }
}
