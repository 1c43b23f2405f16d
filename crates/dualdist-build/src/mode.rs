//! Build mode selection

/// How much of the distribution a build produces.
///
/// Read once at startup and passed by value everywhere; nothing mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Both module formats, declarations, install and link steps, targets in sequence
    #[default]
    Full,
    /// Second compiler pass only, targets built concurrently
    Fast,
}

impl BuildMode {
    /// Mode for the `--fast` command-line flag
    pub fn from_fast(fast: bool) -> Self {
        if fast {
            Self::Fast
        } else {
            Self::Full
        }
    }

    pub fn is_fast(self) -> bool {
        matches!(self, Self::Fast)
    }

    /// Get mode name
    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Fast => "fast",
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
