/// Version and provenance of the running binary, embedded by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMetadata {
    pub version: &'static str,
    /// Short git hash, suffixed with `-dirty` for uncommitted trees.
    pub revision: &'static str,
    pub built_on: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        revision: option_env!("RECURRING_CORE_BUILD_REVISION").unwrap_or("unknown"),
        built_on: option_env!("RECURRING_CORE_BUILD_DATE").unwrap_or("unknown"),
        target: option_env!("RECURRING_CORE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("RECURRING_CORE_BUILD_PROFILE").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    pub fn summary(&self) -> String {
        format!("Recurring Core v{} ({})", self.version, self.revision)
    }
}
