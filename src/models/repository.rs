// Tracked repository: one [[repositories]] entry in the config file

use serde::Deserialize;

/// Package-index identifier as written in config.
/// `package = true` reuses the repository name, `package = "other-name"` maps it to a
/// different external name, `package = false` (or no key) means code-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PackageSpec {
    Flag(bool),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedRepository {
    /// Dataset key; also the source-host path and package name unless overridden.
    pub name: String,
    pub organization: String,
    /// Repository path on the source host when it differs from `name`
    /// (e.g. `mqt-core` hosted as `munich-quantum-toolkit/core`).
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub package: Option<PackageSpec>,
    /// UI-only repositories whose downloads are not comparable to the others.
    #[serde(default)]
    pub exclude_from_download_chart: bool,
}

impl TrackedRepository {
    /// Code-only repository (no package index).
    pub fn new(name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            source_name: None,
            package: None,
            exclude_from_download_chart: false,
        }
    }

    /// Published under the same name on the package index.
    pub fn packaged(mut self) -> Self {
        self.package = Some(PackageSpec::Flag(true));
        self
    }

    /// Published under a different name on the package index.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(PackageSpec::Name(package.into()));
        self
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    pub fn source_path(&self) -> &str {
        self.source_name.as_deref().unwrap_or(&self.name)
    }

    pub fn package_identifier(&self) -> Option<&str> {
        match &self.package {
            Some(PackageSpec::Flag(true)) => Some(&self.name),
            Some(PackageSpec::Name(name)) => Some(name),
            Some(PackageSpec::Flag(false)) | None => None,
        }
    }

    pub fn has_package(&self) -> bool {
        self.package_identifier().is_some()
    }
}
