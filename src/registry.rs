// Tracked repositories, in collection order. Loaded from [[repositories]] in the config file.

use std::collections::HashSet;

use crate::models::TrackedRepository;

#[derive(Debug, Clone)]
pub struct Registry {
    repositories: Vec<TrackedRepository>,
}

impl Registry {
    pub fn new(repositories: Vec<TrackedRepository>) -> anyhow::Result<Self> {
        validate_entries(&repositories)?;
        Ok(Self { repositories })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedRepository> {
        self.repositories.iter()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Look up by dataset key (the repository `name`).
    pub fn get(&self, name: &str) -> Option<&TrackedRepository> {
        self.repositories.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TrackedRepository;
    type IntoIter = std::slice::Iter<'a, TrackedRepository>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn validate_entries(repositories: &[TrackedRepository]) -> anyhow::Result<()> {
    anyhow::ensure!(
        !repositories.is_empty(),
        "repositories must contain at least one entry"
    );
    let mut seen = HashSet::new();
    for repo in repositories {
        anyhow::ensure!(
            !repo.name.trim().is_empty(),
            "repositories.name must be non-empty"
        );
        anyhow::ensure!(
            !repo.organization.trim().is_empty(),
            "repositories.organization must be non-empty (repo {})",
            repo.name
        );
        anyhow::ensure!(
            seen.insert(repo.name.as_str()),
            "repositories.name must be unique, got {} twice",
            repo.name
        );
        if let Some(source_name) = &repo.source_name {
            anyhow::ensure!(
                !source_name.trim().is_empty(),
                "repositories.source_name must be non-empty when set (repo {})",
                repo.name
            );
        }
        if let Some(package) = repo.package_identifier() {
            anyhow::ensure!(
                !package.trim().is_empty(),
                "repositories.package must be non-empty when set (repo {})",
                repo.name
            );
        }
    }
    Ok(())
}
