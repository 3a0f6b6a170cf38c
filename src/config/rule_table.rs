use rust_embed::RustEmbed;
use std::{borrow::Borrow, collections::BTreeMap, fs, path::Path};

use super::SiteRule;
use crate::util::Util;

#[derive(RustEmbed)]
#[folder = "site-rules"]
struct EmbededRuleFiles;

/// All site rules, in the order they are evaluated.
///
/// Entries are ordered by file name. Rules from the user directory replace
/// embedded rules of the same name.
#[derive(Clone, Debug, Default)]
pub struct SiteRuleTable {
    entries: Vec<SiteRule>,
}

impl SiteRuleTable {
    pub fn parse(directory: Option<&Path>) -> SiteRuleTable {
        let mut entries = BTreeMap::new();

        for (file_name, entry) in EmbededRuleFiles::iter()
            .filter_map(|file_name| EmbededRuleFiles::get(&file_name).map(|e| (file_name, e)))
        {
            let file_name: &str = file_name.borrow();
            let entry = match SiteRule::parse_data(file_name, entry.data) {
                Ok(entry) => entry,
                Err(error) => {
                    log::error!("Skipping embedded rule file '{}': {}", file_name, error);
                    continue;
                }
            };
            entries.insert(entry.name.clone(), entry);
        }

        if let Some(directory) = directory {
            // create data dir if it doesn't already exist
            if let Err(error) = std::fs::DirBuilder::new().recursive(true).create(directory) {
                log::warn!(
                    "Failed to create user rule directory {:?}: {}",
                    directory,
                    error
                );
            }

            if let Ok(mut dir) = fs::read_dir(directory) {
                while let Some(Ok(entry)) = dir.next() {
                    if !Util::check_extension(&entry, "txt") {
                        continue;
                    }

                    match SiteRule::parse_path(&entry.path()) {
                        Ok(rule) => {
                            log::debug!("Loaded user rule file '{}'", rule.name);
                            entries.insert(rule.name.clone(), rule);
                        }
                        Err(error) => {
                            log::error!("Skipping rule file {:?}: {}", entry.path(), error)
                        }
                    }
                }
            }
        }

        Self {
            entries: entries.into_values().collect(),
        }
    }

    pub fn from_entries(entries: Vec<SiteRule>) -> SiteRuleTable {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&SiteRule> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[SiteRule] {
        &self.entries
    }

    pub fn push(&mut self, entry: SiteRule) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
