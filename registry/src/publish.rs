//! Versioned TOML artifact of a built registry.

use std::{collections::BTreeMap, fmt};

use sc2_state_core::IdCategory;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{IdRegistry, RegistryError};

/// Format version written into every published artifact.
pub const PUBLISHED_VERSION: u32 = 1;

const HEADER: &str = "# Generated from the game's stable id table. Do not edit.";

#[derive(Deserialize)]
struct PublishedDocument {
    version: u32,
    #[serde(flatten)]
    sections: BTreeMap<String, Section>,
}

/// Entries of one published section in document order.
struct Section(Vec<(String, u32)>);

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionVisitor;

        impl<'de> Visitor<'de> for SectionVisitor {
            type Value = Section;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of names to ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Section, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, u32>()? {
                    entries.push(entry);
                }
                Ok(Section(entries))
            }
        }

        deserializer.deserialize_map(SectionVisitor)
    }
}

struct Published<'a>(&'a IdRegistry);

impl fmt::Display for Published<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f, "version = {PUBLISHED_VERSION}")?;
        for category in IdCategory::ALL {
            writeln!(f)?;
            writeln!(f, "[{}]", category.table_key())?;
            for (id, name) in self.0.entries(category) {
                writeln!(f, "{} = {id}", quoted(name))?;
            }
        }
        Ok(())
    }
}

fn quoted(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('"');
    for c in key.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

impl IdRegistry {
    /// Renders the registry as the published TOML artifact.
    ///
    /// Sections follow the canonical category order and entries are sorted by
    /// id, names sharing an id in source order, so rendering is deterministic.
    #[must_use]
    pub fn render(&self) -> String {
        Published(self).to_string()
    }

    /// Reads a registry back from its published artifact.
    pub fn from_published(text: &str) -> Result<Self, RegistryError> {
        let mut document: PublishedDocument = toml::from_str(text)?;
        if document.version != PUBLISHED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: document.version,
                expected: PUBLISHED_VERSION,
            });
        }

        let mut names = BTreeMap::new();
        for category in IdCategory::ALL {
            let section = document
                .sections
                .remove(category.table_key())
                .ok_or(RegistryError::MissingCategory(category))?;
            let _previous = names.insert(category, section.0);
        }
        Ok(Self::from_names(names))
    }
}
