use serde::{Deserialize, Serialize};

// Field declaration order is the canonical emission order.

/// The full plugin index: an ordered sequence of plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub plugins: Vec<Plugin>,
}

/// One plugin entry with its published binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,

    /// Literal timestamp text, preserved as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Author>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    pub binaries: Vec<Binary>,
}

/// A plugin author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// A downloadable build of a plugin for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub platform: String,
    pub url: String,
    pub checksum: String,
}

impl Catalog {
    /// Iterate over every `(plugin, binary)` pair in catalog order.
    pub fn binaries(&self) -> impl Iterator<Item = (&Plugin, &Binary)> {
        self.plugins
            .iter()
            .flat_map(|p| p.binaries.iter().map(move |b| (p, b)))
    }
}
