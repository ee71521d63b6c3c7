//! Read-mostly tool catalog.
//!
//! The console front page is a launcher for self-hosted tools. The catalog
//! is loaded once at startup (built-in defaults or a TOML file) and passed
//! to handlers through state; there is no runtime mutation surface, and no
//! database behind it.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_icon() -> String {
    "🔧".to_string()
}

fn default_category() -> String {
    "other".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    // sorted by (category, name) at construction
    tools: Vec<ToolRecord>,
}

#[derive(Debug, Deserialize)]
struct ToolsFile {
    tools: Vec<ToolRecord>,
}

impl ToolCatalog {
    /// The default launcher set, mirroring a stock home NAS install.
    pub fn builtin() -> Self {
        let records = [
            ("file-manager", "File Manager", "Browse and manage the NAS filesystem", "/file-manager", "📁", "file"),
            ("file-sync", "File Sync", "Multi-device file synchronization", "/file-sync", "🔄", "file"),
            ("download-center", "Download Center", "Manage download tasks and progress", "/downloads", "⬇️", "download"),
            ("system-monitor", "System Monitor", "System status and performance metrics", "/monitor", "📊", "system"),
            ("settings", "Settings", "System configuration and management", "/settings", "⚙️", "system"),
            ("log-viewer", "Log Viewer", "Inspect system logs and errors", "/logs", "📋", "system"),
            ("media-server", "Media Server", "Stream and manage media", "/media-server", "🎬", "media"),
            ("photo-gallery", "Photo Gallery", "Photo and image management", "/photo-gallery", "🖼️", "media"),
            ("network-tools", "Network Tools", "Network diagnostics", "/network-tools", "🌐", "network"),
            ("code-editor", "Code Editor", "In-browser editing environment", "/code-editor", "💻", "development"),
            ("backup-tool", "Backup Tool", "Data backup and restore", "/backup-tool", "💾", "other"),
        ];
        Self::from_records(
            records
                .into_iter()
                .map(|(id, name, description, url, icon, category)| ToolRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    url: url.to_string(),
                    icon: icon.to_string(),
                    category: category.to_string(),
                    active: true,
                })
                .collect(),
        )
    }

    /// Build a catalog from records; on duplicate ids the last one wins.
    pub fn from_records(records: Vec<ToolRecord>) -> Self {
        let mut tools: Vec<ToolRecord> = Vec::with_capacity(records.len());
        for record in records {
            if let Some(existing) = tools.iter_mut().find(|t| t.id == record.id) {
                *existing = record;
            } else {
                tools.push(record);
            }
        }
        tools.sort_by(|a, b| (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str())));
        Self { tools }
    }

    /// Load a catalog from a `[[tools]]` TOML file.
    pub fn load_toml(path: &Path) -> Result<Self, ToolCatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ToolCatalogError::Unreadable(path.to_path_buf(), e))?;
        let file: ToolsFile = toml::from_str(&raw)?;
        Ok(Self::from_records(file.tools))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Active tools, sorted by (category, name).
    pub fn active(&self) -> Vec<&ToolRecord> {
        self.tools.iter().filter(|t| t.active).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ToolRecord> {
        self.tools.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolCatalogError {
    #[error("failed to read tools file {0}: {1}")]
    Unreadable(std::path::PathBuf, std::io::Error),
    #[error("failed to parse tools file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_sorted_and_active() {
        let catalog = ToolCatalog::builtin();
        let active = catalog.active();
        assert_eq!(active.len(), catalog.len());

        let keys: Vec<_> = active
            .iter()
            .map(|t| (t.category.clone(), t.name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn duplicate_ids_last_wins() {
        let mk = |id: &str, name: &str| ToolRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            url: String::new(),
            icon: default_icon(),
            category: default_category(),
            active: true,
        };
        let catalog = ToolCatalog::from_records(vec![mk("a", "First"), mk("a", "Second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().name, "Second");
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.toml");
        std::fs::write(
            &path,
            r#"
[[tools]]
id = "jellyfin"
name = "Jellyfin"
url = "http://nas:8096"
category = "media"

[[tools]]
id = "retired"
name = "Retired"
active = false
"#,
        )
        .unwrap();

        let catalog = ToolCatalog::load_toml(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.active().len(), 1);
        let jellyfin = catalog.get("jellyfin").unwrap();
        assert_eq!(jellyfin.icon, "🔧");
        assert_eq!(jellyfin.category, "media");
        assert!(catalog.get("missing").is_none());
    }
}
