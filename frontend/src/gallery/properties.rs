//! Listings shown in the gallery.
//!
//! The list is an embedded JSON manifest, parsed once at startup and never
//! modified afterwards. Records whose paths don't look like relative asset
//! paths are dropped with a log line rather than breaking the page.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config::MEDIA_ROOT;
use crate::error::{Result, SiteError};

const MANIFEST: &str = include_str!("../../properties.json");

pub static PROPERTIES: Lazy<Vec<Property>> = Lazy::new(|| load_manifest(MANIFEST));

/// Which half of a before/after pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Original,
    Remodel,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Original, Phase::Remodel];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Original => "Before",
            Phase::Remodel => "After",
        }
    }

    pub fn default_folder(self) -> &'static str {
        match self {
            Phase::Original => "original",
            Phase::Remodel => "remodel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    pub name: String,
    pub address: String,
    pub folder: String,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub original_images: Vec<String>,
    #[serde(default)]
    pub remodel_images: Vec<String>,
    #[serde(default)]
    pub original_folder: Option<String>,
    #[serde(default)]
    pub remodel_folder: Option<String>,
}

impl Property {
    pub fn subfolder(&self, phase: Phase) -> &str {
        let custom = match phase {
            Phase::Original => self.original_folder.as_deref(),
            Phase::Remodel => self.remodel_folder.as_deref(),
        };
        custom.unwrap_or_else(|| phase.default_folder())
    }

    /// Filenames listed in the manifest; empty means "not listed".
    pub fn images(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Original => &self.original_images,
            Phase::Remodel => &self.remodel_images,
        }
    }

    /// Only tabs without filenames in the manifest are discovered by probing.
    pub fn needs_probe(&self, phase: Phase) -> bool {
        self.images(phase).is_empty()
    }

    /// Tabs to probe, in the order they should run.
    pub fn probe_phases(&self) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|&phase| self.needs_probe(phase))
            .collect()
    }

    pub fn image_path(&self, phase: Phase, filename: &str) -> String {
        format!("{}/{}/{}/{}", MEDIA_ROOT, self.folder, self.subfolder(phase), filename)
    }

    pub fn image_paths(&self, phase: Phase) -> Vec<String> {
        self.images(phase)
            .iter()
            .map(|file| self.image_path(phase, file))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        check_relative(&self.name, "folder", &self.folder)?;
        for phase in Phase::ALL {
            check_relative(&self.name, "subfolder", self.subfolder(phase))?;
            for file in self.images(phase) {
                check_relative(&self.name, "image", file)?;
            }
        }
        Ok(())
    }
}

fn check_relative(property: &str, what: &str, path: &str) -> Result<()> {
    let bad = path.trim().is_empty()
        || path.starts_with('/')
        || path.contains("://")
        || path.split('/').any(|segment| segment == "..");
    if bad {
        return Err(SiteError::Config(format!(
            "{}: {} {:?} is not a relative path",
            property, what, path
        )));
    }
    Ok(())
}

pub fn parse_manifest(json: &str) -> Result<Vec<Property>> {
    let all: Vec<Property> = serde_json::from_str(json)?;
    Ok(all
        .into_iter()
        .filter(|p| match p.validate() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Skipping property: {}", e);
                false
            }
        })
        .collect())
}

pub fn load_manifest(json: &str) -> Vec<Property> {
    parse_manifest(json).unwrap_or_else(|e| {
        log::error!("Property manifest unreadable: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Property {
        Property {
            name: "Cedar Loft".into(),
            address: "12 Cedar Ave".into(),
            folder: "cedar-loft".into(),
            improvements: vec!["New roof".into()],
            original_images: vec!["kitchen.jpg".into(), "bath.png".into()],
            remodel_images: vec!["kitchen-after.webp".into()],
            original_folder: None,
            remodel_folder: Some("after".into()),
        }
    }

    #[test]
    fn explicit_lists_map_to_derived_paths() {
        let p = listing();
        assert_eq!(
            p.image_paths(Phase::Original),
            vec![
                "media/properties/cedar-loft/original/kitchen.jpg",
                "media/properties/cedar-loft/original/bath.png",
            ]
        );
        assert_eq!(
            p.image_paths(Phase::Remodel),
            vec!["media/properties/cedar-loft/after/kitchen-after.webp"]
        );
    }

    #[test]
    fn listed_tabs_are_never_probed() {
        let mut p = listing();
        assert!(!p.needs_probe(Phase::Original));
        assert!(!p.needs_probe(Phase::Remodel));
        assert!(p.probe_phases().is_empty());

        p.remodel_images.clear();
        assert!(!p.needs_probe(Phase::Original));
        assert!(p.needs_probe(Phase::Remodel));
        assert_eq!(p.probe_phases(), vec![Phase::Remodel]);
        assert_eq!(p.image_paths(Phase::Original).len(), 2);

        p.original_images.clear();
        assert_eq!(p.probe_phases(), vec![Phase::Original, Phase::Remodel]);
    }

    #[test]
    fn rejects_paths_escaping_media_root() {
        for bad in ["/etc/passwd", "../secret.jpg", "a/../../b.jpg", "https://x/y.jpg", " "] {
            let mut p = listing();
            p.original_images = vec![bad.to_string()];
            assert!(matches!(p.validate(), Err(SiteError::Config(_))), "{bad:?}");
        }
        let mut p = listing();
        p.folder = "../up".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn manifest_skips_invalid_records_only() {
        let json = r#"[
            {"name": "Good", "address": "1 Main", "folder": "good",
             "original_images": ["a.jpg"]},
            {"name": "Bad", "address": "2 Main", "folder": "/abs"}
        ]"#;
        let props = parse_manifest(json).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "Good");
        assert!(props[0].remodel_images.is_empty());
        assert_eq!(props[0].subfolder(Phase::Remodel), "remodel");
    }

    #[test]
    fn malformed_manifest_loads_as_empty() {
        assert!(parse_manifest("{not json").is_err());
        assert!(load_manifest("{not json").is_empty());
    }

    #[test]
    fn embedded_manifest_is_valid() {
        let props = parse_manifest(MANIFEST).unwrap();
        assert!(!props.is_empty());
        for p in &props {
            assert!(p.validate().is_ok());
        }
    }
}
