//! Manifest Fixer (B2, §6.5).
//!
//! Operates directly on a parsed manifest document and returns the edited
//! document; no file writing happens here, matching the "external
//! collaborator" framing in §6.5. The manifest this engine actually reads
//! (`manifest::Manifest`) is `package.json`, a JSON document, so the fixer
//! operates on `serde_json::Value` rather than `toml::Value` — see
//! `DESIGN.md` for why this departs from the contract's literal wording.

use serde_json::Value as JsonValue;

use crate::manifest::Section;

const SECTION_KEYS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Remove every name in `names` from every dependency section. A section
/// left empty afterward is deleted entirely (§6.5 "empty sections are
/// deleted").
pub fn remove_dependencies(mut manifest: JsonValue, names: &[&str]) -> JsonValue {
    if let Some(object) = manifest.as_object_mut() {
        for key in SECTION_KEYS {
            let Some(section) = object.get_mut(*key).and_then(|v| v.as_object_mut()) else { continue };
            for name in names {
                section.remove(*name);
            }
            if section.is_empty() {
                object.remove(*key);
            }
        }
    }
    manifest
}

/// Move `name` from `from` to `to`, preserving its version string. A no-op if
/// `name` isn't listed in `from`. The origin section is deleted if it becomes
/// empty.
pub fn move_dependency(mut manifest: JsonValue, name: &str, from: Section, to: Section) -> JsonValue {
    let Some(object) = manifest.as_object_mut() else { return manifest };

    let version = object
        .get_mut(from.key())
        .and_then(|v| v.as_object_mut())
        .and_then(|section| section.remove(name));

    let Some(version) = version else { return manifest };

    if object.get(from.key()).and_then(|v| v.as_object()).map(|s| s.is_empty()).unwrap_or(false) {
        object.remove(from.key());
    }

    object
        .entry(to.key().to_string())
        .or_insert_with(|| JsonValue::Object(Default::default()))
        .as_object_mut()
        .expect("to-section is always an object")
        .insert(name.to_string(), version);

    manifest
}
