use crate::mapping::{ConfigMapping, DEFAULT_SECTION};

/// Merge `overlay` on top of `base`, key by key.
///
/// Sections only in `base` are kept as they are. Sections in both are merged
/// field by field, with `overlay`'s value winning for a shared key. A section
/// that `overlay` declares with no fields still shows up in the result.
pub fn merge(base: ConfigMapping, overlay: ConfigMapping) -> ConfigMapping {
    let mut sections = base.into_sections();
    for (name, overlay_fields) in overlay.into_sections() {
        sections.entry(name).or_default().extend(overlay_fields);
    }
    ConfigMapping::from(sections)
}

/// Fold the `DEFAULT` section into every other section and drop it.
///
/// A section's own keys win over the defaults. Runs once, on the fully merged
/// mapping, so defaults from one file reach sections declared in another.
pub fn apply_defaults(mapping: ConfigMapping) -> ConfigMapping {
    let mut sections = mapping.into_sections();
    let Some(defaults) = sections.remove(DEFAULT_SECTION) else {
        return ConfigMapping::from(sections);
    };
    for fields in sections.values_mut() {
        for (key, value) in &defaults {
            fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    ConfigMapping::from(sections)
}
