use std::collections::HashMap;

/// Training-side class mapping; takes precedence over the label table
/// embedded in the model.
pub const CLASS_MAP: [(usize, &str); 3] = [
    (0, "Fitoftora"),
    (1, "Monilia"),
    (2, "Sana"),
];

pub fn known_class_names() -> impl Iterator<Item = &'static str> {
    CLASS_MAP.iter().map(|(_, name)| *name)
}

/// Resolution order: fixed mapping, then the model's native label table,
/// then the decimal form of the index.
pub fn class_name(class_index: usize, names: Option<&HashMap<usize, String>>) -> String {
    if let Some((_, name)) = CLASS_MAP.iter().find(|(index, _)| *index == class_index) {
        return (*name).to_string();
    }
    names
        .and_then(|names| names.get(&class_index).cloned())
        .unwrap_or_else(|| class_index.to_string())
}
