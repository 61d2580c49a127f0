use serde::{Deserialize, Serialize};

/// Font size used when a mapping does not specify one.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Associates a key of the model data with a position on a page.
///
/// Positions are document points with `y` measured from the top of the page.
/// `page` is 1-based, matching how pages are shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field_name: String,
    pub page: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Hex colour, `#RRGGBB` or `#RGB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldMapping {
    pub fn new(field_name: impl Into<String>, page: u32, x: f32, y: f32) -> Self {
        Self {
            field_name: field_name.into(),
            page,
            x,
            y,
            width: None,
            height: None,
            font_size: None,
            color: None,
            label: None,
        }
    }

    pub fn font_size(&self) -> f32 {
        match self.font_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            _ => DEFAULT_FONT_SIZE,
        }
    }

    /// Text shown on the marker in the mapping UI.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field_name)
    }
}

/// Appends a mapping for `field_name` at the given position and returns its index.
/// The same field may be placed several times.
pub fn place_mapping(
    mappings: &mut Vec<FieldMapping>,
    field_name: &str,
    page: u32,
    x: f32,
    y: f32,
) -> usize {
    mappings.push(FieldMapping::new(field_name, page, x, y));
    mappings.len() - 1
}

/// Removes the mapping at `index`. Out-of-range indexes are ignored.
pub fn remove_mapping(mappings: &mut Vec<FieldMapping>, index: usize) -> Option<FieldMapping> {
    (index < mappings.len()).then(|| mappings.remove(index))
}

/// Mappings placed on `page`, paired with their index in the full list.
pub fn mappings_for_page(
    mappings: &[FieldMapping],
    page: u32,
) -> impl Iterator<Item = (usize, &FieldMapping)> {
    mappings
        .iter()
        .enumerate()
        .filter(move |(_, m)| m.page == page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_defaults_when_missing_or_invalid() {
        let mut mapping = FieldMapping::new("name", 1, 10.0, 20.0);
        assert_eq!(mapping.font_size(), DEFAULT_FONT_SIZE);
        mapping.font_size = Some(-3.0);
        assert_eq!(mapping.font_size(), DEFAULT_FONT_SIZE);
        mapping.font_size = Some(9.0);
        assert_eq!(mapping.font_size(), 9.0);
    }

    #[test]
    fn place_and_remove() {
        let mut list = Vec::new();
        assert_eq!(place_mapping(&mut list, "a", 1, 1.0, 2.0), 0);
        assert_eq!(place_mapping(&mut list, "a", 2, 3.0, 4.0), 1);
        assert_eq!(place_mapping(&mut list, "b", 1, 5.0, 6.0), 2);

        assert!(remove_mapping(&mut list, 7).is_none());
        let removed = remove_mapping(&mut list, 1).unwrap();
        assert_eq!(removed.page, 2);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn filters_by_page_keeping_indexes() {
        let list = vec![
            FieldMapping::new("a", 1, 0.0, 0.0),
            FieldMapping::new("b", 2, 0.0, 0.0),
            FieldMapping::new("c", 1, 0.0, 0.0),
        ];
        let on_first: Vec<usize> = mappings_for_page(&list, 1).map(|(i, _)| i).collect();
        assert_eq!(on_first, vec![0, 2]);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&FieldMapping::new("total", 1, 5.0, 6.0)).unwrap();
        assert_eq!(json, r#"{"field_name":"total","page":1,"x":5.0,"y":6.0}"#);
    }
}
