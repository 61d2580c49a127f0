//! Coordinate fill: draws data values as text at the positions recorded in a
//! list of [`FieldMapping`]s.

use std::collections::BTreeMap;

use common::geometry::baseline_y;
use common::model::data::{DataValue, ModelData};
use common::model::field_mapping::FieldMapping;
use log::debug;
use lopdf::content::Operation;
use lopdf::{Object, ObjectId};

use super::objects::{
    append_isolated_content, helvetica, helvetica_width, page_resource_entry, visible_box,
    win_ansi, STAMP_FONT,
};
use super::{load, save, Result};

/// What a fill pass did with each mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub drawn: usize,
    /// Mappings whose key was missing from the data or had nothing to print.
    pub skipped_no_data: usize,
    /// Mappings pointing at a page the document does not have.
    pub skipped_page: usize,
}

/// Stamps every mapping that has data onto a copy of `bytes`.
///
/// Mappings without data or with an out-of-range page are skipped. When nothing
/// is drawn the input is returned untouched.
pub fn fill_mappings(
    bytes: &[u8],
    mappings: &[FieldMapping],
    data: &ModelData,
) -> Result<(Vec<u8>, FillReport)> {
    let mut doc = load(bytes)?;
    let pages = doc.get_pages();
    let mut report = FillReport::default();
    let mut per_page: BTreeMap<ObjectId, Vec<Operation>> = BTreeMap::new();

    for mapping in mappings {
        let Some(text) = data.get(&mapping.field_name).and_then(DataValue::as_fill_text) else {
            debug!("no data for '{}', skipping", mapping.field_name);
            report.skipped_no_data += 1;
            continue;
        };
        let Some(&page_id) = pages.get(&mapping.page) else {
            debug!(
                "page {} out of range for '{}' ({} pages), skipping",
                mapping.page,
                mapping.field_name,
                pages.len()
            );
            report.skipped_page += 1;
            continue;
        };

        let [llx, lly, _, ury] = visible_box(&doc, page_id);
        let font_size = mapping.font_size();
        let x = llx + mapping.x;
        let y = lly + baseline_y(ury - lly, mapping.y, font_size);
        let text = match mapping.width {
            Some(width) if width > 0.0 => truncate_to_width(&text, width, font_size),
            _ => text,
        };
        let color = mapping.color.as_deref().map(parse_hex_color).unwrap_or_default();

        per_page
            .entry(page_id)
            .or_default()
            .extend(text_operations(&text, x, y, font_size, color));
        report.drawn += 1;
    }

    if per_page.is_empty() {
        return Ok((bytes.to_vec(), report));
    }

    let font_id = helvetica(&mut doc);
    for (page_id, operations) in per_page {
        page_resource_entry(&mut doc, page_id, "Font", STAMP_FONT, Object::Reference(font_id))?;
        append_isolated_content(&mut doc, page_id, operations)?;
    }

    debug!(
        "stamped {} values ({} without data, {} off-page)",
        report.drawn, report.skipped_no_data, report.skipped_page
    );
    Ok((save(&mut doc)?, report))
}

fn text_operations(text: &str, x: f32, y: f32, font_size: f32, (r, g, b): (f32, f32, f32)) -> Vec<Operation> {
    vec![
        Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(STAMP_FONT.into()), Object::Real(font_size)]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Drops trailing characters until `text` fits in `width` points.
fn truncate_to_width(text: &str, width: f32, font_size: f32) -> String {
    let mut end = text.len();
    for (idx, _) in text.char_indices().rev() {
        if helvetica_width(&text[..end], font_size) <= width {
            break;
        }
        end = idx;
    }
    text[..end].to_string()
}

/// `#RRGGBB` or `#RGB` to normalized RGB; anything else is black.
fn parse_hex_color(color: &str) -> (f32, f32, f32) {
    let hex = color.trim().trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    let parsed = match hex.len() {
        6 => hex
            .get(0..2)
            .zip(hex.get(2..4))
            .zip(hex.get(4..6))
            .and_then(|((r, g), b)| Some((channel(r)?, channel(g)?, channel(b)?))),
        3 => {
            let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
            return parse_hex_color(&doubled);
        }
        _ => None,
    };
    parsed.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;
    use lopdf::content::Content;
    use lopdf::Document;

    /// (x, y, text) of every `Td`/`Tj` pair on a page.
    fn drawn_text(bytes: &[u8], page: u32) -> Vec<(f32, f32, String)> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let mut out = Vec::new();
        let mut pos = (0.0, 0.0);
        for op in content.operations {
            match op.operator.as_str() {
                "Td" => {
                    pos = (
                        op.operands[0].as_float().unwrap(),
                        op.operands[1].as_float().unwrap(),
                    )
                }
                "Tj" => {
                    let text = String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned();
                    out.push((pos.0, pos.1, text));
                }
                _ => {}
            }
        }
        out
    }

    fn data(pairs: &[(&str, &str)]) -> ModelData {
        pairs.iter().map(|(k, v)| (k.to_string(), DataValue::from(*v))).collect()
    }

    #[test]
    fn baseline_is_page_height_minus_y_minus_font_size() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0), (595.0, 842.0)]);
        let mut mappings = vec![
            FieldMapping::new("name", 1, 100.0, 100.0),
            FieldMapping::new("city", 2, 40.0, 300.0),
        ];
        mappings[1].font_size = Some(20.0);
        let values = data(&[("name", "Jane"), ("city", "Lima")]);

        let (out, report) = fill_mappings(&pdf, &mappings, &values).unwrap();
        assert_eq!(report.drawn, 2);
        assert_eq!(drawn_text(&out, 1), vec![(100.0, 680.0, "Jane".to_string())]);
        assert_eq!(drawn_text(&out, 2), vec![(40.0, 522.0, "Lima".to_string())]);
    }

    #[test]
    fn positions_are_relative_to_the_crop_box() {
        let pdf = fixtures::cropped_pdf((612.0, 792.0), [36.0, 36.0, 576.0, 756.0]);
        let mappings = vec![FieldMapping::new("name", 1, 0.0, 0.0)];
        let values = data(&[("name", "Jane")]);

        let (out, report) = fill_mappings(&pdf, &mappings, &values).unwrap();
        assert_eq!(report.drawn, 1);
        assert_eq!(drawn_text(&out, 1), vec![(36.0, 744.0, "Jane".to_string())]);
    }

    #[test]
    fn missing_data_draws_nothing() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0)]);
        let mappings = vec![
            FieldMapping::new("absent", 1, 10.0, 10.0),
            FieldMapping::new("empty", 1, 10.0, 30.0),
        ];
        let mut values = data(&[("empty", "")]);
        values.insert("other".into(), DataValue::Null);

        let (out, report) = fill_mappings(&pdf, &mappings, &values).unwrap();
        assert_eq!(report.skipped_no_data, 2);
        assert_eq!(out, pdf);
    }

    #[test]
    fn out_of_range_pages_are_skipped() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0)]);
        let mappings = vec![
            FieldMapping::new("name", 0, 10.0, 10.0),
            FieldMapping::new("name", 2, 10.0, 10.0),
        ];
        let values = data(&[("name", "Jane")]);

        let (out, report) = fill_mappings(&pdf, &mappings, &values).unwrap();
        assert_eq!(report.skipped_page, 2);
        assert_eq!(out, pdf);

        let mut with_valid = mappings.clone();
        with_valid.push(FieldMapping::new("name", 1, 50.0, 50.0));
        let (out, report) = fill_mappings(&pdf, &with_valid, &values).unwrap();
        assert_eq!(report.drawn, 1);
        assert_eq!(drawn_text(&out, 1).len(), 1);
    }

    #[test]
    fn same_field_can_be_stamped_twice() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0)]);
        let mappings = vec![
            FieldMapping::new("name", 1, 10.0, 10.0),
            FieldMapping::new("name", 1, 10.0, 400.0),
        ];
        let (out, _) = fill_mappings(&pdf, &mappings, &data(&[("name", "Jane")])).unwrap();
        let ys: Vec<f32> = drawn_text(&out, 1).into_iter().map(|(_, y, _)| y).collect();
        assert_eq!(ys, vec![770.0, 380.0]);
    }

    #[test]
    fn registers_font_on_touched_pages() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0)]);
        let mappings = vec![FieldMapping::new("name", 1, 10.0, 10.0)];
        let (out, _) = fill_mappings(&pdf, &mappings, &data(&[("name", "Jane")])).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let page_id = doc.get_pages()[&1];
        let fonts = doc
            .get_dictionary(page_id)
            .and_then(|p| p.get(b"Resources"))
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"Font"))
            .and_then(Object::as_dict)
            .unwrap();
        assert!(fonts.has(STAMP_FONT.as_bytes()));
    }

    #[test]
    fn width_truncates_long_values() {
        let text = truncate_to_width("Jane Doe", 20.0, 10.0);
        assert!(helvetica_width(&text, 10.0) <= 20.0);
        assert!("Jane Doe".starts_with(&text));
        assert_eq!(truncate_to_width("Jo", 100.0, 10.0), "Jo");
        assert_eq!(truncate_to_width("Ñandú", 0.5, 10.0), "");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), (1.0, 0.0, 0.0));
        assert_eq!(parse_hex_color("#0F0"), (0.0, 1.0, 0.0));
        assert_eq!(parse_hex_color("blue"), (0.0, 0.0, 0.0));
        assert_eq!(parse_hex_color("#zzzzzz"), (0.0, 0.0, 0.0));
    }
}
