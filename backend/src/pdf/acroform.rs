//! AcroForm support: list the fields of a document, fill them from model data,
//! read their values back and optionally flatten them into page content.

use std::collections::{BTreeMap, HashMap, HashSet};

use common::model::data::{DataValue, ModelData};
use common::model::form_field::{FormFieldDescriptor, FormFieldType};
use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use regex::Regex;

use super::objects::{
    append_isolated_content, decode_text, helvetica, helvetica_width, page_resource_entry,
    rect, resolve, resolve_dict, text_string, win_ansi, STAMP_FONT,
};
use super::{load, save, PdfError, Result};

// Field flags, 1-based bit positions from the PDF reference.
const FF_RADIO: i64 = 1 << 15;
const FF_PUSHBUTTON: i64 = 1 << 16;
const FF_COMBO: i64 = 1 << 17;
const FF_EDIT: i64 = 1 << 18;

// Annotation flag: hidden.
const ANNOT_HIDDEN: i64 = 1 << 1;

const DEFAULT_DA: &str = "/Helv 0 Tf 0 g";

/// A terminal field together with the widgets that display it.
#[derive(Debug)]
struct Field {
    id: ObjectId,
    name: String,
    kind: FormFieldType,
    flags: i64,
    widgets: Vec<ObjectId>,
}

#[derive(Debug)]
struct ChoiceOption {
    export: String,
    display: String,
}

/// Lists every terminal field of the document's AcroForm.
///
/// A document without a form yields an empty list.
pub fn detect_fields(bytes: &[u8]) -> Result<Vec<FormFieldDescriptor>> {
    let doc = load(bytes)?;
    Ok(collect_fields(&doc)
        .into_iter()
        .map(|field| {
            let options = match field.kind {
                FormFieldType::Dropdown => Some(
                    choice_options(&doc, field.id)
                        .into_iter()
                        .map(|o| o.display)
                        .collect(),
                ),
                FormFieldType::Radio => Some(radio_states(&doc, &field)),
                _ => None,
            };
            FormFieldDescriptor {
                name: field.name,
                field_type: field.kind,
                options,
            }
        })
        .collect())
}

/// Current `/V` of every terminal field that has one.
pub fn read_values(bytes: &[u8]) -> Result<BTreeMap<String, String>> {
    let doc = load(bytes)?;
    let mut values = BTreeMap::new();
    for field in collect_fields(&doc) {
        let Some(value) = doc
            .get_dictionary(field.id)
            .ok()
            .and_then(|dict| dict.get(b"V").ok())
            .and_then(|v| resolve(&doc, v))
            .and_then(value_text)
        else {
            continue;
        };
        values.insert(field.name, value);
    }
    Ok(values)
}

/// Fills the form fields named by `data` (after `rename_map`, which maps data
/// keys to field names) and returns the new document.
///
/// Unknown fields and values that do not fit a field are skipped. With
/// `flatten` the fields are burned into the pages and the form is removed;
/// this fails with [`PdfError::Flatten`] when a filled widget has no
/// appearance to draw.
pub fn fill_form(
    bytes: &[u8],
    data: &ModelData,
    rename_map: Option<&HashMap<String, String>>,
    flatten: bool,
) -> Result<Vec<u8>> {
    let doc = load(bytes)?;
    let fields = collect_fields(&doc);
    if fields.is_empty() {
        debug!("document has no form fields, nothing to fill");
        return Ok(bytes.to_vec());
    }

    let mut filler = Filler::new(doc)?;
    let by_name: HashMap<&str, &Field> = fields.iter().map(|f| (f.name.as_str(), f)).collect();

    for (key, value) in data {
        let target = rename_map
            .and_then(|m| m.get(key))
            .map(String::as_str)
            .unwrap_or(key.as_str());
        let Some(field) = by_name.get(target) else {
            debug!("no form field named '{}', skipping", target);
            continue;
        };
        filler.fill(field, value)?;
    }

    if flatten {
        filler.flatten(&fields)?;
    } else {
        filler.need_appearances()?;
    }
    save(&mut filler.doc)
}

struct Filler {
    doc: Document,
    font: Option<ObjectId>,
    /// Widgets that now show a value and therefore need an appearance.
    filled: HashSet<ObjectId>,
    font_size_re: Regex,
    rgb_re: Regex,
    gray_re: Regex,
}

impl Filler {
    fn new(doc: Document) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| PdfError::Structure(format!("Regex error: {}", e)))
        };
        Ok(Self {
            doc,
            font: None,
            filled: HashSet::new(),
            font_size_re: compile(r"/[^\s/]+\s+(\d*\.?\d+)\s+Tf")?,
            rgb_re: compile(r"(\d*\.?\d+)\s+(\d*\.?\d+)\s+(\d*\.?\d+)\s+rg")?,
            gray_re: compile(r"(\d*\.?\d+)\s+g\b")?,
        })
    }

    fn fill(&mut self, field: &Field, value: &DataValue) -> Result<()> {
        match field.kind {
            FormFieldType::Checkbox => self.set_checkbox(field, value.is_truthy()),
            FormFieldType::Text => match value.as_fill_text() {
                Some(text) => self.set_text(field, &text, &text),
                None => Ok(()),
            },
            FormFieldType::Radio => match value.as_fill_text() {
                Some(text) => self.set_radio(field, &text),
                None => Ok(()),
            },
            FormFieldType::Dropdown => match value.as_fill_text() {
                Some(text) => self.set_choice(field, &text),
                None => Ok(()),
            },
            FormFieldType::Other => {
                debug!("field '{}' has an unsupported type, skipping", field.name);
                Ok(())
            }
        }
    }

    fn set_text(&mut self, field: &Field, value: &str, shown: &str) -> Result<()> {
        self.doc
            .get_dictionary_mut(field.id)?
            .set("V", text_string(value));
        for &widget in &field.widgets {
            self.text_appearance(field, widget, shown)?;
            self.filled.insert(widget);
        }
        Ok(())
    }

    fn set_checkbox(&mut self, field: &Field, checked: bool) -> Result<()> {
        let mut value = b"Off".to_vec();
        for &widget in &field.widgets {
            let state = if checked {
                let on = on_state(&self.doc, widget).unwrap_or_else(|| b"Yes".to_vec());
                self.filled.insert(widget);
                value = on.clone();
                on
            } else {
                b"Off".to_vec()
            };
            self.doc
                .get_dictionary_mut(widget)?
                .set("AS", Object::Name(state));
        }
        self.doc
            .get_dictionary_mut(field.id)?
            .set("V", Object::Name(value));
        Ok(())
    }

    fn set_radio(&mut self, field: &Field, value: &str) -> Result<()> {
        let states: Vec<(ObjectId, Option<Vec<u8>>)> = field
            .widgets
            .iter()
            .map(|&w| (w, on_state(&self.doc, w)))
            .collect();
        if !states.iter().any(|(_, s)| s.as_deref() == Some(value.as_bytes())) {
            debug!("'{}' is not an option of radio '{}', skipping", value, field.name);
            return Ok(());
        }

        for (widget, state) in states {
            let state = match state {
                Some(s) if s == value.as_bytes() => {
                    self.filled.insert(widget);
                    s
                }
                _ => b"Off".to_vec(),
            };
            self.doc
                .get_dictionary_mut(widget)?
                .set("AS", Object::Name(state));
        }
        self.doc
            .get_dictionary_mut(field.id)?
            .set("V", Object::Name(value.as_bytes().to_vec()));
        Ok(())
    }

    fn set_choice(&mut self, field: &Field, value: &str) -> Result<()> {
        let options = choice_options(&self.doc, field.id);
        match options
            .iter()
            .find(|o| o.display == value || o.export == value)
        {
            Some(option) => self.set_text(field, &option.export, &option.display),
            None if field.flags & FF_EDIT != 0 => self.set_text(field, value, value),
            None => {
                debug!("'{}' is not an option of '{}', skipping", value, field.name);
                Ok(())
            }
        }
    }

    fn font(&mut self) -> ObjectId {
        match self.font {
            Some(id) => id,
            None => {
                let id = helvetica(&mut self.doc);
                self.font = Some(id);
                id
            }
        }
    }

    /// Default appearance string of a widget, falling back to its field and
    /// then to the form-wide default.
    fn default_appearance(&self, field: &Field, widget: ObjectId) -> String {
        let lookup = |id: ObjectId| {
            self.doc
                .get_dictionary(id)
                .ok()
                .and_then(|d| d.get(b"DA").ok())
                .and_then(|o| o.as_str().ok())
                .map(|s| String::from_utf8_lossy(s).into_owned())
        };
        lookup(widget)
            .or_else(|| lookup(field.id))
            .or_else(|| {
                acroform(&self.doc)
                    .and_then(|form| form.get(b"DA").ok())
                    .and_then(|o| o.as_str().ok())
                    .map(|s| String::from_utf8_lossy(s).into_owned())
            })
            .unwrap_or_else(|| DEFAULT_DA.to_string())
    }

    fn text_color(&self, da: &str) -> Operation {
        let num = |s: &str| Object::Real(s.parse().unwrap_or(0.0));
        if let Some(caps) = self.rgb_re.captures(da) {
            return Operation::new("rg", vec![num(&caps[1]), num(&caps[2]), num(&caps[3])]);
        }
        match self.gray_re.captures(da) {
            Some(caps) => Operation::new("g", vec![num(&caps[1])]),
            None => Operation::new("g", vec![Object::Real(0.0)]),
        }
    }

    /// Writes a single-line `/AP /N` stream showing `text`.
    fn text_appearance(&mut self, field: &Field, widget: ObjectId, text: &str) -> Result<()> {
        let Some([llx, lly, urx, ury]) = self
            .doc
            .get_dictionary(widget)?
            .get(b"Rect")
            .ok()
            .and_then(|r| rect(&self.doc, r))
        else {
            warn!("widget of '{}' has no rectangle, appearance not generated", field.name);
            return Ok(());
        };
        let (width, height) = (urx - llx, ury - lly);
        let da = self.default_appearance(field, widget);
        let size = self
            .font_size_re
            .captures(&da)
            .and_then(|caps| caps[1].parse::<f32>().ok())
            .filter(|size| *size > 0.0)
            .unwrap_or_else(|| auto_font_size(text, width, height));
        let color = self.text_color(&da);
        let baseline = ((height - size) / 2.0 + size * 0.2).max(1.0);

        let operations = vec![
            Operation::new("BMC", vec![Object::Name(b"Tx".to_vec())]),
            Operation::new("q", vec![]),
            Operation::new(
                "re",
                vec![
                    Object::Real(1.0),
                    Object::Real(1.0),
                    Object::Real((width - 2.0).max(0.0)),
                    Object::Real((height - 2.0).max(0.0)),
                ],
            ),
            Operation::new("W", vec![]),
            Operation::new("n", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(STAMP_FONT.into()), Object::Real(size)]),
            color,
            Operation::new("Td", vec![Object::Real(2.0), Object::Real(baseline)]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("EMC", vec![]),
        ];
        let font = self.font();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
                "Resources" => dictionary! {
                    "Font" => dictionary! { STAMP_FONT => font },
                },
            },
            Content { operations }.encode()?,
        );
        let ap_id = self.doc.add_object(stream);
        self.doc
            .get_dictionary_mut(widget)?
            .set("AP", dictionary! { "N" => ap_id });
        Ok(())
    }

    fn need_appearances(&mut self) -> Result<()> {
        self.with_acroform(|form| {
            form.set("NeedAppearances", true);
        })
    }

    fn with_acroform(&mut self, apply: impl FnOnce(&mut Dictionary)) -> Result<()> {
        let root_id = self.doc.trailer.get(b"Root")?.as_reference()?;
        let form_ref = match self.doc.get_dictionary(root_id)?.get(b"AcroForm") {
            Ok(Object::Reference(id)) => Some(*id),
            Ok(_) => None,
            Err(_) => return Ok(()),
        };
        match form_ref {
            Some(id) => apply(self.doc.get_dictionary_mut(id)?),
            None => {
                if let Ok(Object::Dictionary(form)) =
                    self.doc.get_dictionary_mut(root_id)?.get_mut(b"AcroForm")
                {
                    apply(form);
                }
            }
        }
        Ok(())
    }

    /// Draws each widget's current normal appearance onto its page, then
    /// removes the widgets and the form.
    fn flatten(&mut self, fields: &[Field]) -> Result<()> {
        let owners: HashMap<ObjectId, &str> = fields
            .iter()
            .flat_map(|f| f.widgets.iter().map(move |&w| (w, f.name.as_str())))
            .collect();
        let mut drawn = 0usize;

        for (_, page_id) in self.doc.get_pages() {
            let (annots, annots_ref) = match self.doc.get_dictionary(page_id)?.get(b"Annots") {
                Ok(Object::Reference(id)) => match self.doc.get_object(*id)? {
                    Object::Array(arr) => (arr.clone(), Some(*id)),
                    _ => continue,
                },
                Ok(Object::Array(arr)) => (arr.clone(), None),
                _ => continue,
            };

            let mut kept = Vec::with_capacity(annots.len());
            let mut operations = Vec::new();
            for annot in annots {
                let Some((widget, owner)) = annot
                    .as_reference()
                    .ok()
                    .and_then(|id| owners.get(&id).map(|name| (id, *name)))
                else {
                    kept.push(annot);
                    continue;
                };
                if self.is_hidden(widget) {
                    continue;
                }
                let Some(appearance) = normal_appearance(&self.doc, widget) else {
                    if self.filled.contains(&widget) {
                        return Err(PdfError::Flatten(owner.to_string()));
                    }
                    continue;
                };
                let Some(placement) = self.placement(widget, appearance) else {
                    continue;
                };

                if let Ok(Object::Stream(stream)) = self.doc.get_object_mut(appearance) {
                    stream.dict.set("Type", "XObject");
                    stream.dict.set("Subtype", "Form");
                }
                let xobject = format!("FmFlat{}", drawn);
                page_resource_entry(
                    &mut self.doc,
                    page_id,
                    "XObject",
                    &xobject,
                    Object::Reference(appearance),
                )?;
                operations.extend([
                    Operation::new("q", vec![]),
                    Operation::new("cm", placement.into_iter().map(Object::Real).collect()),
                    Operation::new("Do", vec![Object::Name(xobject.into_bytes())]),
                    Operation::new("Q", vec![]),
                ]);
                drawn += 1;
            }

            match annots_ref {
                Some(id) => *self.doc.get_object_mut(id)? = Object::Array(kept),
                None => self
                    .doc
                    .get_dictionary_mut(page_id)?
                    .set("Annots", Object::Array(kept)),
            }
            if !operations.is_empty() {
                append_isolated_content(&mut self.doc, page_id, operations)?;
            }
        }

        let root_id = self.doc.trailer.get(b"Root")?.as_reference()?;
        self.doc.get_dictionary_mut(root_id)?.remove(b"AcroForm");
        debug!("flattened {} widgets", drawn);
        Ok(())
    }

    fn is_hidden(&self, widget: ObjectId) -> bool {
        self.doc
            .get_dictionary(widget)
            .ok()
            .and_then(|d| d.get(b"F").ok())
            .and_then(|f| f.as_i64().ok())
            .is_some_and(|flags| flags & ANNOT_HIDDEN != 0)
    }

    /// `cm` operands mapping the appearance bounding box onto the widget
    /// rectangle.
    fn placement(&self, widget: ObjectId, appearance: ObjectId) -> Option<[f32; 6]> {
        let [llx, lly, urx, ury] = self
            .doc
            .get_dictionary(widget)
            .ok()?
            .get(b"Rect")
            .ok()
            .and_then(|r| rect(&self.doc, r))?;
        let [bx0, by0, bx1, by1] = match self.doc.get_object(appearance).ok()? {
            Object::Stream(stream) => stream
                .dict
                .get(b"BBox")
                .ok()
                .and_then(|b| rect(&self.doc, b))
                .unwrap_or([0.0, 0.0, urx - llx, ury - lly]),
            _ => return None,
        };
        let (bw, bh) = (bx1 - bx0, by1 - by0);
        if bw <= 0.0 || bh <= 0.0 {
            return None;
        }
        let sx = (urx - llx) / bw;
        let sy = (ury - lly) / bh;
        Some([sx, 0.0, 0.0, sy, llx - bx0 * sx, lly - by0 * sy])
    }
}

fn acroform(doc: &Document) -> Option<&Dictionary> {
    let form = doc.catalog().ok()?.get(b"AcroForm").ok()?;
    resolve_dict(doc, form)
}

fn collect_fields(doc: &Document) -> Vec<Field> {
    let Some(roots) = acroform(doc)
        .and_then(|form| form.get(b"Fields").ok())
        .and_then(|fields| resolve(doc, fields))
        .and_then(|fields| fields.as_array().ok())
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for root in roots {
        match root.as_reference() {
            Ok(id) => walk(doc, id, "", None, None, &mut seen, &mut out),
            Err(_) => debug!("skipping a field that is not an indirect reference"),
        }
    }
    out
}

fn walk<'a>(
    doc: &'a Document,
    id: ObjectId,
    parent_name: &str,
    field_type: Option<&'a [u8]>,
    flags: Option<i64>,
    seen: &mut HashSet<ObjectId>,
    out: &mut Vec<Field>,
) {
    if !seen.insert(id) {
        return;
    }
    let Ok(dict) = doc.get_dictionary(id) else {
        debug!("skipping unresolvable field {:?}", id);
        return;
    };

    let partial = partial_name(doc, dict);
    let name = match (parent_name.is_empty(), partial) {
        (_, None) => parent_name.to_string(),
        (true, Some(t)) => t,
        (false, Some(t)) => format!("{}.{}", parent_name, t),
    };
    let field_type = dict
        .get(b"FT")
        .ok()
        .and_then(|o| o.as_name().ok())
        .or(field_type);
    let flags = dict
        .get(b"Ff")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .or(flags);

    let kids: Vec<ObjectId> = dict
        .get(b"Kids")
        .ok()
        .and_then(|k| resolve(doc, k))
        .and_then(|k| k.as_array().ok())
        .map(|arr| arr.iter().filter_map(|k| k.as_reference().ok()).collect())
        .unwrap_or_default();
    let child_fields: Vec<ObjectId> = kids
        .iter()
        .copied()
        .filter(|kid| {
            doc.get_dictionary(*kid)
                .is_ok_and(|d| partial_name(doc, d).is_some())
        })
        .collect();

    if child_fields.is_empty() {
        if name.is_empty() {
            return;
        }
        let flags = flags.unwrap_or(0);
        out.push(Field {
            id,
            name,
            kind: classify(field_type, flags),
            flags,
            widgets: if kids.is_empty() { vec![id] } else { kids },
        });
    } else {
        for kid in child_fields {
            walk(doc, kid, &name, field_type, flags, seen, out);
        }
    }
}

fn partial_name(doc: &Document, dict: &Dictionary) -> Option<String> {
    let t = resolve(doc, dict.get(b"T").ok()?)?;
    t.as_str().ok().map(decode_text)
}

fn classify(field_type: Option<&[u8]>, flags: i64) -> FormFieldType {
    match field_type {
        Some(b"Tx") => FormFieldType::Text,
        Some(b"Btn") if flags & FF_RADIO != 0 => FormFieldType::Radio,
        Some(b"Btn") if flags & FF_PUSHBUTTON != 0 => FormFieldType::Other,
        Some(b"Btn") => FormFieldType::Checkbox,
        Some(b"Ch") if flags & FF_COMBO != 0 => FormFieldType::Dropdown,
        _ => FormFieldType::Other,
    }
}

fn choice_options(doc: &Document, field_id: ObjectId) -> Vec<ChoiceOption> {
    let Some(opt) = doc
        .get_dictionary(field_id)
        .ok()
        .and_then(|d| d.get(b"Opt").ok())
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
    else {
        return Vec::new();
    };
    opt.iter()
        .filter_map(|entry| match resolve(doc, entry)? {
            Object::String(bytes, _) => {
                let text = decode_text(bytes);
                Some(ChoiceOption { export: text.clone(), display: text })
            }
            Object::Array(pair) if pair.len() == 2 => {
                let export = decode_text(resolve(doc, &pair[0])?.as_str().ok()?);
                let display = decode_text(resolve(doc, &pair[1])?.as_str().ok()?);
                Some(ChoiceOption { export, display })
            }
            _ => None,
        })
        .collect()
}

/// Export values of a radio group, taken from its widgets' appearance states.
fn radio_states(doc: &Document, field: &Field) -> Vec<String> {
    let mut states: Vec<String> = Vec::new();
    for state in field.widgets.iter().filter_map(|&w| on_state(doc, w)) {
        let state = String::from_utf8_lossy(&state).into_owned();
        if !states.contains(&state) {
            states.push(state);
        }
    }
    states
}

/// First normal-appearance state of a widget other than `Off`.
fn on_state(doc: &Document, widget: ObjectId) -> Option<Vec<u8>> {
    let ap = resolve_dict(doc, doc.get_dictionary(widget).ok()?.get(b"AP").ok()?)?;
    let normal = resolve_dict(doc, ap.get(b"N").ok()?)?;
    normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != b"Off")
        .cloned()
}

/// The appearance stream a viewer would draw for the widget right now.
fn normal_appearance(doc: &Document, widget: ObjectId) -> Option<ObjectId> {
    let dict = doc.get_dictionary(widget).ok()?;
    let ap = resolve_dict(doc, dict.get(b"AP").ok()?)?;
    let normal = ap.get(b"N").ok()?;
    let states = match normal {
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Stream(_) => return Some(*id),
            Object::Dictionary(states) => states,
            _ => return None,
        },
        Object::Dictionary(states) => states,
        _ => return None,
    };
    let current = dict.get(b"AS").ok()?.as_name().ok()?;
    states.get(current).ok()?.as_reference().ok()
}

fn value_text(value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(decode_text(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn auto_font_size(text: &str, width: f32, height: f32) -> f32 {
    let by_height = ((height - 4.0) * 0.8).clamp(4.0, 12.0);
    let unit_width = helvetica_width(text, 1.0);
    if unit_width > 0.0 {
        by_height.min((width - 4.0).max(4.0) / unit_width).max(1.0)
    } else {
        by_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;

    fn data(pairs: &[(&str, DataValue)]) -> ModelData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn field<'a>(fields: &'a [FormFieldDescriptor], name: &str) -> &'a FormFieldDescriptor {
        fields.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn document_without_form_has_no_fields() {
        let pdf = fixtures::blank_pdf(&[(612.0, 792.0)]);
        assert!(detect_fields(&pdf).unwrap().is_empty());
        assert!(read_values(&pdf).unwrap().is_empty());

        let values = data(&[("name", "Jane".into())]);
        assert_eq!(fill_form(&pdf, &values, None, true).unwrap(), pdf);
    }

    #[test]
    fn detects_and_categorizes_fields() {
        let fields = detect_fields(&fixtures::form_pdf()).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "address.city", "agree", "bare", "color", "country", "submit"]
        );

        assert_eq!(field(&fields, "name").field_type, FormFieldType::Text);
        assert_eq!(field(&fields, "address.city").field_type, FormFieldType::Text);
        assert_eq!(field(&fields, "agree").field_type, FormFieldType::Checkbox);
        assert_eq!(field(&fields, "submit").field_type, FormFieldType::Other);

        let color = field(&fields, "color");
        assert_eq!(color.field_type, FormFieldType::Radio);
        assert_eq!(color.options, Some(vec!["red".to_string(), "blue".to_string()]));

        let country = field(&fields, "country");
        assert_eq!(country.field_type, FormFieldType::Dropdown);
        assert_eq!(country.options, Some(vec!["Chile".to_string(), "Peru".to_string()]));
        assert_eq!(field(&fields, "name").options, None);
    }

    #[test]
    fn text_round_trips() {
        let pdf = fixtures::form_pdf();
        for text in ["Jane Doe", "Zoë Ñúñez", "李小龍", "  padded  ", "þÿAB", "5\u{A0}€ – “ok”"] {
            let values = data(&[("name", text.into()), ("address.city", "Lima".into())]);
            let out = fill_form(&pdf, &values, None, false).unwrap();
            let read = read_values(&out).unwrap();
            assert_eq!(read["name"], text);
            assert_eq!(read["address.city"], "Lima");
        }
    }

    #[test]
    fn numbers_are_written_as_text() {
        let values = data(&[("name", DataValue::Number(42.0))]);
        let out = fill_form(&fixtures::form_pdf(), &values, None, false).unwrap();
        assert_eq!(read_values(&out).unwrap()["name"], "42");
    }

    #[test]
    fn checkbox_truthiness() {
        let pdf = fixtures::form_pdf();
        let cases = [
            (DataValue::from("true"), "Yes"),
            (DataValue::from("1"), "Yes"),
            (DataValue::from(" YES "), "Yes"),
            (DataValue::Bool(true), "Yes"),
            (DataValue::Number(1.0), "Yes"),
            (DataValue::from("no"), "Off"),
            (DataValue::from("checked"), "Off"),
            (DataValue::Bool(false), "Off"),
            (DataValue::Number(2.0), "Off"),
            (DataValue::from(""), "Off"),
        ];
        for (value, expected) in cases {
            let out = fill_form(&pdf, &data(&[("agree", value.clone())]), None, false).unwrap();
            assert_eq!(read_values(&out).unwrap()["agree"], expected, "value {:?}", value);
        }
    }

    #[test]
    fn checked_box_sets_widget_state() {
        let out = fill_form(
            &fixtures::form_pdf(),
            &data(&[("agree", true.into())]),
            None,
            false,
        )
        .unwrap();
        let doc = Document::load_mem(&out).unwrap();
        let fields = collect_fields(&doc);
        let agree = fields.iter().find(|f| f.name == "agree").unwrap();
        let state = doc
            .get_dictionary(agree.widgets[0])
            .unwrap()
            .get(b"AS")
            .unwrap()
            .as_name()
            .unwrap();
        assert_eq!(state, b"Yes");
    }

    #[test]
    fn rename_map_targets_other_field() {
        let rename: HashMap<String, String> =
            [("full_name".to_string(), "name".to_string())].into_iter().collect();
        let values = data(&[("full_name", "Jane".into()), ("unknown", "x".into())]);
        let out = fill_form(&fixtures::form_pdf(), &values, Some(&rename), false).unwrap();
        let read = read_values(&out).unwrap();
        assert_eq!(read["name"], "Jane");
        assert!(!read.contains_key("unknown"));
    }

    #[test]
    fn radio_selects_matching_kid_only() {
        let pdf = fixtures::form_pdf();
        let out = fill_form(&pdf, &data(&[("color", "blue".into())]), None, false).unwrap();
        assert_eq!(read_values(&out).unwrap()["color"], "blue");

        let doc = Document::load_mem(&out).unwrap();
        let fields = collect_fields(&doc);
        let color = fields.iter().find(|f| f.name == "color").unwrap();
        let states: Vec<Vec<u8>> = color
            .widgets
            .iter()
            .map(|&w| {
                doc.get_dictionary(w)
                    .unwrap()
                    .get(b"AS")
                    .unwrap()
                    .as_name()
                    .unwrap()
                    .to_vec()
            })
            .collect();
        assert_eq!(states, vec![b"Off".to_vec(), b"blue".to_vec()]);

        let out = fill_form(&pdf, &data(&[("color", "green".into())]), None, false).unwrap();
        assert!(!read_values(&out).unwrap().contains_key("color"));
    }

    #[test]
    fn dropdown_accepts_only_listed_options() {
        let pdf = fixtures::form_pdf();
        let out = fill_form(&pdf, &data(&[("country", "Peru".into())]), None, false).unwrap();
        assert_eq!(read_values(&out).unwrap()["country"], "PE");

        let out = fill_form(&pdf, &data(&[("country", "Chile".into())]), None, false).unwrap();
        assert_eq!(read_values(&out).unwrap()["country"], "Chile");

        let out = fill_form(&pdf, &data(&[("country", "Mars".into())]), None, false).unwrap();
        assert!(!read_values(&out).unwrap().contains_key("country"));
    }

    #[test]
    fn push_buttons_are_skipped() {
        let out = fill_form(
            &fixtures::form_pdf(),
            &data(&[("submit", "go".into())]),
            None,
            false,
        )
        .unwrap();
        assert!(!read_values(&out).unwrap().contains_key("submit"));
    }

    #[test]
    fn sets_need_appearances_when_not_flattening() {
        let out = fill_form(&fixtures::form_pdf(), &data(&[]), None, false).unwrap();
        let doc = Document::load_mem(&out).unwrap();
        let need = acroform(&doc)
            .unwrap()
            .get(b"NeedAppearances")
            .unwrap()
            .as_bool()
            .unwrap();
        assert!(need);
    }

    #[test]
    fn flatten_removes_form_and_draws_widgets() {
        let values = data(&[
            ("name", "Jane".into()),
            ("agree", "yes".into()),
            ("color", "red".into()),
            ("country", "Chile".into()),
        ]);
        let out = fill_form(&fixtures::form_pdf(), &values, None, true).unwrap();

        assert!(detect_fields(&out).unwrap().is_empty());
        let doc = Document::load_mem(&out).unwrap();
        let page_id = doc.get_pages()[&1];
        let annots = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Annots")
            .unwrap()
            .as_array()
            .unwrap();
        assert!(annots.is_empty());

        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let draws = content
            .operations
            .iter()
            .filter(|op| op.operator == "Do")
            .count();
        // name, agree, both radio kids (one on, one off) and country.
        assert_eq!(draws, 5);
    }

    #[test]
    fn flatten_fails_for_filled_widget_without_appearance() {
        let pdf = fixtures::form_pdf();
        let err = fill_form(&pdf, &data(&[("bare", "true".into())]), None, true).unwrap_err();
        assert!(matches!(err, PdfError::Flatten(name) if name == "bare"));

        // The same value fills fine when the form stays interactive.
        let out = fill_form(&pdf, &data(&[("bare", "true".into())]), None, false).unwrap();
        assert_eq!(read_values(&out).unwrap()["bare"], "Yes");
    }

    #[test]
    fn auto_size_fits_width() {
        let size = auto_font_size("A fairly long value", 60.0, 20.0);
        assert!(helvetica_width("A fairly long value", size) <= 56.5);
        assert_eq!(auto_font_size("", 60.0, 20.0), 12.0);
    }
}
