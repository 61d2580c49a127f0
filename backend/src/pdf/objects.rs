//! Small helpers over `lopdf` objects shared by the stamp and form code.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Resource name under which the stamped Helvetica font is registered.
pub(crate) const STAMP_FONT: &str = "FmHelv";

/// Follows a reference (if any) and returns the target object.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

pub(crate) fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Reads a `[llx lly urx ury]` array, normalizing the corner order.
pub(crate) fn rect(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let arr = match resolve(doc, obj)? {
        Object::Array(arr) if arr.len() == 4 => arr,
        _ => return None,
    };
    let mut v = [0.0f32; 4];
    for (slot, item) in v.iter_mut().zip(arr) {
        *slot = number(resolve(doc, item)?)?;
    }
    Some([v[0].min(v[2]), v[1].min(v[3]), v[0].max(v[2]), v[1].max(v[3])])
}

fn inherited_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<[f32; 4]> {
    let mut current = Some(page_id);
    // Page trees are shallow; the bound stops a `/Parent` cycle.
    for _ in 0..32 {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Some(r) = dict.get(key).ok().and_then(|o| rect(doc, o)) {
            return Some(r);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Media box of a page, inherited through `/Parent` when the page has none.
/// Falls back to US Letter.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    inherited_box(doc, page_id, b"MediaBox").unwrap_or([0.0, 0.0, 612.0, 792.0])
}

/// The region viewers display: the crop box clipped to the media box, or the
/// media box when there is no usable crop box.
pub(crate) fn visible_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let media = media_box(doc, page_id);
    let Some(crop) = inherited_box(doc, page_id, b"CropBox") else {
        return media;
    };
    let clipped = [
        crop[0].max(media[0]),
        crop[1].max(media[1]),
        crop[2].min(media[2]),
        crop[3].min(media[3]),
    ];
    if clipped[2] > clipped[0] && clipped[3] > clipped[1] {
        clipped
    } else {
        media
    }
}

/// PDFDocEncoding code points 0x80..=0x9F. 0x9F is undefined.
const PDF_DOC_HIGH: [char; 32] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}', '\u{FFFD}',
];

/// PDFDocEncoding code points 0x18..=0x1F (spacing accents).
const PDF_DOC_ACCENTS: [char; 8] = [
    '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}', '\u{02DC}',
];

/// Characters whose PDFDocEncoding byte is the same as their Latin-1 code.
fn pdf_doc_identity(c: char) -> bool {
    matches!(c as u32, 0x09 | 0x0A | 0x0D | 0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF)
}

/// Encodes a PDF text string: a PDFDocEncoding literal when every char maps to
/// itself, UTF-16BE with a byte order mark otherwise. A value starting with
/// `þÿ` would read back as a byte order mark, so it always takes UTF-16.
pub(crate) fn text_string(value: &str) -> Object {
    if !value.starts_with("\u{FE}\u{FF}") && value.chars().all(pdf_doc_identity) {
        Object::String(value.chars().map(|c| c as u8).collect(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Decodes a PDF text string written by [`text_string`] or by other producers:
/// UTF-16BE after a byte order mark, PDFDocEncoding otherwise.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| pdf_doc_char(b)).collect()
    }
}

fn pdf_doc_char(byte: u8) -> char {
    match byte {
        0x18..=0x1F => PDF_DOC_ACCENTS[(byte - 0x18) as usize],
        0x80..=0x9F => PDF_DOC_HIGH[(byte - 0x80) as usize],
        0xA0 => '\u{20AC}',
        0x7F | 0xAD => '\u{FFFD}',
        _ => byte as char,
    }
}

/// Converts `text` to WinAnsi bytes for a standard-14 font. Characters outside
/// Latin-1 become `?`.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

pub(crate) fn helvetica(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Gives mutable access to a sub-dictionary of the page's resources (for
/// example `Font` or `XObject`), creating whatever is missing.
///
/// Inherited resources are copied onto the page first so that adding an entry
/// does not hide what the page inherited from its parents.
pub(crate) fn page_resource_entry(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    key: &str,
    value: Object,
) -> lopdf::Result<()> {
    let resources = match doc.get_dictionary(page_id)?.get(b"Resources") {
        Ok(obj) => obj.clone(),
        Err(_) => Object::Dictionary(inherited_resources(doc, page_id)),
    };

    let mut res_dict = match &resources {
        Object::Reference(id) => doc.get_dictionary(*id)?.clone(),
        Object::Dictionary(dict) => dict.clone(),
        _ => Dictionary::new(),
    };

    let mut sub = match res_dict.get(category.as_bytes()) {
        Ok(obj) => resolve_dict(doc, obj).cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };
    sub.set(key, value);
    res_dict.set(category, Object::Dictionary(sub));

    match resources {
        Object::Reference(id) => {
            *doc.get_dictionary_mut(id)? = res_dict;
        }
        _ => {
            doc.get_dictionary_mut(page_id)?
                .set("Resources", Object::Dictionary(res_dict));
        }
    }
    Ok(())
}

/// Appends `operations` to the page as a new content stream.
///
/// The page's existing streams are wrapped in `q … Q` first, so whatever
/// graphics state they leave behind does not leak into the appended content.
pub(crate) fn append_isolated_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> lopdf::Result<()> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(arr) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    };

    let mut ops = Vec::with_capacity(operations.len() + 3);
    let mut contents = Vec::with_capacity(existing.len() + 2);
    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        ops.push(Operation::new("Q", vec![]));
    }
    ops.push(Operation::new("q", vec![]));
    ops.extend(operations);
    ops.push(Operation::new("Q", vec![]));

    let encoded = Content { operations: ops }.encode()?;
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
    contents.push(Object::Reference(stream_id));
    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Approximate advance width of `text` in Helvetica at `font_size`.
pub(crate) fn helvetica_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(helvetica_glyph_width).sum();
    units as f32 * font_size / 1000.0
}

// Standard Helvetica AFM widths for printable ASCII; other glyphs use 556.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn helvetica_glyph_width(c: char) -> u32 {
    match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_ASCII[(code - 0x20) as usize] as u32,
        _ => 556,
    }
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = doc
        .get_dictionary(page_id)
        .and_then(|d| d.get(b"Parent"))
        .and_then(Object::as_reference)
        .ok();
    while let Some(id) = current {
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Some(res) = dict.get(b"Resources").ok().and_then(|o| resolve_dict(doc, o)) {
            return res.clone();
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Dictionary::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strings_round_trip() {
        for value in [
            "Jane Doe",
            "Café crème",
            "Łódź",
            "東京",
            "",
            "þÿAB",
            "\u{FE}\u{FF}",
            "price\u{A0}€",
            "“quoted” – fine",
        ] {
            let Object::String(bytes, _) = text_string(value) else {
                panic!("not a string");
            };
            assert_eq!(decode_text(&bytes), value);
        }
    }

    #[test]
    fn thorn_y_prefix_is_not_a_byte_order_mark() {
        let Object::String(bytes, _) = text_string("þÿAB") else {
            panic!("not a string");
        };
        assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
        assert_eq!(&bytes[2..6], &[0x00, 0xFE, 0x00, 0xFF]);
    }

    #[test]
    fn decodes_pdf_doc_encoding() {
        assert_eq!(decode_text(&[0x80, b' ', 0x84, b' ', 0x8D, b'x', 0x8E]), "\u{2022} \u{2014} \u{201C}x\u{201D}");
        assert_eq!(decode_text(&[0xA0, 0xE9]), "€é");
        assert_eq!(decode_text(b"plain"), "plain");
    }

    #[test]
    fn win_ansi_replaces_unsupported_chars() {
        assert_eq!(win_ansi("Añb€\n"), vec![b'A', 0xF1, b'b', b'?', b'?']);
    }
}
