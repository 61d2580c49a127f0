//! In-memory PDFs used by the tests of this module tree.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

fn finish(mut doc: Document, pages_id: ObjectId, page_ids: &[ObjectId], catalog: Dictionary) -> Vec<u8> {
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn add_page(doc: &mut Document, pages_id: ObjectId, width: f32, height: f32) -> ObjectId {
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
        "Contents" => content_id,
        "Resources" => dictionary! {},
    })
}

/// A document with one empty page per entry of `sizes`.
pub(crate) fn blank_pdf(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_ids: Vec<ObjectId> = sizes
        .iter()
        .map(|&(w, h)| add_page(&mut doc, pages_id, w, h))
        .collect();
    finish(
        doc,
        pages_id,
        &page_ids,
        dictionary! { "Type" => "Catalog", "Pages" => pages_id },
    )
}

/// A single page of `media` size whose visible area is `crop`.
pub(crate) fn cropped_pdf(media: (f32, f32), crop: [f32; 4]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = add_page(&mut doc, pages_id, media.0, media.1);
    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        page.set("CropBox", crop.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>());
    }
    finish(
        doc,
        pages_id,
        &[page_id],
        dictionary! { "Type" => "Catalog", "Pages" => pages_id },
    )
}

fn appearance(doc: &mut Document, content: &[u8]) -> ObjectId {
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 12.into(), 12.into()],
        },
        content.to_vec(),
    ))
}

fn rect(llx: i64, lly: i64, urx: i64, ury: i64) -> Object {
    Object::Array(vec![llx.into(), lly.into(), urx.into(), ury.into()])
}

/// A single Letter page carrying an AcroForm with:
///
/// - `name`: text field
/// - `address.city`: text field below a non-terminal `address` node
/// - `agree`: checkbox with `/Yes` and `/Off` appearances
/// - `bare`: checkbox without appearance streams
/// - `color`: radio group with `red` and `blue` kids
/// - `country`: combo box with plain and `[export display]` options
/// - `submit`: push button
pub(crate) fn form_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = add_page(&mut doc, pages_id, 612.0, 792.0);
    let mut annots: Vec<ObjectId> = Vec::new();

    let name_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("name"),
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
        "Rect" => rect(100, 700, 300, 720),
        "P" => page_id,
    });
    annots.push(name_id);

    let address_id = doc.new_object_id();
    let city_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("city"),
        "DA" => Object::string_literal("/Helv 10 Tf 0 g"),
        "Rect" => rect(100, 650, 300, 670),
        "Parent" => address_id,
        "P" => page_id,
    });
    annots.push(city_id);
    doc.objects.insert(
        address_id,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("address"),
            "Kids" => vec![Object::Reference(city_id)],
        }),
    );

    let yes_ap = appearance(&mut doc, b"0 g 2 2 8 8 re f");
    let off_ap = appearance(&mut doc, b"");
    let agree_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal("agree"),
        "V" => "Off",
        "AS" => "Off",
        "Rect" => rect(100, 600, 112, 612),
        "AP" => dictionary! { "N" => dictionary! { "Yes" => yes_ap, "Off" => off_ap } },
        "P" => page_id,
    });
    annots.push(agree_id);

    let bare_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal("bare"),
        "Rect" => rect(130, 600, 142, 612),
        "P" => page_id,
    });
    annots.push(bare_id);

    let color_id = doc.new_object_id();
    let mut radio_kids = Vec::new();
    for (i, state) in ["red", "blue"].iter().enumerate() {
        let on_ap = appearance(&mut doc, b"0 g 6 6 3 0 360 re f");
        let off_ap = appearance(&mut doc, b"");
        let x = 100 + 30 * i as i64;
        let kid_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "Parent" => color_id,
            "AS" => "Off",
            "Rect" => rect(x, 550, x + 12, 562),
            "AP" => dictionary! { "N" => dictionary! { *state => on_ap, "Off" => off_ap } },
            "P" => page_id,
        });
        radio_kids.push(Object::Reference(kid_id));
        annots.push(kid_id);
    }
    doc.objects.insert(
        color_id,
        Object::Dictionary(dictionary! {
            "FT" => "Btn",
            "Ff" => 1i64 << 15,
            "T" => Object::string_literal("color"),
            "Kids" => radio_kids,
        }),
    );

    let country_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Ch",
        "Ff" => 1i64 << 17,
        "T" => Object::string_literal("country"),
        "DA" => Object::string_literal("/Helv 9 Tf 0 g"),
        "Opt" => vec![
            Object::string_literal("Chile"),
            vec![Object::string_literal("PE"), Object::string_literal("Peru")].into(),
        ],
        "Rect" => rect(100, 500, 250, 515),
        "P" => page_id,
    });
    annots.push(country_id);

    let submit_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "Ff" => 1i64 << 16,
        "T" => Object::string_literal("submit"),
        "Rect" => rect(100, 450, 160, 470),
        "P" => page_id,
    });
    annots.push(submit_id);

    doc.get_dictionary_mut(page_id).unwrap().set(
        "Annots",
        annots.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    );

    let fields: Vec<Object> = [name_id, address_id, agree_id, bare_id, color_id, country_id, submit_id]
        .iter()
        .map(|id| Object::Reference(*id))
        .collect();
    let acroform_id = doc.add_object(dictionary! { "Fields" => fields });

    finish(
        doc,
        pages_id,
        &[page_id],
        dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => acroform_id,
        },
    )
}
