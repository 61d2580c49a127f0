use super::objects::visible_box;
use super::{load, Result};
use common::geometry::PageSize;

/// Size of every page in document order, as a viewer shows it: the crop box
/// when there is one, else the media box.
pub fn page_sizes(bytes: &[u8]) -> Result<Vec<PageSize>> {
    let doc = load(bytes)?;
    Ok(doc
        .get_pages()
        .values()
        .map(|&page_id| {
            let [llx, lly, urx, ury] = visible_box(&doc, page_id);
            PageSize {
                width: urx - llx,
                height: ury - lly,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;

    #[test]
    fn reports_each_page() {
        let bytes = fixtures::blank_pdf(&[(612.0, 792.0), (595.0, 842.0)]);
        let sizes = page_sizes(&bytes).unwrap();
        assert_eq!(
            sizes,
            vec![
                PageSize { width: 612.0, height: 792.0 },
                PageSize { width: 595.0, height: 842.0 },
            ]
        );
    }

    #[test]
    fn crop_box_wins_over_media_box() {
        let bytes = fixtures::cropped_pdf((612.0, 792.0), [36.0, 36.0, 576.0, 756.0]);
        assert_eq!(
            page_sizes(&bytes).unwrap(),
            vec![PageSize { width: 540.0, height: 720.0 }]
        );
    }

    #[test]
    fn crop_box_is_clipped_to_media_box() {
        let bytes = fixtures::cropped_pdf((612.0, 792.0), [-50.0, 0.0, 700.0, 792.0]);
        assert_eq!(
            page_sizes(&bytes).unwrap(),
            vec![PageSize { width: 612.0, height: 792.0 }]
        );
    }

    #[test]
    fn garbage_is_a_load_error() {
        assert!(matches!(
            page_sizes(b"not a pdf"),
            Err(crate::pdf::PdfError::Load(_))
        ));
    }
}
