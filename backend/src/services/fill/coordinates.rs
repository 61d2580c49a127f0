use super::{document_bytes, pdf_response};
use crate::error::Result;
use crate::pdf::stamp;
use actix_web::{web, HttpResponse};
use common::requests::FillCoordinatesRequest;
use log::info;

/// Handler for `POST /api/fill/coordinates`.
pub async fn process(payload: web::Json<FillCoordinatesRequest>) -> Result<HttpResponse> {
    let bytes = fill_coordinates(payload.into_inner()).await?;
    Ok(pdf_response(bytes, "filled.pdf"))
}

async fn fill_coordinates(req: FillCoordinatesRequest) -> Result<Vec<u8>> {
    let source = document_bytes(&req.source)?;
    let (bytes, report) =
        web::block(move || stamp::fill_mappings(&source, &req.mappings, &req.data)).await??;
    info!(
        "coordinate fill: {} drawn, {} without data, {} off-page",
        report.drawn, report.skipped_no_data, report.skipped_page
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use crate::pdf::fixtures;
    use crate::services::fill::configure_routes;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::data::DataValue;
    use common::model::field_mapping::FieldMapping;
    use common::model::source::DocumentSource;
    use common::requests::FillCoordinatesRequest;

    #[actix_web::test]
    async fn returns_stamped_pdf() {
        let app = test::init_service(App::new().service(configure_routes())).await;
        let req = FillCoordinatesRequest {
            source: DocumentSource::Bytes(fixtures::blank_pdf(&[(612.0, 792.0)])),
            mappings: vec![FieldMapping::new("name", 1, 72.0, 72.0)],
            data: [("name".to_string(), DataValue::from("Jane"))].into_iter().collect(),
        };
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/fill/coordinates")
                .set_json(&req)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF"));
        assert!(lopdf::Document::load_mem(&body).is_ok());
    }

    #[actix_web::test]
    async fn unresolved_url_is_bad_request() {
        let app = test::init_service(App::new().service(configure_routes())).await;
        let req = FillCoordinatesRequest {
            source: DocumentSource::Url("https://example.com/form.pdf".into()),
            mappings: Vec::new(),
            data: Default::default(),
        };
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/fill/coordinates")
                .set_json(&req)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn garbage_document_is_bad_request() {
        let app = test::init_service(App::new().service(configure_routes())).await;
        let req = FillCoordinatesRequest {
            source: DocumentSource::Bytes(b"definitely not a pdf".to_vec()),
            mappings: Vec::new(),
            data: Default::default(),
        };
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/fill/coordinates")
                .set_json(&req)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
