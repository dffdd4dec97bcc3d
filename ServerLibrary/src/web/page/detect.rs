use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse, Responder, Scope};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::{StreamExt, TryStreamExt};
use uuid::Uuid;
use crate::detection::detector::DetectorHandle;
use crate::detection::normalizer;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::utils::static_files::StaticFiles;
use crate::web::utils::response::{OperationStatus, PredictResponse};

pub fn initialize() -> Scope {
    web::scope("/detect")
        .service(page)
        .service(predict)
}

#[get("")]
async fn page() -> impl Responder {
    let html = StaticFiles::get("html/detect.html").expect("File not found in static files.").data;
    HttpResponse::Ok().content_type("text/html").body(html)
}

#[post("/predict")]
async fn predict(handle: web::Data<DetectorHandle>, mut payload: Multipart) -> impl Responder {
    let request_id = Uuid::new_v4();
    let mut image_data: Option<Vec<u8>> = None;
    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let field_name = match content_disposition.get_name() {
            Some(field_name) => field_name.to_string(),
            None => return HttpResponse::BadRequest().json(OperationStatus::new(false, Some("Invalid payload.".to_string()))),
        };
        if field_name != "imageFile" {
            continue;
        }
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => data.extend_from_slice(&bytes),
                Err(_) => return HttpResponse::InternalServerError().json(OperationStatus::new(false, None)),
            }
        }
        image_data = Some(data);
    }
    let config = Config::now().await;
    let (frame, report) = normalizer::process(handle.get_ref().clone(), image_data, &config).await;
    let annotated_image = match frame {
        Some(frame) => match frame.to_png() {
            Ok(png) => Some(format!("data:image/png;base64,{}", BASE64.encode(png))),
            Err(entry) => {
                logging_entry!(entry);
                None
            },
        },
        None => None,
    };
    logging_information!(DetectEntry::RequestComplete(request_id, report.detection_count()));
    HttpResponse::Ok().json(PredictResponse::new(annotated_image, report.to_json()))
}
