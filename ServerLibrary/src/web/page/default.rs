use actix_web::{get, web, HttpResponse, Responder, Scope};
use actix_web::http::header::LOCATION;

pub fn initialize() -> Scope {
    web::scope("")
        .service(index)
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Found()
        .insert_header((LOCATION, "/detect"))
        .finish()
}
