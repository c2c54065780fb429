use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Request;

/// Malformed JSON or form bodies are the client's fault: answer 400, not 422.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> status::BadRequest<Json<Value>> {
    status::BadRequest(Json(json!({ "error": "The request body is malformed." })))
}
