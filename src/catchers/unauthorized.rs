use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};

#[catch(401)]
pub fn unauthorized_as_json() -> status::Custom<Json<Value>> {
    status::Custom(
        Status::Unauthorized,
        Json(json!({ "error": "Authentication required." })),
    )
}

#[catch(403)]
pub fn forbidden_as_json() -> status::Custom<Json<Value>> {
    status::Custom(
        Status::Forbidden,
        Json(json!({ "error": "You do not have access to this resource." })),
    )
}
