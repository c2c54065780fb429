use crate::views::{NavLink, PageContext, Templates};
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::{status, Responder};
use rocket::serde::json::{json, Json};
use rocket::Request;

#[derive(Responder)]
pub enum NotFound {
    Json(status::Custom<Json<rocket::serde::json::Value>>),
    Html(status::Custom<RawHtml<String>>),
}

/// JSON for API paths, the not-found page for everything else.
#[catch(404)]
pub fn not_found_page(req: &Request) -> NotFound {
    let path = req.uri().path().to_string();
    if path.starts_with("/api/") {
        return NotFound::Json(status::Custom(
            Status::NotFound,
            Json(json!({ "error": "Not found." })),
        ));
    }
    NotFound::Html(status::Custom(Status::NotFound, RawHtml(render(req, path))))
}

fn render(req: &Request, path: String) -> String {
    let context = PageContext {
        title: "Page not found".to_string(),
        nav: vec![NavLink {
            label: "Home",
            href: "/",
        }],
        path: Some(path.clone()),
        ..Default::default()
    };
    let rendered = req
        .rocket()
        .state::<Templates>()
        .map(|templates| templates.render("not_found.html", &context));
    match rendered {
        Some(Ok(html)) => html,
        Some(Err(e)) => {
            tracing::error!(error.cause_chain = ?e, "Failed to render the not-found page");
            format!("<h1>Page not found</h1><p>{}</p>", tera::escape_html(&path))
        }
        None => format!("<h1>Page not found</h1><p>{}</p>", tera::escape_html(&path)),
    }
}

