//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! {"status":"success","data":{...}}
//! {"status":"success","results":2,"data":[...]}
//! ```

use actix_web::HttpResponse;
use serde::Serialize;

/// Serialisable success body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<usize>,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a single value.
    pub fn single(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            data,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Wrap a collection and record its length.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            status: "success",
            results: Some(items.len()),
            data: items,
        }
    }
}

/// `200 OK` wrapping a single value.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::single(data))
}

/// `201 Created` wrapping the new resource.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::single(data))
}

/// `200 OK` wrapping a collection and its length.
pub fn list<T: Serialize>(items: Vec<T>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::list(items))
}

/// `200 OK` with `data: null`, used after deletions.
pub fn empty() -> HttpResponse {
    ok(())
}
