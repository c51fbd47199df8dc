//! Faculty directory handlers. Public and read-only.

use actix_web::{HttpResponse, get, web};

use crate::domain::{faculty_contact, faculty_directory};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{ErrorSchema, FacultyContactSchema};
use crate::inbound::http::validation::{FieldName, parse_numeric_id};

#[utoipa::path(
    get,
    path = "/api/v1/faculty",
    responses(
        (status = 200, description = "Faculty contacts", body = [FacultyContactSchema])
    ),
    tags = ["faculty"],
    operation_id = "listFaculty",
    security([])
)]
#[get("/faculty")]
pub async fn list_faculty() -> HttpResponse {
    envelope::list(faculty_directory().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/v1/faculty/{id}",
    params(("id" = u32, Path, description = "Numeric faculty identifier")),
    responses(
        (status = 200, description = "Faculty contact", body = FacultyContactSchema),
        (status = 400, description = "Non-numeric identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["faculty"],
    operation_id = "getFaculty",
    security([])
)]
#[get("/faculty/{id}")]
pub async fn get_faculty(path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = parse_numeric_id(&path, FieldName::new("id"))?;
    Ok(envelope::ok(faculty_contact(id)?))
}
