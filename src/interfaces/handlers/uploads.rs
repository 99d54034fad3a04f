use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::upload::{UploadForm, UploadKind, UploadQuery},
    errors::AppError,
    use_cases::extractors::MaybeClaims,
    AppState,
};

#[instrument(skip(claims, state, form), fields(kind = %query.kind))]
pub async fn upload_file(
    claims: MaybeClaims,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<impl Responder, AppError> {
    let kind: UploadKind = query.kind.parse()?;
    let actor = claims.actor();

    let file_name = form.file.file_name.clone();
    let bytes = form.file.data.to_vec();

    let response = state
        .upload_handler
        .upload(actor.as_ref(), kind, file_name, bytes)
        .await?;

    Ok(HttpResponse::Created().json(response))
}
