use axum::{
    extract::{
        Extension, Form, Path,
        rejection::{FormRejection, PathRejection},
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tablegate_core::{RecordId, RecordUpdate};

use crate::app::{errors::AppError, views};
use crate::context::{AppContext, CurrentUser};

/// Form posted by one row of the table. Absent fields are written as empty.
#[derive(Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub col1: String,
    #[serde(default)]
    pub col2: String,
}

/// `GET /`: the editable table.
pub async fn index(
    Extension(ctx): Extension<AppContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let records = ctx.records.list_all().await?;
    let html = views::render_records(&records, user.display_name())?;
    Ok(Html(html))
}

/// `POST /edit/{id}`: overwrite both columns, then back to the table.
///
/// Anything but a plain decimal id is an unknown row. A body that is not a
/// urlencoded form carries no fields, so both columns are written as empty.
pub async fn edit(
    Extension(ctx): Extension<AppContext>,
    id: Result<Path<String>, PathRejection>,
    form: Result<Form<EditForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Ok(Path(raw_id)) = id else {
        return Err(AppError::NotFound);
    };
    let id: RecordId = raw_id.parse().map_err(|_| AppError::NotFound)?;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "edit body is not a form; writing empty fields");
            EditForm::default()
        }
    };
    let update = RecordUpdate::new(form.col1, form.col2);

    ctx.records.update_by_id(id, update).await?;
    tracing::info!(record_id = %id, "record updated");

    Ok(Redirect::to("/").into_response())
}
