use std::io::ErrorKind;
use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use sitegen_core::media::content_type;
use sitegen_core::project::{ProjectId, ProjectPath};

use crate::error::Error;
use crate::materialize::{archive_path, project_dir};
use crate::server::SharedContext;

/// `GET /download/{project_id}.zip`
pub async fn download(
    State(context): State<SharedContext>,
    Path(archive): Path<String>,
) -> Result<Response, Error> {
    let id = archive
        .strip_suffix(".zip")
        .and_then(|raw| ProjectId::parse(raw).ok())
        .ok_or_else(Error::file_not_found)?;

    let bytes = read_file(archive_path(context.generator.generated_dir(), &id)).await?;

    Ok((
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", id.archive_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /generated_projects/{project_id}/{*path}`
pub async fn generated_file(
    State(context): State<SharedContext>,
    Path((project_id, path)): Path<(String, String)>,
) -> Result<Response, Error> {
    let id = ProjectId::parse(&project_id).map_err(|_| Error::file_not_found())?;
    let path = ProjectPath::parse(&path).map_err(|_| Error::file_not_found())?;

    let full_path = project_dir(context.generator.generated_dir(), &id).join(path.to_relative_path());
    let bytes = read_file(full_path).await?;

    Ok(([(CONTENT_TYPE, content_type(path.as_str()))], bytes).into_response())
}

async fn read_file(path: PathBuf) -> Result<Vec<u8>, Error> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        // A directory is as good as missing.
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            Err(Error::file_not_found())
        }
        Err(e) => Err(Error::Io(format!("Failed to read {}: {e}", path.display()))),
    }
}
