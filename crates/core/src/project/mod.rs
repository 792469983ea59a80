//! Pure half of project materialization: ids, safe paths and the final file
//! set for a generated project.

pub mod error;
pub mod html;
pub mod id;
pub mod path;
pub mod plan;

pub use error::PathError;
pub use html::{base_tag, inject_base_href};
pub use id::ProjectId;
pub use path::ProjectPath;
pub use plan::{
    ensure_index, plan_project, ProjectFile, ProjectPlan, RejectedEntry, INDEX_PAGE, PREVIEW_PAGE,
};
