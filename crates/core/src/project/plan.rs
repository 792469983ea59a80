use crate::extract::FileEntry;

use super::error::PathError;
use super::html::inject_base_href;
use super::id::ProjectId;
use super::path::ProjectPath;

pub const INDEX_PAGE: &str = "index.html";
pub const PREVIEW_PAGE: &str = "index_preview.html";

/// A file that is safe to write under the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: ProjectPath,
    pub content: String,
}

/// An entry whose path was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub path: String,
    pub reason: PathError,
}

/// Everything that has to be written for one generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPlan {
    pub id: ProjectId,
    pub files: Vec<ProjectFile>,
    pub rejected: Vec<RejectedEntry>,
}

impl ProjectPlan {
    pub fn get(&self, path: &str) -> Option<&ProjectFile> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }
}

/// Turn extracted entries into the final file set for a project.
///
/// 1. Validate every path. Rejected entries are reported, never written.
/// 2. A later entry with the same path replaces the earlier one in place.
/// 3. Make sure an `index.html` exists (see [`ensure_index`]).
/// 4. Inject the project's `<base>` tag into every HTML page.
/// 5. Add `index_preview.html` as a copy of `index.html`.
pub fn plan_project(entries: Vec<FileEntry>, id: ProjectId) -> ProjectPlan {
    let mut files: Vec<ProjectFile> = Vec::with_capacity(entries.len() + 2);
    let mut rejected = Vec::new();

    for entry in entries {
        match ProjectPath::parse(&entry.path) {
            Ok(path) => upsert(
                &mut files,
                ProjectFile {
                    path,
                    content: entry.content,
                },
            ),
            Err(reason) => rejected.push(RejectedEntry {
                path: entry.path,
                reason,
            }),
        }
    }

    ensure_index(&mut files);

    for file in files.iter_mut().filter(|f| f.path.is_html()) {
        file.content = inject_base_href(&file.content, &id);
    }

    if let Some(index) = files.iter().find(|f| f.path.as_str() == INDEX_PAGE) {
        let preview = ProjectFile {
            path: page_path(PREVIEW_PAGE),
            content: index.content.clone(),
        };
        upsert(&mut files, preview);
    }

    ProjectPlan {
        id,
        files,
        rejected,
    }
}

/// Copy the lexicographically first HTML page to `index.html` when there is
/// no index yet. Does nothing when there are no HTML pages at all.
pub fn ensure_index(files: &mut Vec<ProjectFile>) {
    if files.iter().any(|f| f.path.as_str() == INDEX_PAGE) {
        return;
    }

    let first_page = files
        .iter()
        .filter(|f| f.path.is_html())
        .min_by(|a, b| a.path.cmp(&b.path));

    if let Some(page) = first_page {
        let index = ProjectFile {
            path: page_path(INDEX_PAGE),
            content: page.content.clone(),
        };
        files.push(index);
    }
}

fn upsert(files: &mut Vec<ProjectFile>, file: ProjectFile) {
    match files.iter_mut().find(|f| f.path == file.path) {
        Some(existing) => existing.content = file.content,
        None => files.push(file),
    }
}

fn page_path(name: &'static str) -> ProjectPath {
    ProjectPath::file_name(name)
}
