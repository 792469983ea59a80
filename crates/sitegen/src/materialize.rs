//! Writes a planned project to disk and packs it into a zip archive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sitegen_core::project::{ProjectId, ProjectPlan};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Error;

/// A generated project on disk.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub id: ProjectId,
    pub directory: PathBuf,
    pub archive: PathBuf,
    pub files: usize,
}

pub fn project_dir(root: &Path, id: &ProjectId) -> PathBuf {
    root.join(id.as_str())
}

pub fn archive_path(root: &Path, id: &ProjectId) -> PathBuf {
    root.join(id.archive_name())
}

/// Write every planned file under `<root>/<id>/` and archive the result.
pub fn materialize(root: &Path, plan: &ProjectPlan) -> Result<Bundle, Error> {
    let directory = project_dir(root, &plan.id);
    fs::create_dir_all(&directory).map_err(|e| {
        Error::Io(format!(
            "Failed to create project directory {}: {e}",
            directory.display()
        ))
    })?;

    for file in &plan.files {
        let target = directory.join(file.path.to_relative_path());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&target, &file.content)
            .map_err(|e| Error::Io(format!("Failed to write {}: {e}", target.display())))?;
    }

    let archive = write_archive(root, &plan.id)?;

    Ok(Bundle {
        id: plan.id.clone(),
        directory,
        archive,
        files: plan.files.len(),
    })
}

/// Zip `<root>/<id>/` into `<root>/<id>.zip`.
///
/// Entry names are relative to `root`, so the archive's top-level folder is
/// the project id.
pub fn write_archive(root: &Path, id: &ProjectId) -> Result<PathBuf, Error> {
    let directory = project_dir(root, id);
    let archive = archive_path(root, id);

    // Readers of `<id>.zip` only ever see a finished archive
    let staging = tempfile::Builder::new()
        .prefix(&format!("{}.", id.archive_name()))
        .suffix(".tmp")
        .tempfile_in(root)
        .map_err(|e| Error::Io(format!("Failed to create {}: {e}", archive.display())))?;
    let mut zip = ZipWriter::new(staging);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(&directory).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(format!("Failed to walk project: {e}")))?;
        let name = entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)
                .map_err(|e| Error::Io(format!("Failed to add directory to archive: {e}")))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| Error::Io(format!("Failed to add file to archive: {e}")))?;
            let mut source = fs::File::open(entry.path()).map_err(|e| {
                Error::Io(format!("Failed to read {}: {e}", entry.path().display()))
            })?;
            io::copy(&mut source, &mut zip)
                .map_err(|e| Error::Io(format!("Failed to write archive entry: {e}")))?;
        }
    }

    zip.finish()
        .map_err(|e| Error::Io(format!("Failed to finish archive: {e}")))?
        .persist(&archive)
        .map_err(|e| Error::Io(format!("Failed to write {}: {e}", archive.display())))?;

    Ok(archive)
}

/// Archive entry names always use `/`.
fn entry_name(root: &Path, path: &Path) -> Result<String, Error> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| Error::Io(format!("{} is outside {}", path.display(), root.display())))?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegen_core::extract::FileEntry;
    use sitegen_core::project::plan_project;
    use std::io::Read;
    use tempfile::TempDir;

    fn archive_names(path: &Path) -> Vec<String> {
        let file = fs::File::open(path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_materialize_writes_files_and_archive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let id = ProjectId::parse("abc").unwrap();

        let plan = plan_project(
            vec![
                FileEntry::new("about.html", "<head></head>about"),
                FileEntry::new("css/site.css", "body {}"),
            ],
            id.clone(),
        );
        let bundle = materialize(root, &plan).unwrap();

        assert_eq!(bundle.directory, root.join("abc"));
        assert_eq!(bundle.archive, root.join("abc.zip"));
        assert_eq!(bundle.files, 4);

        let index = fs::read_to_string(root.join("abc").join("index.html")).unwrap();
        assert!(index.contains(r#"<base href="/generated_projects/abc/">"#));
        assert_eq!(
            fs::read_to_string(root.join("abc").join("index_preview.html")).unwrap(),
            index
        );
        assert_eq!(
            fs::read_to_string(root.join("abc").join("css").join("site.css")).unwrap(),
            "body {}"
        );

        assert_eq!(
            archive_names(&bundle.archive),
            vec![
                "abc/",
                "abc/about.html",
                "abc/css/",
                "abc/css/site.css",
                "abc/index.html",
                "abc/index_preview.html",
            ]
        );
    }

    #[test]
    fn test_archive_entry_contents() {
        let temp_dir = TempDir::new().unwrap();
        let id = ProjectId::parse("xyz").unwrap();
        let plan = plan_project(vec![FileEntry::new("app.js", "let a = 1;")], id);

        let bundle = materialize(temp_dir.path(), &plan).unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&bundle.archive).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("xyz/app.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "let a = 1;");
    }

    #[test]
    fn test_rejected_paths_are_never_written() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("generated");
        let id = ProjectId::parse("evil").unwrap();

        let plan = plan_project(
            vec![
                FileEntry::new("../../escaped.txt", "nope"),
                FileEntry::new("index.html", "<html></html>"),
            ],
            id,
        );
        materialize(&root, &plan).unwrap();

        assert!(!temp_dir.path().join("escaped.txt").exists());
        assert!(!root.join("escaped.txt").exists());
        assert!(root.join("evil").join("index.html").exists());
    }

    #[test]
    fn test_empty_plan_still_produces_archive() {
        let temp_dir = TempDir::new().unwrap();
        let id = ProjectId::parse("empty").unwrap();

        let bundle = materialize(temp_dir.path(), &plan_project(vec![], id)).unwrap();

        assert_eq!(bundle.files, 0);
        assert_eq!(archive_names(&bundle.archive), vec!["empty/"]);
    }

    #[test]
    fn test_rewriting_archive_replaces_it_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let id = ProjectId::parse("again").unwrap();

        fs::write(root.join("again.zip"), "not a zip").unwrap();
        materialize(root, &plan_project(vec![FileEntry::new("index.html", "one")], id.clone()))
            .unwrap();
        fs::write(root.join("again").join("extra.css"), "p {}").unwrap();
        let archive = write_archive(root, &id).unwrap();

        assert!(archive_names(&archive).contains(&"again/extra.css".to_string()));
        let mut leftovers: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        leftovers.sort();
        assert_eq!(leftovers, vec!["again", "again.zip"]);
    }
}
