//! Template engine applying resolution and name interpolation to a batch of files.

use rayon::prelude::*;

use crate::domain::interpolate::{interpolate, rename_path};
use crate::domain::model::{FileRecord, SelectionConfig};
use crate::domain::resolve::resolve;

/// Resolves a batch of [`FileRecord`]s for one selection and entity name.
///
/// Files are independent of each other, so the batch is mapped in parallel;
/// output order always matches input order.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    selection: SelectionConfig,
    entity_name: String,
}

impl TemplateEngine {
    pub fn new(selection: SelectionConfig, entity_name: impl Into<String>) -> Self {
        Self {
            selection,
            entity_name: entity_name.into(),
        }
    }

    /// Resolve every record, renaming paths and filling `resolved_content`.
    pub fn run(&self, files: Vec<FileRecord>) -> Vec<FileRecord> {
        files
            .into_par_iter()
            .map(|record| self.process(record))
            .collect()
    }

    /// Resolve a single record.
    ///
    /// `resolved_content` stays `None` when nothing but whitespace is left.
    pub fn process(&self, record: FileRecord) -> FileRecord {
        let rendered = self.render(&record.raw_content);
        let resolved_content = (!rendered.trim().is_empty()).then_some(rendered);
        FileRecord {
            path: rename_path(&record.path, &self.entity_name),
            raw_content: record.raw_content,
            resolved_content,
        }
    }

    /// Resolve regions and interpolate names in free-standing text.
    pub fn render(&self, raw: &str) -> String {
        interpolate(&resolve(raw, &self.selection), &self.entity_name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::model::OrmBackend;

    fn engine() -> TemplateEngine {
        TemplateEngine::new(SelectionConfig::new(OrmBackend::Postgres, false), "blog")
    }

    #[test]
    fn preserves_input_order() {
        let files: Vec<_> = (0..64)
            .map(|i| FileRecord::new(format!("src/file{i}.js"), format!("// {i}\n")))
            .collect();
        let out = engine().run(files);
        for (i, record) in out.iter().enumerate() {
            assert_eq!(record.path, PathBuf::from(format!("src/file{i}.js")));
            assert_eq!(record.resolved_content.as_deref(), Some(format!("// {i}\n").as_str()));
        }
    }

    #[test]
    fn interpolates_after_resolving() {
        let raw = "// POSTGRES_START\nconst ${projectName}Table = '${ProjectName}'\n// POSTGRES_END\n";
        let record = engine().process(FileRecord::new("src/exampleModel.js", raw));
        assert_eq!(record.path, PathBuf::from("src/blogModel.js"));
        assert_eq!(
            record.resolved_content.as_deref(),
            Some("const blogTable = 'Blog'\n")
        );
        assert_eq!(record.raw_content, raw);
    }

    #[test]
    fn whitespace_only_output_has_nothing_to_write() {
        let raw = "// MONGO_START\nmongo()\n// MONGO_END\n\n  \n";
        let record = engine().process(FileRecord::new("db.js", raw));
        assert_eq!(record.resolved_content, None);
    }

    #[test]
    fn byte_order_mark_alone_has_nothing_to_write() {
        let raw = "\u{feff}// POSTGRES_START\n\n// POSTGRES_END\n";
        let record = engine().process(FileRecord::new("db.js", raw));
        assert_eq!(record.resolved_content, None);

        let raw = "\u{feff}// COMMENT_START\nx\n// COMMENT_END\nrun()\n";
        let kept = engine().process(FileRecord::new("app.js", raw));
        assert_eq!(kept.resolved_content.as_deref(), Some("\u{feff}run()\n"));
    }

    #[test]
    fn empty_batch_is_fine() {
        assert!(engine().run(Vec::new()).is_empty());
    }
}
