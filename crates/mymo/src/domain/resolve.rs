//! Region resolution: deciding which marker regions survive a selection.
//!
//! Resolution is an ordered list of [`Step`]s. Each step re-scans the output of
//! the previous one, so a region unwrapped early can expose nested regions to
//! the steps that follow.

use crate::domain::markers;
use crate::domain::model::{Category, OrmBackend, SelectionConfig};

/// A single pure transform applied to the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Drop markers and inner text.
    Strip(Category),
    /// Drop markers, keep inner text.
    Unwrap(Category),
}

impl Step {
    pub fn apply(&self, text: &str) -> String {
        match *self {
            Step::Strip(category) => markers::strip(text, category),
            Step::Unwrap(category) => markers::unwrap(text, category),
        }
    }
}

const BOM: char = '\u{feff}';

/// Categories removed unconditionally once the selected branches have run.
const CLEANUP: [Category; 4] = [
    Category::Orm,
    Category::PostgresOnly,
    Category::MongoOnly,
    Category::MockingOnly,
];

/// Build the ordered steps for `config`.
pub fn plan(config: &SelectionConfig) -> Vec<Step> {
    let mut steps = vec![Step::Strip(Category::Comment)];

    if config.orm_backend.is_selected() {
        steps.push(Step::Unwrap(Category::Orm));
    }

    match config.orm_backend {
        OrmBackend::Postgres => {
            steps.push(Step::Unwrap(Category::PostgresOnly));
            steps.push(Step::Strip(Category::MongoOnly));
        }
        OrmBackend::Mongo => {
            steps.push(Step::Unwrap(Category::MongoOnly));
            steps.push(Step::Strip(Category::PostgresOnly));
        }
        OrmBackend::None => {}
    }

    if config.include_mocking {
        steps.push(Step::Unwrap(Category::MockingOnly));
    }

    steps.extend(CLEANUP.into_iter().map(Step::Strip));
    steps
}

/// Resolve every region in `text` according to `config`.
///
/// The result contains no complete marker pair of any category. Unpaired
/// markers are not an error and are emitted unchanged. A leading byte order
/// mark is kept aside so a marker on the first line still matches.
pub fn resolve(text: &str, config: &SelectionConfig) -> String {
    let body = text.strip_prefix(BOM);
    let resolved = plan(config)
        .iter()
        .fold(body.unwrap_or(text).to_owned(), |current, step| step.apply(&current));
    if body.is_some() && !resolved.trim().is_empty() {
        format!("{BOM}{resolved}")
    } else {
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
import app from './app'
// COMMENT_START
Template authors: keep the ORM blocks below in sync.
// COMMENT_END
// ORM_START
import { connect } from './db'
// POSTGRES_START
import pg from 'pg'
// POSTGRES_END
// MONGO_START
import mongoose from 'mongoose'
// MONGO_END
connect()
// ORM_END
// MSW_START
import { worker } from './mocks'
// MSW_END
app.start()
";

    fn config(orm_backend: OrmBackend, include_mocking: bool) -> SelectionConfig {
        SelectionConfig::new(orm_backend, include_mocking)
    }

    #[test]
    fn postgres_keeps_postgres_and_drops_mongo() {
        let out = resolve(TEMPLATE, &config(OrmBackend::Postgres, false));
        assert_eq!(
            out,
            "import app from './app'\nimport { connect } from './db'\nimport pg from 'pg'\nconnect()\napp.start()\n"
        );
    }

    #[test]
    fn mongo_keeps_mongo_and_drops_postgres() {
        let out = resolve(TEMPLATE, &config(OrmBackend::Mongo, false));
        assert!(out.contains("import mongoose from 'mongoose'\n"));
        assert!(!out.contains("pg"));
        assert!(out.contains("connect()"));
    }

    #[test]
    fn no_orm_strips_every_orm_region() {
        let out = resolve(TEMPLATE, &config(OrmBackend::None, false));
        assert_eq!(out, "import app from './app'\napp.start()\n");
    }

    #[test]
    fn mocking_is_unwrapped_only_when_selected() {
        let with = resolve(TEMPLATE, &config(OrmBackend::None, true));
        assert!(with.contains("import { worker } from './mocks'\n"));
        let without = resolve(TEMPLATE, &config(OrmBackend::None, false));
        assert!(!without.contains("worker"));
    }

    #[test]
    fn comments_never_survive() {
        for orm in [OrmBackend::None, OrmBackend::Postgres, OrmBackend::Mongo] {
            for mocking in [false, true] {
                let out = resolve(TEMPLATE, &config(orm, mocking));
                assert!(!out.contains("Template authors"));
                assert!(!out.contains("_START"));
                assert!(!out.contains("_END"));
            }
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        for orm in [OrmBackend::None, OrmBackend::Postgres, OrmBackend::Mongo] {
            for mocking in [false, true] {
                let cfg = config(orm, mocking);
                let once = resolve(TEMPLATE, &cfg);
                assert_eq!(resolve(&once, &cfg), once);
            }
        }
    }

    #[test]
    fn plan_orders_branches_before_cleanup() {
        let steps = plan(&config(OrmBackend::Postgres, true));
        assert_eq!(
            steps,
            vec![
                Step::Strip(Category::Comment),
                Step::Unwrap(Category::Orm),
                Step::Unwrap(Category::PostgresOnly),
                Step::Strip(Category::MongoOnly),
                Step::Unwrap(Category::MockingOnly),
                Step::Strip(Category::Orm),
                Step::Strip(Category::PostgresOnly),
                Step::Strip(Category::MongoOnly),
                Step::Strip(Category::MockingOnly),
            ]
        );
    }

    #[test]
    fn unpaired_markers_are_left_as_text() {
        let text = "a\n// ORM_START\nb\n";
        assert_eq!(resolve(text, &config(OrmBackend::Postgres, true)), text);
    }

    #[test]
    fn leading_byte_order_mark_does_not_hide_first_marker() {
        let text = "\u{feff}// COMMENT_START\nc\n// COMMENT_END\nz\n";
        assert_eq!(resolve(text, &config(OrmBackend::None, false)), "\u{feff}z\n");

        let only_region = "\u{feff}// MSW_START\nm\n// MSW_END\n";
        assert_eq!(resolve(only_region, &config(OrmBackend::None, false)), "");
    }

    #[test]
    fn fully_stripped_file_resolves_to_empty() {
        let text = "// MSW_START\nexport const handlers = []\n// MSW_END\n";
        assert_eq!(resolve(text, &config(OrmBackend::None, false)), "");
    }
}
