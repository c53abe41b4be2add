//! Locating marker-delimited regions in template text.
//!
//! A marker line starts (after optional indentation) with `//`, `/*` or `<!--`,
//! one optional space, then `<TAG>_START` or `<TAG>_END`. Anything else on the
//! line is ignored. Unpaired markers never match and are left in place.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::model::{Category, MarkerRegion};

const COMMENT_OPEN: &str = r"(?://|/\*|<!--) ?";

static COMMENT: Lazy<Regex> = Lazy::new(|| marker_pattern(Category::Comment));
static ORM: Lazy<Regex> = Lazy::new(|| marker_pattern(Category::Orm));
static POSTGRES: Lazy<Regex> = Lazy::new(|| marker_pattern(Category::PostgresOnly));
static MONGO: Lazy<Regex> = Lazy::new(|| marker_pattern(Category::MongoOnly));
static MSW: Lazy<Regex> = Lazy::new(|| marker_pattern(Category::MockingOnly));

fn marker_pattern(category: Category) -> Regex {
    let tag = category.tag();
    let pattern = format!(
        r"(?ms)^[ \t]*{COMMENT_OPEN}{tag}_START[^\n]*\n(.*?)^[ \t]*{COMMENT_OPEN}{tag}_END[^\n]*(?:\n|\z)"
    );
    Regex::new(&pattern).expect("marker pattern compiles")
}

fn pattern_for(category: Category) -> &'static Regex {
    match category {
        Category::Comment => &COMMENT,
        Category::Orm => &ORM,
        Category::PostgresOnly => &POSTGRES,
        Category::MongoOnly => &MONGO,
        Category::MockingOnly => &MSW,
    }
}

/// Return every region of `category`, left to right, shortest match first.
pub fn extract(text: &str, category: Category) -> Vec<MarkerRegion> {
    pattern_for(category)
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(MarkerRegion {
                category,
                start_offset: whole.start(),
                end_offset: whole.end(),
                inner_text: inner.as_str().to_owned(),
            })
        })
        .collect()
}

/// Remove every region of `category`, markers and inner text alike.
pub fn strip(text: &str, category: Category) -> String {
    pattern_for(category).replace_all(text, "").into_owned()
}

/// Remove the marker lines of every region of `category`, keeping the inner text.
pub fn unwrap(text: &str, category: Category) -> String {
    pattern_for(category)
        .replace_all(text, |caps: &Captures<'_>| caps[1].to_owned())
        .into_owned()
}
