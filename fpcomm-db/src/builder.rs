//! Composable parametrized search statements.
//!
//! Callers contribute predicate fragments whose placeholders are numbered
//! locally from 1. Each fragment is parsed once into literal text and
//! placeholder segments; global placeholder numbers are only assigned when a
//! statement is rendered, so two independent filters can both say `?1`.
//!
//! ```
//! use fpcomm_db::QueryBuilder;
//! use rusqlite::types::Value;
//!
//! let mut builder = QueryBuilder::new("SELECT id FROM playlist");
//! builder.add_predicate("author_id = ?1", [Value::from("u1".to_string())]);
//! builder.add_predicate("library = ?1", [Value::from("arcade".to_string())]);
//! builder.set_limit(10);
//! assert_eq!(
//!     builder.build(0),
//!     "SELECT id FROM playlist WHERE author_id = ?1 AND library = ?2 LIMIT ?3"
//! );
//! ```

use rusqlite::types::Value;

/// Numbered-parameter marker understood by SQLite (`?NNN`).
pub const SQLITE_MARKER: char = '?';

/// Highest parameter number SQLite accepts. Larger local indices are not
/// placeholders and stay literal.
pub const MAX_PARAM_INDEX: usize = 32766;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Anything other than "descending" or "desc" (any case) is ascending.
    pub fn from_str_loose(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("descending") || s.eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// Placeholder with its fragment-local index.
    Param(usize),
}

#[derive(Debug, Clone)]
struct Predicate {
    segments: Vec<Segment>,
    /// Number of placeholders claimed by earlier predicates.
    shift: usize,
}

/// Builds a data statement and a matching count statement from shared
/// predicates.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: String,
    marker: char,
    predicates: Vec<Predicate>,
    arguments: Vec<Value>,
    counter: usize,
    order: Option<(String, SortDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QueryBuilder {
    /// Builder using SQLite's `?NNN` placeholders.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_marker(base, SQLITE_MARKER)
    }

    /// Builder using a different placeholder marker, e.g. `$` for
    /// PostgreSQL-style statements.
    pub fn with_marker(base: impl Into<String>, marker: char) -> Self {
        Self {
            base: base.into(),
            marker,
            predicates: Vec::new(),
            arguments: Vec::new(),
            counter: 0,
            order: None,
            limit: None,
            offset: None,
        }
    }

    /// Replace the statement prefix, keeping every predicate added so far.
    ///
    /// Used to turn a data query into its `SELECT COUNT(*)` twin.
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = base.into();
    }

    /// Append a predicate joined with `AND`.
    ///
    /// Placeholders in `fragment` are local to it and start at 1. The
    /// fragment claims as many global slots as its highest local index.
    pub fn add_predicate<I>(&mut self, fragment: &str, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let (segments, highest) = parse_fragment(fragment, self.marker);
        self.predicates.push(Predicate {
            segments,
            shift: self.counter,
        });
        self.arguments.extend(values);
        self.counter = self.counter.saturating_add(highest);
    }

    pub fn set_limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = Some(offset);
    }

    /// Order by `column` if it appears in `allowed`; otherwise do nothing.
    pub fn set_order(&mut self, column: &str, direction: &str, allowed: &[&str]) {
        if !allowed.contains(&column) {
            return;
        }
        self.order = Some((column.to_string(), SortDirection::from_str_loose(direction)));
    }

    /// Current ordering, if one has been accepted.
    pub fn order(&self) -> Option<(&str, SortDirection)> {
        self.order.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    /// Render the data statement, shifting every placeholder by
    /// `start_offset` so it can be embedded after other parameters.
    ///
    /// SQLite only accepts `OFFSET` after a `LIMIT`; callers that set an
    /// offset should set a limit too.
    pub fn build(&self, start_offset: usize) -> String {
        let mut sql = self.base.clone();
        self.write_where(&mut sql, start_offset);

        if let Some((column, direction)) = &self.order {
            sql.push_str(&format!(" ORDER BY {} {}", column, direction.as_sql()));
        }

        let mut next = self.counter.saturating_add(start_offset);
        if self.limit.is_some() {
            next += 1;
            sql.push_str(&format!(" LIMIT {}{}", self.marker, next));
        }
        if self.offset.is_some() {
            next += 1;
            sql.push_str(&format!(" OFFSET {}{}", self.marker, next));
        }

        sql
    }

    /// Render the count statement: base text and predicates only.
    pub fn build_count(&self, start_offset: usize) -> String {
        let mut sql = self.base.clone();
        self.write_where(&mut sql, start_offset);
        sql
    }

    /// Values for [`build`](Self::build): predicate values, then limit, then
    /// offset.
    pub fn arguments(&self) -> Vec<Value> {
        let mut args = self.arguments.clone();
        if let Some(limit) = self.limit {
            args.push(Value::Integer(limit));
        }
        if let Some(offset) = self.offset {
            args.push(Value::Integer(offset));
        }
        args
    }

    /// Values for [`build_count`](Self::build_count).
    pub fn count_arguments(&self) -> Vec<Value> {
        self.arguments.clone()
    }

    fn write_where(&self, sql: &mut String, start_offset: usize) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            for segment in &predicate.segments {
                match segment {
                    Segment::Text(text) => sql.push_str(text),
                    Segment::Param(local) => {
                        sql.push(self.marker);
                        let global = local
                            .saturating_add(predicate.shift)
                            .saturating_add(start_offset);
                        sql.push_str(&global.to_string());
                    }
                }
            }
        }
    }
}

/// Split a fragment into literal and placeholder segments, returning the
/// highest local placeholder index.
///
/// A placeholder is the marker followed by the longest run of ASCII digits.
/// A marker without digits, or with a number above [`MAX_PARAM_INDEX`],
/// stays literal.
fn parse_fragment(fragment: &str, marker: char) -> (Vec<Segment>, usize) {
    let mut segments = Vec::new();
    let mut highest = 0;
    let mut text = String::new();
    let mut chars = fragment.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != marker {
            text.push(c);
            continue;
        }

        let digits_start = start + c.len_utf8();
        let mut digits_end = digits_start;
        while let Some(&(i, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits_end = i + d.len_utf8();
            chars.next();
        }

        match fragment[digits_start..digits_end].parse::<usize>() {
            Ok(index) if index <= MAX_PARAM_INDEX => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Param(index));
                highest = highest.max(index);
            }
            _ => {
                text.push(c);
                text.push_str(&fragment[digits_start..digits_end]);
            }
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    (segments, highest)
}
