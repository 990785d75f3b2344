//! Header recognition for the listings table.
//!
//! The marketplace ships more than one column layout, so extraction never
//! relies on fixed positions. A [`TableClassifier`] looks at the header cells
//! and either resolves a [`ColumnMap`] or rejects the table.

use std::collections::HashMap;

/// Columns the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    YearPartModel,
    Description,
    Grade,
    StockNumber,
    Price,
    DealerInfo,
    Distance,
}

/// Normalized header prefixes and the column each one names. First match wins.
pub const HEADER_LABELS: &[(&str, Column)] = &[
    ("yearpartmodel", Column::YearPartModel),
    ("desc", Column::Description),
    ("partgrade", Column::Grade),
    ("grade", Column::Grade),
    ("stock", Column::StockNumber),
    ("usprice", Column::Price),
    ("price", Column::Price),
    ("dealer", Column::DealerInfo),
    ("dist", Column::Distance),
];

/// A header row must contain one of these to be considered at all.
pub const TABLE_MARKERS: &[&str] = &["yearpartmodel", "usprice"];

/// Resolved column positions for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: HashMap<Column, usize>,
    width: usize,
}

impl ColumnMap {
    pub fn index(&self, column: Column) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    pub fn has(&self, column: Column) -> bool {
        self.indices.contains_key(&column)
    }

    /// Number of header cells; data rows shorter than this are skipped.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Text of `column` in a data row, or `""` when the column is unmapped.
    pub fn cell<'a>(&self, cells: &'a [String], column: Column) -> &'a str {
        self.index(column).and_then(|i| cells.get(i)).map(String::as_str).unwrap_or("")
    }
}

/// Decides whether a header row belongs to the listings table.
pub trait TableClassifier {
    /// Returns the column map for a listings table, `None` for anything else.
    fn classify(&self, headers: &[String]) -> Option<ColumnMap>;
}

/// Dictionary-driven classifier; the label tables are plain data.
#[derive(Debug, Clone, Copy)]
pub struct HeaderDictionary {
    labels: &'static [(&'static str, Column)],
    markers: &'static [&'static str],
}

impl HeaderDictionary {
    pub fn new(
        labels: &'static [(&'static str, Column)],
        markers: &'static [&'static str],
    ) -> Self {
        Self { labels, markers }
    }

    fn column_for(&self, header: &str) -> Option<Column> {
        let key = normalize_header(header);
        if key.is_empty() {
            return None;
        }
        self.labels.iter().find(|(prefix, _)| key.starts_with(prefix)).map(|(_, col)| *col)
    }
}

impl Default for HeaderDictionary {
    fn default() -> Self {
        Self::new(HEADER_LABELS, TABLE_MARKERS)
    }
}

impl TableClassifier for HeaderDictionary {
    fn classify(&self, headers: &[String]) -> Option<ColumnMap> {
        let joined = normalize_header(&headers.concat());
        if !self.markers.iter().any(|m| joined.contains(m)) {
            return None;
        }

        let mut map = ColumnMap { indices: HashMap::new(), width: headers.len() };
        for (i, header) in headers.iter().enumerate() {
            if let Some(column) = self.column_for(header) {
                map.indices.entry(column).or_insert(i);
            }
        }

        if !map.has(Column::Price) && !map.has(Column::DealerInfo) {
            return None;
        }

        Some(map)
    }
}

/// Lowercases and keeps only ASCII letters and digits ("Stock#" -> "stock").
fn normalize_header(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
}
