//! CSS selectors for Car-Part.com HTML parsing.
//!
//! Update this file when the marketplace changes its markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search forms (home page and interchange page).
pub mod form {
    use super::*;

    pub static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());

    pub static HIDDEN_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("input[type='hidden'], input[type='HIDDEN']").unwrap());

    /// Interchange choices are offered as radio buttons.
    pub static RADIO_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("input[type='radio'], input[type='RADIO']").unwrap());
}

/// Selectors for the listings table.
pub mod results {
    use super::*;

    pub static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

    pub static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

    /// Header cells may be `th` or `td`.
    pub static HEADER_CELL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("th, td").unwrap());

    pub static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
}
