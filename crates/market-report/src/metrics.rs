//! Fixed layout of the metrics table

use comfy_table::{Table, presets::UTF8_FULL};
use market_core::{CompanyOverview, Result};

/// Label and overview key for each table cell pair, row by row
pub const METRIC_LAYOUT: [&[(&str, &str)]; 4] = [
    &[
        ("MarketCap", "MarketCapitalization"),
        ("EPS", "EPS"),
        ("P/E Ratio", "PERatio"),
    ],
    &[
        ("Revenue", "RevenueTTM"),
        ("Gross Profit", "GrossProfitTTM"),
        ("Operating Margin", "OperatingMarginTTM"),
    ],
    &[
        ("Return on Equity", "ReturnOnEquityTTM"),
        ("Rev. per Share", "RevenuePerShareTTM"),
        ("Profit Margin", "ProfitMargin"),
    ],
    &[("Book Value", "BookValue"), ("Dividend Yield", "DividendYield")],
];

/// Cells per full row (label, value) x 3
pub const TABLE_COLUMNS: usize = 6;

/// Resolve the layout against `overview` into rows of cell text
pub fn metric_rows(overview: &CompanyOverview) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(METRIC_LAYOUT.len());
    for row in METRIC_LAYOUT {
        let mut cells = Vec::with_capacity(TABLE_COLUMNS);
        for (label, key) in row {
            cells.push((*label).to_string());
            cells.push(overview.require(key)?.to_string());
        }
        rows.push(cells);
    }
    Ok(rows)
}

/// Console rendering of the metrics table
pub fn console_table(overview: &CompanyOverview) -> Result<Table> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for row in metric_rows(overview)? {
        table.add_row(row);
    }
    Ok(table)
}
