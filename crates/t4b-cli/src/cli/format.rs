//! Terminal formatting helpers shared by the command handlers.

use comfy_table::{ContentArrangement, Table};
use t4b_core::api::types::parse_service_date;

/// Builds a table with the given header and dynamic column widths.
pub fn table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Formats an amount in reais, e.g. `R$ 120.50`.
pub fn money(value: f64) -> String {
    format!("R$ {value:.2}")
}

/// Formats an optional cost, showing `-` when absent.
pub fn cost(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), money)
}

/// Formats a backend timestamp as `dd/mm/yyyy`, falling back to the raw text.
pub fn date(raw: &str) -> String {
    parse_service_date(raw).map_or_else(|| raw.to_string(), |dt| dt.format("%d/%m/%Y").to_string())
}

pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "R$ 0.00");
        assert_eq!(money(120.5), "R$ 120.50");
        assert_eq!(cost(None), "-");
    }

    #[test]
    fn test_date() {
        assert_eq!(date("2024-03-01T10:00:00Z"), "01/03/2024");
        assert_eq!(date("2024-12-25"), "25/12/2024");
        assert_eq!(date("soon"), "soon");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("azul")), "azul");
    }
}
