//! Dashboard command handler.

use anyhow::Result;
use t4b_core::api::ApiClient;
use t4b_core::dashboard::{self, DashboardStats};

use super::api_failure;
use crate::cli::format;

const LOAD_FAILED: &str = "Erro ao carregar dados do dashboard";

pub async fn show(client: &ApiClient) -> Result<()> {
    let stats = dashboard::load(client)
        .await
        .map_err(|e| api_failure(e, LOAD_FAILED))?;
    print!("{}", render(&stats));
    Ok(())
}

fn render(stats: &DashboardStats) -> String {
    let mut out = String::new();

    let mut summary = format::table(["Bicicletas", "Manutenções", "Total gasto", "Custo médio"]);
    summary.add_row([
        stats.total_bikes.to_string(),
        stats.total_maintenances.to_string(),
        format::money(stats.total_spent),
        format::money(stats.average_cost),
    ]);
    out.push_str(&summary.to_string());
    out.push('\n');

    if stats.recent.is_empty() {
        out.push_str("\nNenhuma manutenção registrada\n");
        return out;
    }

    out.push_str("\nGastos por mês\n");
    let mut monthly = format::table(["Mês", "Custo", "Manutenções"]);
    for point in &stats.monthly {
        monthly.add_row([
            format!("{}/{}", point.label, point.year),
            format::money(point.cost),
            point.count.to_string(),
        ]);
    }
    out.push_str(&monthly.to_string());
    out.push('\n');

    out.push_str("\nManutenções recentes\n");
    let mut recent = format::table(["Data", "Serviço", "Custo"]);
    for record in &stats.recent {
        recent.add_row([
            format::date(&record.service_date),
            record.service_type.clone(),
            format::cost(record.cost),
        ]);
    }
    out.push_str(&recent.to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        let stats = DashboardStats::compute(&[], Vec::new());
        let out = render(&stats);
        assert!(out.contains("R$ 0.00"));
        assert!(out.contains("Nenhuma manutenção registrada"));
        assert!(!out.contains("Gastos por mês"));
    }
}
