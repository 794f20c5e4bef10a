//! Weather command handler.

use anyhow::Result;
use t4b_core::api::types::WeatherDay;
use t4b_core::api::{ApiClient, Forecast};

use super::api_failure;
use crate::cli::format;

const LOAD_FAILED: &str = "Erro ao carregar previsão do tempo";
const UNAVAILABLE: &str = "Previsão do tempo indisponível no momento.";
const GOOD_DAY_LABEL: &str = "Bom para pedalar";

pub async fn show(client: &ApiClient, city: &str, good_days_only: bool) -> Result<()> {
    let weather = client.weather();
    let result = if good_days_only {
        weather
            .good_days(city)
            .await
            .map(|f| map_forecast(f, |g| (g.city, g.good_days)))
    } else {
        weather
            .forecast(city)
            .await
            .map(|f| map_forecast(f, |w| (w.city, w.days)))
    };

    match result.map_err(|e| api_failure(e, LOAD_FAILED))? {
        Forecast::Available((city, days)) => print!("{}", render(&city, &days, good_days_only)),
        Forecast::Unavailable => println!("{UNAVAILABLE}"),
    }
    Ok(())
}

fn map_forecast<T, U>(forecast: Forecast<T>, f: impl FnOnce(T) -> U) -> Forecast<U> {
    match forecast {
        Forecast::Available(value) => Forecast::Available(f(value)),
        Forecast::Unavailable => Forecast::Unavailable,
    }
}

fn render(city: &str, days: &[WeatherDay], good_days_only: bool) -> String {
    let mut out = format!("Previsão para {city}\n");
    if days.is_empty() {
        out.push_str(if good_days_only {
            "Nenhum dia bom para pedalar na previsão.\n"
        } else {
            "Sem dados de previsão.\n"
        });
        return out;
    }

    let mut table = format::table([
        "Dia", "Temp.", "Min", "Max", "Vento", "Chuva", "Condição", "",
    ]);
    for day in days {
        let date = day
            .day()
            .map_or_else(|| day.date.clone(), |d| d.format("%d/%m").to_string());
        table.add_row([
            date,
            format!("{:.0}°C", day.temperature),
            format!("{:.0}°C", day.min_temp),
            format!("{:.0}°C", day.max_temp),
            format!("{:.1} km/h", day.wind_speed),
            format!("{:.1}mm", day.precipitation),
            day.description.clone(),
            if day.is_good_for_cycling {
                GOOD_DAY_LABEL.to_string()
            } else {
                String::new()
            },
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');
    out
}
