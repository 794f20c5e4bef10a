//! Bike command handlers.

use anyhow::Result;
use t4b_core::api::ApiClient;
use t4b_core::api::types::{Bike, BikeCreate, BikeUpdate};
use t4b_core::confirm::{self, Confirmed, DELETE_BIKE_MESSAGE};
use t4b_core::maintenance::sort_newest_first;

use super::api_failure;
use crate::cli::BikeFields;
use crate::cli::format::{self, or_dash};
use crate::cli::prompt::Prompt;

const LOAD_FAILED: &str = "Erro ao carregar bicicletas";
const GET_FAILED: &str = "Erro ao carregar bicicleta";
const CREATE_FAILED: &str = "Erro ao criar bicicleta. Verifique os dados e tente novamente.";
const UPDATE_FAILED: &str = "Erro ao atualizar bicicleta. Verifique os dados e tente novamente.";
const DELETE_FAILED: &str = "Erro ao excluir bicicleta. Tente novamente.";

pub async fn list(client: &ApiClient) -> Result<()> {
    let bikes = client
        .bikes()
        .list()
        .await
        .map_err(|e| api_failure(e, LOAD_FAILED))?;

    if bikes.is_empty() {
        println!("Nenhuma bicicleta cadastrada");
        return Ok(());
    }

    let mut table = format::table(["ID", "Marca", "Modelo", "Ano", "Cor"]);
    for bike in &bikes {
        table.add_row([
            bike.id.to_string(),
            bike.brand.clone(),
            bike.model.clone(),
            bike.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            or_dash(bike.color.as_deref()).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(client: &ApiClient, id: i64) -> Result<()> {
    let bikes = client.bikes();
    let maintenances = client.maintenances();
    let (bike, mut history) = tokio::try_join!(bikes.get(id), maintenances.list_by_bike(id))
        .map_err(|e| api_failure(e, GET_FAILED))?;

    print_bike(&bike);
    println!();

    if history.is_empty() {
        println!("Nenhuma manutenção registrada");
        return Ok(());
    }

    sort_newest_first(&mut history);
    let total: f64 = history.iter().map(|m| m.cost_or_zero()).sum();
    let mut table = format::table(["ID", "Data", "Serviço", "Custo"]);
    for record in &history {
        table.add_row([
            record.id.to_string(),
            format::date(&record.service_date),
            record.service_type.clone(),
            format::cost(record.cost),
        ]);
    }
    println!("{table}");
    println!("Total gasto: {}", format::money(total));
    Ok(())
}

pub async fn create(client: &ApiClient, fields: BikeFields) -> Result<()> {
    let interactive = fields.brand.is_none() && fields.model.is_none();
    let mut prompt = Prompt::stdio();

    let brand = match fields.brand {
        Some(brand) => brand,
        None => prompt.required("Marca: ")?,
    };
    let model = match fields.model {
        Some(model) => model,
        None => prompt.required("Modelo: ")?,
    };
    let (year, color) = if interactive {
        let year = prompt.optional("Ano (opcional): ")?.map(|y| parse_year(&y)).transpose()?;
        let color = prompt.optional("Cor (opcional): ")?;
        (year, color)
    } else {
        (fields.year, fields.color)
    };

    let payload = BikeCreate {
        brand: non_blank(brand, "Marca")?,
        model: non_blank(model, "Modelo")?,
        year,
        color: color.filter(|c| !c.trim().is_empty()),
    };
    let bike = client
        .bikes()
        .create(&payload)
        .await
        .map_err(|e| api_failure(e, CREATE_FAILED))?;

    println!("✓ Bicicleta cadastrada (ID {})", bike.id);
    print_bike(&bike);
    Ok(())
}

pub async fn edit(client: &ApiClient, id: i64, fields: BikeFields) -> Result<()> {
    let update = BikeUpdate {
        brand: fields.brand.map(|b| non_blank(b, "Marca")).transpose()?,
        model: fields.model.map(|m| non_blank(m, "Modelo")).transpose()?,
        year: fields.year,
        color: fields.color,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --brand, --model, --year, --color.");
    }

    let bike = client
        .bikes()
        .update(id, &update)
        .await
        .map_err(|e| api_failure(e, UPDATE_FAILED))?;

    println!("✓ Bicicleta atualizada");
    print_bike(&bike);
    Ok(())
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    let mut prompt = Prompt::stdio();
    let bikes = client.bikes();
    let outcome = confirm::confirm_then(&mut prompt, DELETE_BIKE_MESSAGE, move || async move {
        bikes
            .delete(id)
            .await
            .map_err(|e| api_failure(e, DELETE_FAILED))
    })
    .await?;

    match outcome {
        Confirmed::Done(()) => println!("✓ Bicicleta excluída"),
        Confirmed::Cancelled => println!("Exclusão cancelada."),
    }
    Ok(())
}

fn print_bike(bike: &Bike) {
    println!("{} (ID {})", bike.display_name(), bike.id);
    if let Some(year) = bike.year {
        println!("  Ano: {year}");
    }
    if let Some(color) = bike.color.as_deref().filter(|c| !c.trim().is_empty()) {
        println!("  Cor: {color}");
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Ano inválido '{raw}': {e}"))
}

fn non_blank(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{field} é obrigatório");
    }
    Ok(trimmed.to_string())
}
