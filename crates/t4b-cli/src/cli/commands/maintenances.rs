//! Maintenance command handlers.

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use t4b_core::api::types::{Bike, Maintenance, MaintenanceCreate, MaintenanceUpdate, service_date_from};
use t4b_core::api::{ApiClient, CepLookup};
use t4b_core::cep::{self, FORM_NOT_FOUND_MESSAGE};
use t4b_core::confirm::{self, Confirmed, DELETE_MAINTENANCE_MESSAGE};
use t4b_core::maintenance::MaintenanceFilter;

use super::api_failure;
use crate::cli::MaintenanceFields;
use crate::cli::format::{self, or_dash};
use crate::cli::prompt::Prompt;

const LOAD_FAILED: &str = "Erro ao carregar manutenções";
const GET_FAILED: &str = "Erro ao carregar manutenção";
const CREATE_FAILED: &str = "Erro ao criar manutenção. Verifique os dados e tente novamente.";
const UPDATE_FAILED: &str = "Erro ao atualizar manutenção. Verifique os dados e tente novamente.";
const DELETE_FAILED: &str = "Erro ao excluir manutenção. Tente novamente.";

pub async fn list(
    client: &ApiClient,
    bike_id: Option<i64>,
    service_type: Option<String>,
) -> Result<()> {
    let maintenances = client.maintenances();
    let bikes = client.bikes();
    let (records, bikes) = tokio::try_join!(maintenances.list(), bikes.list())
        .map_err(|e| api_failure(e, LOAD_FAILED))?;

    let filter = MaintenanceFilter {
        bike_id,
        service_type,
    };
    let records = filter.apply(records);
    if records.is_empty() {
        println!("Nenhuma manutenção encontrada");
        return Ok(());
    }

    let names: HashMap<i64, String> = bikes.iter().map(|b| (b.id, b.display_name())).collect();
    let mut table = format::table(["ID", "Data", "Bicicleta", "Serviço", "Oficina", "Custo"]);
    for record in &records {
        table.add_row([
            record.id.to_string(),
            format::date(&record.service_date),
            bike_label(record, &names),
            record.service_type.clone(),
            or_dash(record.workshop_name.as_deref()).to_string(),
            format::cost(record.cost),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(client: &ApiClient, id: i64) -> Result<()> {
    let record = client
        .maintenances()
        .get(id)
        .await
        .map_err(|e| api_failure(e, GET_FAILED))?;

    let bike = match record.bike.as_ref() {
        Some(bike) => bike.display_name(),
        None => client
            .bikes()
            .get(record.bike_id)
            .await
            .map_or_else(|_| format!("#{}", record.bike_id), |b| b.display_name()),
    };

    println!("{} (ID {})", record.service_type, record.id);
    println!("  Bicicleta: {bike}");
    println!("  Data: {}", format::date(&record.service_date));
    println!("  Custo: {}", format::cost(record.cost));
    if let Some(description) = record.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("  Descrição: {description}");
    }
    if let Some(name) = record.workshop_name.as_deref().filter(|n| !n.trim().is_empty()) {
        println!("  Oficina: {name}");
    }
    if let Some(cep) = record.workshop_cep.as_deref().filter(|c| !c.trim().is_empty()) {
        println!("  CEP: {}", cep::format_cep(cep));
    }
    if let Some(address) = record.workshop_address.as_deref().filter(|a| !a.trim().is_empty()) {
        println!("  Endereço: {address}");
    }
    Ok(())
}

pub async fn create(client: &ApiClient, fields: MaintenanceFields) -> Result<()> {
    let bikes = client
        .bikes()
        .list()
        .await
        .map_err(|e| api_failure(e, LOAD_FAILED))?;
    let bike_id = pick_bike(&bikes, fields.bike_id)?;

    let service_type = match fields.service_type {
        Some(kind) if !kind.trim().is_empty() => kind.trim().to_string(),
        _ => Prompt::stdio().required("Tipo de serviço: ")?,
    };
    let date = match fields.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let (workshop_cep, workshop_address) =
        resolve_workshop(client, fields.cep.as_deref(), fields.address).await?;

    let payload = MaintenanceCreate {
        bike_id,
        service_type,
        description: fields.description.filter(|d| !d.trim().is_empty()),
        cost: fields.cost,
        workshop_name: fields.workshop_name.filter(|n| !n.trim().is_empty()),
        workshop_cep,
        workshop_address,
        service_date: service_date_from(date),
    };
    let record = client
        .maintenances()
        .create(&payload)
        .await
        .map_err(|e| api_failure(e, CREATE_FAILED))?;

    println!("✓ Manutenção registrada (ID {})", record.id);
    Ok(())
}

pub async fn edit(client: &ApiClient, id: i64, fields: MaintenanceFields) -> Result<()> {
    if fields.bike_id.is_some() {
        anyhow::bail!("The bike of an existing maintenance cannot be changed");
    }

    let (workshop_cep, workshop_address) =
        resolve_workshop(client, fields.cep.as_deref(), fields.address).await?;
    let update = MaintenanceUpdate {
        service_type: fields.service_type,
        description: fields.description,
        cost: fields.cost,
        workshop_name: fields.workshop_name,
        workshop_cep,
        workshop_address,
        service_date: fields
            .date
            .as_deref()
            .map(parse_date)
            .transpose()?
            .map(service_date_from),
    };
    if update.is_empty() {
        anyhow::bail!(
            "Nothing to update. Pass at least one of --type, --description, --cost, --date, \
             --workshop, --cep, --address."
        );
    }

    client
        .maintenances()
        .update(id, &update)
        .await
        .map_err(|e| api_failure(e, UPDATE_FAILED))?;

    println!("✓ Manutenção atualizada");
    Ok(())
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    let mut prompt = Prompt::stdio();
    let maintenances = client.maintenances();
    let outcome =
        confirm::confirm_then(&mut prompt, DELETE_MAINTENANCE_MESSAGE, move || async move {
            maintenances
                .delete(id)
                .await
                .map_err(|e| api_failure(e, DELETE_FAILED))
        })
        .await?;

    match outcome {
        Confirmed::Done(()) => println!("✓ Manutenção excluída"),
        Confirmed::Cancelled => println!("Exclusão cancelada."),
    }
    Ok(())
}

/// Resolves the workshop CEP and address.
///
/// An explicit address wins. Otherwise a given CEP is looked up and its
/// address filled in; a CEP that does not exist leaves the address empty.
async fn resolve_workshop(
    client: &ApiClient,
    cep: Option<&str>,
    address: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    let Some(raw) = cep.filter(|c| !c.trim().is_empty()) else {
        return Ok((None, address));
    };
    let cep = cep::validate_cep(raw)?;
    let formatted = cep::format_cep(&cep);

    if address.is_some() {
        return Ok((Some(formatted), address));
    }

    match client.address().lookup(&cep).await {
        Ok(CepLookup::Found(found)) => {
            let line = found.one_line();
            println!("Endereço: {line}");
            Ok((Some(formatted), Some(line)))
        }
        Ok(CepLookup::NotFound) => {
            eprintln!("{FORM_NOT_FOUND_MESSAGE}");
            Ok((Some(formatted), None))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            eprintln!("Warning: {}", e.user_message(cep::NOT_FOUND_MESSAGE));
            Ok((Some(formatted), None))
        }
    }
}

/// Chooses the bike for a new record, defaulting to the first one listed.
fn pick_bike(bikes: &[Bike], requested: Option<i64>) -> Result<i64> {
    match requested {
        Some(id) if bikes.iter().any(|b| b.id == id) => Ok(id),
        Some(id) => anyhow::bail!("Bicicleta {id} não encontrada"),
        None => bikes
            .first()
            .map(|b| b.id)
            .ok_or_else(|| anyhow::anyhow!("Cadastre uma bicicleta antes de registrar manutenções")),
    }
}

/// Accepts `YYYY-MM-DD` or `dd/mm/yyyy`.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|e| anyhow::anyhow!("Data inválida '{raw}': {e}"))
}

fn bike_label(record: &Maintenance, names: &HashMap<i64, String>) -> String {
    names
        .get(&record.bike_id)
        .cloned()
        .or_else(|| record.bike.as_ref().map(Bike::display_name))
        .unwrap_or_else(|| format!("#{}", record.bike_id))
}
