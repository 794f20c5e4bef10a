//! CEP lookup command handler.

use anyhow::Result;
use t4b_core::api::{ApiClient, CepLookup};
use t4b_core::cep;

use super::api_failure;
use crate::cli::format::or_dash;

pub async fn lookup(client: &ApiClient, raw: &str) -> Result<()> {
    let cep = cep::validate_cep(raw)?;

    match client
        .address()
        .lookup(&cep)
        .await
        .map_err(|e| api_failure(e, cep::NOT_FOUND_MESSAGE))?
    {
        CepLookup::Found(address) => {
            println!("CEP: {}", cep::format_cep(&cep));
            println!("  Logradouro: {}", or_dash(address.logradouro.as_deref()));
            if let Some(complemento) = address.complemento.as_deref().filter(|c| !c.is_empty()) {
                println!("  Complemento: {complemento}");
            }
            println!("  Bairro: {}", or_dash(address.bairro.as_deref()));
            println!("  Cidade: {}", or_dash(address.localidade.as_deref()));
            println!("  UF: {}", or_dash(address.uf.as_deref()));
            println!();
            println!("{}", address.one_line());
        }
        CepLookup::NotFound => println!("{}", cep::NOT_FOUND_MESSAGE),
    }
    Ok(())
}
