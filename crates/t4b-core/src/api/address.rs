//! Postal-code (CEP) lookup (`/address/:cep`).

use super::types::Address;
use super::{ApiClient, ApiErrorKind, ApiResult};

/// Outcome of a CEP lookup. "Not found" is an answer, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CepLookup {
    Found(Address),
    NotFound,
}

pub struct AddressApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AddressApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Looks up a sanitized 8-digit CEP.
    ///
    /// A body flagged with `erro`, a 404 and a 400 all resolve to
    /// [`CepLookup::NotFound`].
    ///
    /// # Errors
    /// Transport failures, 401 and other statuses propagate unchanged.
    pub async fn lookup(&self, cep: &str) -> ApiResult<CepLookup> {
        match self.client.get::<Address>(&format!("/address/{cep}")).await {
            Ok(address) if address.is_not_found() => Ok(CepLookup::NotFound),
            Ok(address) => Ok(CepLookup::Found(address)),
            Err(e) if e.kind == ApiErrorKind::Status && (e.has_status(404) || e.has_status(400)) => {
                tracing::debug!(cep, status = ?e.status, "cep not found");
                Ok(CepLookup::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    use crate::api::test_support::setup;

    use super::*;

    #[tokio::test]
    async fn test_found() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/address/01310100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .mount(&server)
            .await;

        let CepLookup::Found(address) = client.address().lookup("01310100").await.unwrap() else {
            panic!("expected address");
        };
        assert_eq!(address.uf.as_deref(), Some("SP"));
    }

    #[tokio::test]
    async fn test_erro_flag_is_not_found() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/address/99999999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": true})))
            .mount(&server)
            .await;

        assert_eq!(
            client.address().lookup("99999999").await.unwrap(),
            CepLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/address/99999999"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "CEP não encontrado"})),
            )
            .mount(&server)
            .await;

        assert_eq!(
            client.address().lookup("99999999").await.unwrap(),
            CepLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/address/01310100"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client.address().lookup("01310100").await.unwrap_err();
        assert!(err.has_status(502));
    }
}
