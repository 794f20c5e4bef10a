//! Auth command handlers.

use std::io::{BufRead, Write};

use anyhow::Result;
use t4b_core::api::ApiClient;
use t4b_core::confirm::Confirm;
use t4b_core::login::{CODE_LENGTH, LoginFlow, LoginOutcome, LoginStep};
use t4b_core::session::mask_token;

use crate::cli::prompt::Prompt;

const BACK_WORDS: [&str; 2] = ["voltar", "back"];

pub async fn login(client: &ApiClient, email: Option<&str>) -> Result<()> {
    let mut prompt = Prompt::stdio();
    run_login(client, email, &mut prompt).await
}

async fn run_login<R: BufRead, W: Write>(
    client: &ApiClient,
    email: Option<&str>,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let session = client.session();

    if let Some(existing) = session.get() {
        prompt.say(&format!(
            "Já existe uma sessão ativa (token: {})",
            mask_token(&existing)
        ));
        if !prompt.confirm("Deseja substituí-la?")? {
            prompt.say("Login cancelado.");
            return Ok(());
        }
    }

    let auth = client.auth();
    let mut flow = LoginFlow::new();
    let mut preset = email.map(str::to_string);

    loop {
        match flow.step() {
            LoginStep::AwaitingCode => {
                let answer = match preset.take() {
                    Some(email) => Some(email),
                    None => {
                        let question = if flow.email().is_empty() {
                            "Email: ".to_string()
                        } else {
                            format!("Email [{}]: ", flow.email())
                        };
                        prompt.line(&question)?
                    }
                };
                let Some(answer) = answer else {
                    prompt.say("Login cancelado.");
                    return Ok(());
                };
                if !answer.is_empty() {
                    flow.set_email(&answer);
                }
                if flow.email().is_empty() {
                    continue;
                }

                match flow.submit_email(&auth).await {
                    Ok(()) => prompt.say(&format!("Código enviado para {}", flow.email())),
                    Err(e) => prompt.say(&format!("Erro: {e}")),
                }
            }
            LoginStep::AwaitingVerification => {
                let question =
                    format!("Código ({CODE_LENGTH} dígitos, 'voltar' para trocar o email): ");
                let Some(answer) = prompt.line(&question)? else {
                    prompt.say("Login cancelado.");
                    return Ok(());
                };
                if BACK_WORDS.iter().any(|w| answer.eq_ignore_ascii_case(w)) {
                    flow.back();
                    continue;
                }

                flow.input_code(&answer);
                if !flow.can_verify() {
                    prompt.say(&format!("O código deve ter {CODE_LENGTH} dígitos."));
                    continue;
                }

                match flow.submit_code(&auth, session).await {
                    Ok(LoginOutcome::Authenticated) => {
                        prompt.say("✓ Login realizado");
                        prompt.say(&format!("  Sessão salva em: {}", session.path().display()));
                        return Ok(());
                    }
                    Err(e) => prompt.say(&format!("Erro: {e}")),
                }
            }
        }
    }
}

pub fn logout(client: &ApiClient) -> Result<()> {
    let session = client.session();
    if session.clear()? {
        println!("✓ Sessão encerrada");
        println!("  Sessão removida de: {}", session.path().display());
    } else {
        println!("Nenhuma sessão ativa.");
    }
    Ok(())
}

pub fn status(client: &ApiClient) {
    let session = client.session();
    match session.get() {
        Some(token) => {
            println!("Autenticado (token: {})", mask_token(&token));
            println!("  Sessão: {}", session.path().display());
        }
        None => println!("Não autenticado. Use `t4b login`."),
    }
    println!("  API: {}", client.base_url());
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use t4b_core::api::ApiConfig;
    use t4b_core::session::Session;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn setup() -> (MockServer, TempDir, ApiClient) {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let session = Session::load_from(dir.path().join("session.json")).unwrap();
        let client = ApiClient::new(
            ApiConfig {
                base_url: server.uri(),
                timeout: None,
            },
            Arc::new(session),
        )
        .unwrap();
        (server, dir, client)
    }

    fn scripted(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_back_then_new_email() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/auth/request-code"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-code"))
            .and(body_json(
                serde_json::json!({"email": "other@example.com", "code": "123456"}),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut prompt = scripted("user@example.com\nvoltar\nother@example.com\n123456\n");
        run_login(&client, None, &mut prompt).await.unwrap();

        assert_eq!(client.session().get().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_short_code_is_asked_again_and_eof_cancels() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/auth/request-code"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-code"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut prompt = scripted("123\n");
        run_login(&client, Some("user@example.com"), &mut prompt)
            .await
            .unwrap();

        let shown = String::from_utf8(prompt.into_output()).unwrap();
        assert!(shown.contains("O código deve ter 6 dígitos."));
        assert!(shown.contains("Login cancelado."));
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_existing_session_kept_when_declined() {
        let (_server, _dir, client) = setup().await;
        client.session().set("existing-token-value").unwrap();

        let mut prompt = scripted("n\n");
        run_login(&client, Some("user@example.com"), &mut prompt)
            .await
            .unwrap();

        assert_eq!(
            client.session().get().as_deref(),
            Some("existing-token-value")
        );
    }
}
