//! Confirmation gate for destructive operations.

use std::future::Future;

use anyhow::Result;

pub const DELETE_BIKE_MESSAGE: &str =
    "Tem certeza que deseja excluir esta bicicleta? Esta ação não pode ser desfeita.";
pub const DELETE_MAINTENANCE_MESSAGE: &str =
    "Tem certeza que deseja excluir esta manutenção? Esta ação não pode ser desfeita.";

/// Yes/no prompt shown to the user.
pub trait Confirm {
    /// Shows `message` and returns whether the user accepted.
    ///
    /// # Errors
    /// Returns an error if the prompt cannot be shown or answered.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Outcome of a gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed<T> {
    Done(T),
    Cancelled,
}

/// Prompts exactly once and runs `op` only if the user accepts.
///
/// `op` is a closure so nothing is sent when the prompt is declined.
///
/// # Errors
/// Propagates prompt failures and the error of `op`.
pub async fn confirm_then<C, F, Fut, T, E>(
    prompt: &mut C,
    message: &str,
    op: F,
) -> Result<Confirmed<T>>
where
    C: Confirm + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Into<anyhow::Error>,
{
    if !prompt.confirm(message)? {
        tracing::debug!("destructive operation cancelled");
        return Ok(Confirmed::Cancelled);
    }
    op().await.map(Confirmed::Done).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Scripted {
        answer: bool,
        asked: Vec<String>,
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, message: &str) -> Result<bool> {
            self.asked.push(message.to_string());
            Ok(self.answer)
        }
    }

    #[tokio::test]
    async fn test_accept_runs_once() {
        let mut prompt = Scripted {
            answer: true,
            asked: Vec::new(),
        };
        let calls = Cell::new(0);
        let counter = &calls;

        let outcome = confirm_then(&mut prompt, DELETE_BIKE_MESSAGE, move || async move {
            counter.set(counter.get() + 1);
            Ok::<_, anyhow::Error>(7)
        })
        .await
        .unwrap();

        assert_eq!(outcome, Confirmed::Done(7));
        assert_eq!(calls.get(), 1);
        assert_eq!(prompt.asked, vec![DELETE_BIKE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_decline_never_runs() {
        let mut prompt = Scripted {
            answer: false,
            asked: Vec::new(),
        };
        let calls = Cell::new(0);
        let counter = &calls;

        let outcome = confirm_then(&mut prompt, DELETE_MAINTENANCE_MESSAGE, move || async move {
            counter.set(counter.get() + 1);
            Ok::<_, anyhow::Error>(())
        })
        .await
        .unwrap();

        assert_eq!(outcome, Confirmed::Cancelled);
        assert_eq!(calls.get(), 0);
        assert_eq!(prompt.asked.len(), 1);
    }

    #[tokio::test]
    async fn test_operation_error_propagates() {
        let mut prompt = Scripted {
            answer: true,
            asked: Vec::new(),
        };
        let result = confirm_then(&mut prompt, "?", || async {
            Err::<(), _>(crate::api::ApiError::http_status(500, ""))
        })
        .await;
        assert!(result.is_err());
    }
}
