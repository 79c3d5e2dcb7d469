//! # Background Reasoning
//!
//! Runs conclusion cycles off the async runtime.
//!
//! A `Session` is not synchronized, so it is moved into
//! `spawn_blocking` together with its generator for each cycle and handed
//! back afterwards. Nothing else can touch it while a cycle runs.

use aletheia_core::{AletheiaError, Conclusion, PersistentStore, Session, TextGenerator};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// What one blocking cycle hands back.
pub type Cycle<S, G> = (Session<S>, Box<G>, Conclusion);

/// Optionally add `premise`, then draw one conclusion on a blocking thread.
pub async fn draw_blocking<S, G>(
    mut session: Session<S>,
    mut generator: Box<G>,
    premise: Option<String>,
) -> Result<Cycle<S, G>, AletheiaError>
where
    S: PersistentStore + Send + 'static,
    G: TextGenerator + Send + ?Sized + 'static,
{
    tokio::task::spawn_blocking(move || {
        if let Some(premise) = premise {
            // A rejected premise is already in the ledger; the draw still runs.
            let _ = session.add_premise(&premise);
        }
        let conclusion = session.draw_conclusion(&mut *generator);
        (session, generator, conclusion)
    })
    .await
    .map_err(|e| AletheiaError::Io(format!("reasoning task failed: {e}")))
}

/// Settings for `think`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkOptions {
    /// Premise added before every round.
    pub prompt: String,
    /// Stop after this many rounds; `None` runs until interrupted.
    pub rounds: Option<u64>,
    pub interval: Duration,
}

/// Reason on a fixed interval until the round limit or Ctrl-C.
///
/// Each round adds the prompt as a premise and draws a conclusion. The
/// first round starts immediately. Returns the session and every
/// conclusion drawn.
pub async fn think<S, G>(
    session: Session<S>,
    generator: Box<G>,
    options: ThinkOptions,
) -> Result<(Session<S>, Vec<Conclusion>), AletheiaError>
where
    S: PersistentStore + Send + 'static,
    G: TextGenerator + Send + ?Sized + 'static,
{
    think_until(session, generator, options, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// `think`, stopping once `shutdown` resolves.
///
/// `shutdown` is polled across rounds, so a signal that arrives while a
/// draw is running stops the loop as soon as that draw returns.
pub async fn think_until<S, G, F>(
    mut session: Session<S>,
    mut generator: Box<G>,
    options: ThinkOptions,
    shutdown: F,
) -> Result<(Session<S>, Vec<Conclusion>), AletheiaError>
where
    S: PersistentStore + Send + 'static,
    G: TextGenerator + Send + ?Sized + 'static,
    F: Future<Output = ()>,
{
    if options.interval.is_zero() {
        return Err(AletheiaError::Config(
            "think interval must be at least 1 second".to_string(),
        ));
    }
    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut conclusions = Vec::new();
    tokio::pin!(shutdown);

    tracing::info!(
        interval_secs = options.interval.as_secs(),
        rounds = ?options.rounds,
        "Background reasoning started"
    );

    let mut round: u64 = 0;
    loop {
        if options.rounds.is_some_and(|max| round >= max) {
            break;
        }
        tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!("Background reasoning interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        let (next_session, next_generator, conclusion) =
            draw_blocking(session, generator, Some(options.prompt.clone())).await?;
        session = next_session;
        generator = next_generator;
        round += 1;

        tracing::info!(
            round,
            validated = conclusion.is_validated(),
            conclusion = %conclusion,
            "Background round finished"
        );
        conclusions.push(conclusion);
    }

    Ok((session, conclusions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aletheia_core::{GeneratorError, MemoryStore};

    struct Fixed(&'static str);

    impl TextGenerator for Fixed {
        fn generate(&mut self, _prompt: &str) -> Result<String, GeneratorError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn draw_blocking_returns_session() {
        let session = Session::with_store(MemoryStore::new());
        let (session, _, conclusion) =
            draw_blocking(session, Box::new(Fixed("q")), Some("p".to_string()))
                .await
                .expect("draw");
        assert!(!conclusion.is_validated());
        assert_eq!(conclusion.premises()[0], "p");
        assert!(session.premises().is_empty());
    }

    #[tokio::test]
    async fn think_stops_after_rounds() {
        let session = Session::with_store(MemoryStore::new());
        let options = ThinkOptions {
            prompt: "p".to_string(),
            rounds: Some(2),
            interval: Duration::from_millis(10),
        };
        let (session, conclusions) = think(session, Box::new(Fixed("q")), options)
            .await
            .expect("think");
        assert_eq!(conclusions.len(), 2);
        assert_eq!(session.ledger().conclusions().len(), 2);
    }

    #[tokio::test]
    async fn think_with_zero_rounds_does_nothing() {
        let session = Session::with_store(MemoryStore::new());
        let options = ThinkOptions {
            prompt: "p".to_string(),
            rounds: Some(0),
            interval: Duration::from_millis(10),
        };
        let (session, conclusions) = think(session, Box::new(Fixed("q")), options)
            .await
            .expect("think");
        assert!(conclusions.is_empty());
        assert!(session.ledger().conclusions().is_empty());
    }

    /// Fires `signal` from inside its first generation.
    struct Signalling(Option<tokio::sync::oneshot::Sender<()>>);

    impl TextGenerator for Signalling {
        fn generate(&mut self, _prompt: &str) -> Result<String, GeneratorError> {
            if let Some(signal) = self.0.take() {
                let _ = signal.send(());
            }
            Ok("q".to_string())
        }
    }

    #[tokio::test]
    async fn shutdown_during_draw_stops_after_that_round() {
        let (signal, received) = tokio::sync::oneshot::channel();
        let session = Session::with_store(MemoryStore::new());
        let options = ThinkOptions {
            prompt: "p".to_string(),
            rounds: None,
            interval: Duration::from_millis(10),
        };
        let shutdown = async {
            let _ = received.await;
        };
        let (session, conclusions) = think_until(
            session,
            Box::new(Signalling(Some(signal))),
            options,
            shutdown,
        )
        .await
        .expect("think");
        assert_eq!(conclusions.len(), 1);
        assert_eq!(session.ledger().conclusions().len(), 1);
    }
}
