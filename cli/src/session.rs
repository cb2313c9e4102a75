//! One divination session: cast, narrate, and stream the reading.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use yarrow_config::YarrowConfig;
use yarrow_divination::DivinationEngine;
use yarrow_interpreter::{HexagramTable, build_divination_prompt, interpret};
use yarrow_providers::{GenerateRequest, OllamaClient, StreamEvent};

use crate::markdown::StreamPrinter;
use crate::narrator::Narrator;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const SECTION_WIDTH: usize = 60;

pub struct Session {
    config: YarrowConfig,
    client: OllamaClient,
    table: HexagramTable,
    narrator: Narrator,
}

impl Session {
    /// Wire up a session from configuration.
    ///
    /// `narration` comes from the command line and can only turn the
    /// ceremony off, never force it on over the config.
    pub fn new(config: YarrowConfig, narration: bool) -> Result<Self> {
        let mut client = OllamaClient::new(&config.ollama.base_url, config.ollama.model.clone())
            .context("invalid Ollama base URL")?;
        if let Some(secs) = config.ollama.timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs));
        }

        let table = match &config.data_path {
            Some(path) => HexagramTable::load(path)
                .with_context(|| format!("loading hexagram data from {}", path.display()))?,
            None => HexagramTable::embedded().clone(),
        };

        let narrator = if narration && config.display.narration {
            Narrator::new(config.display.type_interval_ms)
        } else {
            Narrator::instant()
        };

        Ok(Self {
            config,
            client,
            table,
            narrator,
        })
    }

    pub async fn check_connection(&self) -> bool {
        self.client.check_connection().await
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.client.model()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.client.base_url().to_string()
    }

    /// Run one complete divination for `question`.
    ///
    /// The casting is computed up front; the model request then runs in the
    /// background while the ceremony is replayed, so the wait for the
    /// reading mostly disappears into the narration.
    pub async fn divine(&self, question: &str) -> Result<()> {
        let mut engine = DivinationEngine::with_spread(self.config.divination.spread);
        let result = engine.run();

        let interp = interpret(&self.table, &result.hex_result)?;
        let prompt = build_divination_prompt(question, &interp);
        let request = GenerateRequest {
            prompt: prompt.user,
            system: prompt.system,
            temperature: self.config.ollama.temperature,
        };

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = self.client.clone();
        let generation =
            tokio::spawn(async move { client.generate(&request, &events_tx).await });

        self.narrator.play(&result, &interp).await;

        println!();
        println!("{}", "=".repeat(SECTION_WIDTH));
        println!("正在请AI大师解卦...");
        println!("{}", "=".repeat(SECTION_WIDTH));
        println!();

        self.print_reading(events_rx).await;

        match generation.await {
            Ok(outcome) => outcome.context("interpretation request failed")?,
            Err(e) => anyhow::bail!("interpretation task failed: {e}"),
        }
        Ok(())
    }

    /// Drain the event stream, printing cleaned lines as they complete.
    async fn print_reading(&self, mut events: mpsc::Receiver<StreamEvent>) {
        let mut printer = StreamPrinter::new();
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::TextDelta(delta) => {
                    for line in printer.push(&delta) {
                        println!("{line}");
                    }
                }
                StreamEvent::Done(stats) => {
                    tracing::debug!(?stats, "reading complete");
                    break;
                }
                StreamEvent::Error(message) => {
                    tracing::warn!(error = %message, "reading interrupted");
                    println!();
                    println!("[解卦中断] {message}");
                    break;
                }
            }
        }
        if let Some(rest) = printer.finish() {
            println!("{rest}");
        }
    }
}
