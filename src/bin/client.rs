//! Moodchat terminal client
//!
//! Line-based display layer: each line you type is one submission. Drives a
//! conversation controller against a running relay.
//!
//! Usage: `moodchat-client [--minimal]`

use moodchat::config::{load_dotenv, ClientConfig};
use moodchat::controller::{
    execute, find_mood, Controller, Flow, HttpRelayClient, RelayClient, Sender, Stage, UserInput,
    MOOD_CATALOG,
};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Renders controller state to a terminal, printing only what is new
struct Screen<W: Write> {
    out: W,
    printed: usize,
    stage: Option<Stage>,
}

impl<W: Write> Screen<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            stage: None,
        }
    }

    fn refresh(&mut self, controller: &Controller) -> io::Result<()> {
        if self.stage != Some(controller.stage()) {
            self.stage = Some(controller.stage());
            self.stage_intro(controller)?;
        }

        for message in controller.messages().iter().skip(self.printed) {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
            };
            writeln!(self.out, "[{}] {who}: {}", message.timestamp, message.text)?;
        }
        self.printed = controller.messages().len();

        if controller.is_pending() {
            writeln!(self.out, "(bot is typing...)")?;
        } else {
            write!(self.out, "> ")?;
        }
        self.out.flush()
    }

    fn stage_intro(&mut self, controller: &Controller) -> io::Result<()> {
        match controller.stage() {
            Stage::Welcome => writeln!(self.out, "Welcome! What should I call you?"),
            Stage::MoodSelection => {
                writeln!(
                    self.out,
                    "How are you feeling right now? Pick a number or type a mood:"
                )?;
                for (i, mood) in MOOD_CATALOG.iter().enumerate() {
                    writeln!(self.out, "  {}. {} {}", i + 1, mood.emoji, mood.label)?;
                }
                Ok(())
            }
            Stage::AskMood => Ok(()),
            Stage::Chat => match controller.mood() {
                Some(mood) => writeln!(self.out, "--- chat (feeling {mood}) ---"),
                None => writeln!(self.out, "--- chat ---"),
            },
        }
    }
}

/// Map a line typed at the mood menu to a mood label
fn mood_from_line(line: &str) -> String {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| MOOD_CATALOG.get(i)) {
            return option.label.to_string();
        }
    }
    find_mood(line).map_or_else(|| line.to_string(), |m| m.label.to_string())
}

/// Turn a typed line into the input the current stage expects
fn input_for(stage: Stage, line: String) -> UserInput {
    match stage {
        Stage::Welcome => UserInput::Name(line),
        Stage::MoodSelection => UserInput::Mood(mood_from_line(&line)),
        Stage::AskMood | Stage::Chat => UserInput::Text(line),
    }
}

/// Handle one submission. The local update is drawn before the relay call
/// starts; the reply is drawn when it lands.
async fn step<R, W>(
    controller: &mut Controller,
    relay: &R,
    input: UserInput,
    screen: &mut Screen<W>,
) -> io::Result<()>
where
    R: RelayClient + ?Sized,
    W: Write,
{
    let effect = controller.submit(input);
    screen.refresh(controller)?;

    if let Some(effect) = effect {
        tracing::debug!(operation = effect.operation(), "Dispatching relay call");
        let outcome = execute(relay, &effect).await;
        controller.resolve(outcome);
        screen.refresh(controller)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodchat=warn".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "Failed to parse .env");
    }

    let flow = if std::env::args().skip(1).any(|a| a == "--minimal") {
        Flow::Minimal
    } else {
        Flow::Guided
    };

    let config = ClientConfig::from_env();
    let relay = HttpRelayClient::new(&config.relay_url, config.timeout)?;
    tracing::info!(url = %config.relay_url, ?flow, "Client started");

    let mut controller = Controller::new(flow);
    let mut screen = Screen::new(io::stdout());
    screen.refresh(&controller)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }

        let input = input_for(controller.stage(), line);
        step(&mut controller, &relay, input, &mut screen).await?;
    }

    Ok(())
}
