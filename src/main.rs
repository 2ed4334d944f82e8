use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use voice_assist::{
    Config, HttpSuggestionClient, NativeRecognizerFactory, NullSynthesizer, ProcessSynthesizer,
    RecognizerFactory, ScriptedRecognizer, ScriptedRecognizerFactory, SessionController,
    Synthesizer, UiEvent,
};

#[derive(Parser)]
#[command(
    name = "voice-assist",
    about = "One-shot voice capture with spoken suggestion playback"
)]
struct Args {
    /// Config file base path (extension resolved by format)
    #[arg(long, default_value = "config/voice-assist")]
    config: String,

    /// Simulate capture of these phrases instead of using a platform
    /// engine (one phrase per capture attempt, in order)
    #[arg(long = "simulate")]
    simulate: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("voice-assist v0.1.0");
    info!("suggestion endpoint: {}", cfg.suggestion.url);
    info!(
        "capture locale: {}, auto-stop after {:?}",
        cfg.recognition.locale,
        cfg.recognition.auto_stop()
    );

    let recognizers: Arc<dyn RecognizerFactory> = if args.simulate.is_empty() {
        Arc::new(NativeRecognizerFactory)
    } else {
        let scripted = args
            .simulate
            .iter()
            .map(|phrase| ScriptedRecognizer::with_result(phrase, Some(0.9)))
            .collect();
        Arc::new(ScriptedRecognizerFactory::new(scripted))
    };

    let suggestions = Arc::new(HttpSuggestionClient::new(&cfg.suggestion)?);
    let synthesizer: Arc<dyn Synthesizer> = match ProcessSynthesizer::from_config(&cfg.synthesis) {
        Some(tts) => Arc::new(tts),
        None => Arc::new(NullSynthesizer),
    };

    let (controller, mut ui_rx) =
        SessionController::new(cfg.recognition.clone(), recognizers, suggestions, synthesizer);

    // The last rendered suggestion list, so numeric commands can pick from it.
    let rendered = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));

    tokio::spawn({
        let rendered = rendered.clone();
        async move {
            while let Some(event) = ui_rx.recv().await {
                match event {
                    UiEvent::Affordance(affordance) => println!("{}", affordance.label()),
                    UiEvent::Transcript(text) => println!("\"{}\"", text),
                    UiEvent::TranscriptCleared => {}
                    UiEvent::Suggestions(set) => {
                        let mut items = rendered
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        *items = set.items.clone();
                        for (i, item) in set.items.iter().enumerate() {
                            println!("  {}. {}", i + 1, item);
                        }
                    }
                    UiEvent::Notice(notice) => {
                        let marker = if notice.blocking { "[!]" } else { "[i]" };
                        println!("{} {}", marker, notice.text);
                    }
                }
            }
        }
    });

    println!("commands: start | stop | <number to speak> | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, tearing down");
                controller.teardown().await;
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    controller.teardown().await;
                    break;
                };
                match line.trim() {
                    "" => {}
                    "start" => {
                        let _ = controller.start().await;
                    }
                    "stop" => controller.teardown().await,
                    "quit" | "exit" => {
                        controller.teardown().await;
                        break;
                    }
                    other => match other.parse::<usize>() {
                        Ok(n) => {
                            let chosen = {
                                let items = rendered
                                    .lock()
                                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                                n.checked_sub(1).and_then(|i| items.get(i).cloned())
                            };
                            match chosen {
                                Some(text) => controller.speak(&text).await,
                                None => println!("no suggestion #{}", n),
                            }
                        }
                        Err(_) => println!("commands: start | stop | <number to speak> | quit"),
                    },
                }
            }
        }
    }

    Ok(())
}
