use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use carevoice::voice::{AudioPlayback, PlayAudio, SpeechSynthesizer, SynthesizeSpeech};
use carevoice::{
    AlertNotifier, Assistant, CompletionClient, Config, NotifyContact, Role, TurnStatus,
    VoiceProfile,
};

/// Carevoice - voice assistant with emergency alerting for elderly care
#[derive(Parser)]
#[command(name = "carevoice", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the audio output device can be opened
    TestSpeaker,
    /// Synthesize text and play it
    TestTts {
        /// Text to speak
        #[arg(default_value = "안녕하세요. 음성 테스트입니다.")]
        text: String,
    },
    /// Send one emergency alert to the configured contact
    TestAlert,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,carevoice=info",
        1 => "info,carevoice=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Fail fast on missing secrets before anything else starts
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestSpeaker => test_speaker(&config),
            Command::TestTts { text } => test_tts(&config, &text).await,
            Command::TestAlert => test_alert(&config).await,
        };
    }

    run_session(config).await
}

/// Run the interactive chat session
async fn run_session(config: Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.voice.temp_dir)?;

    let generator = CompletionClient::new(
        config.api_keys.openai.clone(),
        config.llm_model.clone(),
        config.cache_replies,
    );
    let synthesizer = SpeechSynthesizer::new(
        config.api_keys.openai.clone(),
        config.voice.tts_model.clone(),
    );
    let notifier = AlertNotifier::new(
        config.api_keys.telegram.clone(),
        config.alert_chat_id.clone(),
    );
    let playback = AudioPlayback::new(config.voice.playback, config.voice.temp_dir.clone());

    let mut assistant = Assistant::new(generator, synthesizer, notifier, playback);
    assistant.set_voice(config.voice.voice);
    assistant.set_volume(config.voice.volume);

    println!("실버케어 음성 비서");
    println!("무엇을 도와드릴까요? (/alert 긴급 도움 요청, /voice, /volume, /log, /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/alert" => {
                let status = assistant.handle_alert().await;
                report(&status);
            }
            "/log" => {
                for turn in assistant.session().turns() {
                    let label = match turn.role {
                        Role::User => "사용자",
                        Role::Assistant => "비서",
                    };
                    println!("{label}: {}", turn.content);
                }
            }
            _ if input.starts_with("/voice") => {
                let voice = VoiceProfile::from_label(input.trim_start_matches("/voice"));
                assistant.set_voice(voice);
                println!("음성 선택: {}", voice.display_label());
            }
            _ if input.starts_with("/volume") => {
                match input.trim_start_matches("/volume").trim().parse::<u8>() {
                    Ok(volume) if volume <= 100 => {
                        assistant.set_volume(volume);
                        println!("음량: {volume}");
                    }
                    _ => println!("음량은 0-100 사이로 입력해 주세요."),
                }
            }
            prompt => {
                let status = assistant.handle_prompt(prompt).await;
                if let Some(turn) = assistant.session().turns().last() {
                    if turn.role == Role::Assistant {
                        println!("비서: {}", turn.content);
                    }
                }
                report(&status);
            }
        }
    }

    Ok(())
}

/// Print the user-facing status message, if the turn produced one
fn report(status: &TurnStatus) {
    if let Some(message) = status.user_message() {
        println!("{message}");
    }
}

/// Check that the audio output device can be opened
fn test_speaker(config: &Config) -> anyhow::Result<()> {
    println!("Checking audio output device...");

    let mut playback = AudioPlayback::new(config.voice.playback, config.voice.temp_dir.clone());
    playback.ensure_device_ready()?;

    println!("Output device ready.");
    Ok(())
}

/// Synthesize text and play it through the configured strategy
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"");

    let synthesizer = SpeechSynthesizer::new(
        config.api_keys.openai.clone(),
        config.voice.tts_model.clone(),
    );

    println!("Synthesizing speech...");
    let artifact = synthesizer.synthesize(text, config.voice.voice).await?;
    println!("Got {} bytes of audio data", artifact.bytes.len());

    println!("Playing audio...");
    let mut playback = AudioPlayback::new(config.voice.playback, config.voice.temp_dir.clone());
    playback
        .play(
            &artifact,
            carevoice::PlaybackSettings {
                volume: config.voice.volume,
            },
        )
        .await?;

    println!("Done. If you heard the speech, TTS is working.");
    Ok(())
}

/// Send one emergency alert to the configured contact
async fn test_alert(config: &Config) -> anyhow::Result<()> {
    println!("Sending test alert to chat {}...", config.alert_chat_id);

    let notifier = AlertNotifier::new(
        config.api_keys.telegram.clone(),
        config.alert_chat_id.clone(),
    );
    notifier.send_alert().await?;

    println!("Alert delivered.");
    Ok(())
}
