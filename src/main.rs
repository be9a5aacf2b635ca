use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use axum_server::tls_rustls::RustlsConfig;
use clap::{Parser, Subcommand};
use http::{Method, header::CONTENT_TYPE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use anyhow::anyhow;

use mandarin_gateway::{
    ServerConfig,
    client::{
        AudioPlayer, AudioSink, ChatClient, CommandSink, Conversation, DEFAULT_PLAYBACK_TIMEOUT,
        FileSink, SpeechClient, TUTOR_PLAYBACK_TIMEOUT, Tutor,
    },
    core::OpenAIVoice,
    routes,
    state::AppState,
};

const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
const DEFAULT_PLAYER: &str = "ffplay -nodisp -autoexit -loglevel quiet";

/// Mandarin tutor gateway - speech and chat proxy for Mandarin practice
#[derive(Parser, Debug)]
#[command(name = "mandarin-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug)]
struct PlaybackArgs {
    /// Base URL of a running gateway
    #[arg(short = 's', long = "server", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Voice preset (alloy, echo, fable, onyx, nova, shimmer)
    #[arg(long = "voice", default_value = "alloy")]
    voice: String,

    /// Write audio to this file instead of playing it
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Command used to play audio; the clip path is appended
    #[arg(long = "player", default_value = DEFAULT_PLAYER)]
    player: String,

    /// Seconds to wait for the gateway to return audio
    #[arg(long = "request-timeout", default_value_t = 30)]
    request_timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway
    Serve,

    /// Speak one utterance through a running gateway
    Say {
        /// Text to speak
        text: String,

        #[command(flatten)]
        playback: PlaybackArgs,
    },

    /// Practice conversation with the tutor through a running gateway
    Chat {
        /// Speak the Chinese part of each reply
        #[arg(long = "autoplay")]
        autoplay: bool,

        #[command(flatten)]
        playback: PlaybackArgs,
    },
}

fn build_sink(args: &PlaybackArgs) -> anyhow::Result<Box<dyn AudioSink>> {
    if let Some(path) = &args.out {
        return Ok(Box::new(FileSink::new(path)));
    }

    let mut parts = args.player.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("--player must name a command"))?;
    Ok(Box::new(CommandSink::new(program, parts.collect())))
}

fn parse_voice(name: &str) -> anyhow::Result<OpenAIVoice> {
    OpenAIVoice::parse(name).ok_or_else(|| {
        anyhow!(
            "Unknown voice '{}'. Expected one of: alloy, echo, fable, onyx, nova, shimmer",
            name
        )
    })
}

fn build_tutor(
    http: &reqwest::Client,
    args: &PlaybackArgs,
    playback_timeout: Duration,
) -> anyhow::Result<Tutor<Box<dyn AudioSink>>> {
    let speech = SpeechClient::new(http.clone(), args.server.clone())
        .with_timeout(Duration::from_secs(args.request_timeout));

    Ok(Tutor::new(
        speech,
        AudioPlayer::new(build_sink(args)?).with_timeout(playback_timeout),
        parse_voice(&args.voice)?,
    ))
}

async fn run_say(text: String, args: PlaybackArgs) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let mut tutor = build_tutor(&http, &args, DEFAULT_PLAYBACK_TIMEOUT)?;

    if let Some(notice) = tutor.speak(&text).await {
        eprintln!("{notice}");
    } else if let Some(path) = &args.out {
        println!("Audio written to {}", path.display());
    }
    Ok(())
}

async fn run_chat(autoplay: bool, args: PlaybackArgs) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let chat = ChatClient::new(http.clone(), args.server.clone());
    let mut tutor = build_tutor(&http, &args, TUTOR_PLAYBACK_TIMEOUT)?;
    let mut conversation = Conversation::new();

    if let Some(welcome) = conversation.last() {
        println!("小美: {}", welcome.content);
    }
    println!("(type /voice [name] to show or change the voice, /quit to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Some(rest) = line.strip_prefix("/voice") {
            match rest.trim() {
                "" => println!("Voice: {}", tutor.voice()),
                name => match parse_voice(name) {
                    Ok(voice) => {
                        tutor.set_voice(voice);
                        println!("Voice set to {voice}");
                    }
                    Err(e) => eprintln!("{e}"),
                },
            }
            continue;
        }

        print!("小美: ");
        let result = chat
            .reply(&mut conversation, line, |token| {
                print!("{token}");
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();

        match result {
            Ok(reply) if autoplay => {
                if let Some(notice) = tutor.speak_reply(&reply).await {
                    eprintln!("{notice}");
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("Chat failed: {e}"),
        }
    }

    Ok(())
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let address = config.address();
    let tls_config = config.tls.clone();
    let rate_limit_rps = config.rate_limit_requests_per_second;
    let rate_limit_burst = config.rate_limit_burst_size;
    let cors_origins = config.cors_allowed_origins.clone();
    println!("Starting server on {address}");

    let app_state = AppState::new(config).await;

    let cors_layer = match cors_origins.as_deref() {
        Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(false),
        Some(origins) => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE])
        }
        None => {
            // No allow_origin: browsers block cross-origin requests
            info!(
                "CORS not configured, defaulting to same-origin only. \
                 Set CORS_ALLOWED_ORIGINS to enable cross-origin access."
            );
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE])
        }
    };

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    let app = routes::create_app_router(app_state).layer(cors_layer);
    let app = routes::with_rate_limit(app, rate_limit_rps, rate_limit_burst)
        .ok_or_else(|| anyhow!("Failed to build rate limiter config"))?
        .layer(security_headers);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;

    if let Some(tls) = tls_config {
        let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to load TLS certificates from {} and {}: {}",
                    tls.cert_path.display(),
                    tls.key_path.display(),
                    e
                )
            })?;

        println!("Server listening on https://{} (TLS enabled)", socket_addr);

        axum_server::bind_rustls(socket_addr, rustls_config)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|e| anyhow!("TLS server error: {}", e))?;
    } else {
        println!("Server listening on http://{}", socket_addr);

        let listener = TcpListener::bind(&socket_addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Must run before any TLS connection is attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = if let Some(config_path) = cli.config {
                println!("Loading configuration from {}", config_path.display());
                ServerConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
            } else {
                ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
            };
            run_server(config).await
        }
        Commands::Say { text, playback } => run_say(text, playback).await,
        Commands::Chat { autoplay, playback } => run_chat(autoplay, playback).await,
    }
}
