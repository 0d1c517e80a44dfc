use clap::{Parser, Subcommand};
use std::sync::Arc;

use nano_irc::application::errors::BotError;
use nano_irc::application::messaging::{Collaborators, Disposition, EventRouter};
use nano_irc::application::services::{CommandService, KeywordLanguage};
use nano_irc::domain::entities::Source;
use nano_irc::infrastructure::adapters::ConsoleAdapter;
use nano_irc::infrastructure::config::Config;
use nano_irc::infrastructure::storage::FileLogSink;

#[derive(Parser)]
#[command(name = "nano-irc")]
#[command(about = "A small IRC chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot nick (overrides config)
    #[arg(short, long)]
    nick: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console transport
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(cli.config, cli.nick) {
                tracing::error!("Bot stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("nano-irc v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, nick_override: Option<String>) -> Result<(), BotError> {
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };
    if let Some(nick) = nick_override {
        config.bot.nick = nick;
    }
    config.validate()?;

    tracing::info!("Starting nano-irc: {}", config.bot.name);

    let sink = FileLogSink::new(&config.logging.directory);
    sink.init()?;
    tracing::info!("Logging conversations to {}", config.logging.directory.display());

    let mut commands = CommandService::new(&config.bot.name);
    commands.register_defaults();

    let language = KeywordLanguage::new(
        config
            .language
            .responses
            .iter()
            .map(|rule| (rule.pattern.as_str(), rule.reply.as_str())),
    )?;
    tracing::info!("Loaded {} language rules", language.len());

    let console = Arc::new(ConsoleAdapter::new(
        &config.bot.nick,
        &config.channel.name,
        Source::new(&config.console.nick, &config.console.host),
    ));

    let mut router = EventRouter::new(
        config.router_settings(),
        Collaborators {
            transport: console.clone(),
            commander: Arc::new(commands),
            language: Arc::new(language),
            sink: Arc::new(sink),
        },
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        tracing::info!("Bot started as {} in {}", config.bot.nick, config.channel.name);
        let mut lines = console.lines();

        // Main loop (for console mode)
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => return Err(BotError::Transport(format!("Failed to read input: {}", e))),
            };

            let Some(event) = console.parse_line(&line) else {
                continue;
            };

            match router.handle(event).await {
                Ok(Disposition::Handled { delivered }) => {
                    tracing::debug!("Delivered {} replies", delivered);
                }
                Ok(Disposition::Ignored(signal)) => {
                    tracing::debug!("Ignored {}", signal.as_str());
                }
                Err(e) => tracing::error!("Failed to handle event: {}", e),
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    })
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to generate config: {}", e),
    }
}
