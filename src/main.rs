// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use vtt_translate::app_config::{self, Config, FailurePolicy};
use vtt_translate::app_controller::Controller;
use vtt_translate::file_utils::FileManager;
use vtt_translate::language_utils;
use vtt_translate::providers::ollama::OllamaTranslator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate WebVTT subtitles (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for vtt-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct TranslateArgs {
    /// Input .vtt file, directory, or '-' for stdin
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (single input) or output directory (directory input)
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'fr', 'pt-BR')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'fr', 'pt-BR')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep the original text of cues the backend fails on instead of aborting
    #[arg(short, long)]
    keep_going: bool,

    /// Maximum number of cues translated at the same time
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    jobs: Option<u16>,
}

/// vtt-translate - structure-preserving WebVTT translation
///
/// Translates the text of WebVTT subtitles with a local Ollama model while
/// keeping the header, cue numbers, timings and line layout intact.
#[derive(Parser, Debug)]
#[command(name = "vtt-translate")]
#[command(version)]
#[command(about = "Structure-preserving WebVTT subtitle translation")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "vtt-translate translates WebVTT subtitles cue by cue, keeping timings and line counts.

EXAMPLES:
    vtt-translate talk.vtt                         # Translate using default config
    vtt-translate -f talk.vtt                      # Force overwrite existing output
    vtt-translate -s en -t fr talk.vtt             # Translate from English to French
    vtt-translate -m mistral -j 8 /lectures/       # Whole directory, 8 cues in flight
    vtt-translate -k talk.vtt -o talk.fr.vtt       # Keep original text on backend errors
    cat talk.vtt | vtt-translate -t de - > de.vtt  # Read stdin, write stdout
    vtt-translate completions bash > vtt-translate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: Option<TranslateArgs>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself accepts everything; log::max_level does the filtering
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match (cli.command, cli.translate) {
        (Some(Commands::Completions { shell }), _) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vtt-translate", &mut std::io::stdout());
            Ok(())
        }
        (Some(Commands::Translate(args)), _) | (None, Some(args)) => run_translate(args).await,
        (None, None) => {
            CommandLineOptions::command().print_help()?;
            Err(anyhow!("INPUT_PATH is required when no subcommand is specified"))
        }
    }
}

/// Load `conf.json` (creating it if needed) and apply CLI overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&options.config_path))
        .with_context(|| format!("Failed to load configuration from {}", options.config_path))?;

    if let Some(model) = &options.model {
        config.backend.model = model.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    if options.keep_going {
        config.engine.failure_policy = FailurePolicy::KeepOriginal;
    }

    if let Some(jobs) = options.jobs {
        config.engine.concurrent_requests = usize::from(jobs);
    }

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // A CLI log level applies before the config is even read
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let config = load_config(&options)?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    if language_utils::language_codes_match(&config.source_language, &config.target_language) {
        warn!(
            "Source and target language are both {}; translating anyway",
            language_utils::describe_language(&config.target_language)
        );
    }

    // Only a warning: the backend retries on its own and may come up later
    match OllamaTranslator::from_config(&config).test_connection().await {
        Ok(version) => info!("Connected to Ollama {} at {}", version, config.backend.endpoint),
        Err(e) => warn!("Ollama does not answer at {}: {}", config.backend.endpoint, e),
    }

    info!(
        "Translating {} -> {} with {} ({} concurrent, on failure: {})",
        language_utils::describe_language(&config.source_language),
        language_utils::describe_language(&config.target_language),
        config.backend.model,
        config.engine.concurrent_requests,
        config.engine.failure_policy
    );

    let controller = Controller::with_config(config)?;

    if options.input_path.as_os_str() == "-" {
        return translate_stdin(&controller).await;
    }

    if FileManager::file_exists(&options.input_path) {
        controller
            .run(options.input_path.clone(), options.output.clone(), options.force_overwrite)
            .await?;
    } else if FileManager::dir_exists(&options.input_path) {
        let summary = controller
            .run_folder(options.input_path.clone(), options.output.clone(), options.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) could not be translated", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

/// Read WebVTT or plain text from stdin and write the translation to stdout
async fn translate_stdin(controller: &Controller) -> Result<()> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    let output = controller.translate_text(&content).await?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write to stdout")?;
    stdout.flush()?;

    Ok(())
}
