use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::file_utils::{FileManager, FileType};
use crate::providers::Translator;
use crate::providers::ollama::OllamaTranslator;
use crate::translation::{CachingTranslator, EngineOptions, TranslationCache, TranslationReport, VttTranslator};
use crate::webvtt;

// @module: Application controller for WebVTT translation

/// What happened to a single input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Translated,
    /// Output already existed and overwriting was not requested
    Skipped,
}

/// Counts for a directory run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Document engine over the configured backend
    engine: VttTranslator<dyn Translator>,

    // @field: Cache shared with the caching decorator, when enabled
    cache: Option<TranslationCache>,
}

impl Controller {
    // @method: Create a controller backed by the configured Ollama model
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let backend = OllamaTranslator::from_config(&config);
        debug!("Using model '{}' at {}", backend.model(), config.backend.endpoint);

        Ok(Self::with_translator(config, backend))
    }

    // @method: Create a controller around any translator
    pub fn with_translator<T>(config: Config, translator: T) -> Self
    where
        T: Translator + 'static,
    {
        let options = EngineOptions::from(&config.engine);

        let (translator, cache) = if config.engine.cache_enabled {
            let caching = CachingTranslator::new(translator);
            let cache = caching.cache().clone();
            let translator: Arc<dyn Translator> = Arc::new(caching);
            (translator, Some(cache))
        } else {
            let translator: Arc<dyn Translator> = Arc::new(translator);
            (translator, None)
        };

        Self {
            config,
            engine: VttTranslator::with_options(translator, options),
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate text held in memory.
    ///
    /// WebVTT input goes through the cue engine. Anything else is sent to the
    /// backend as a single block of plain text.
    pub async fn translate_text(&self, content: &str) -> Result<String> {
        if webvtt::looks_like_webvtt(content) {
            let report = self.translate_vtt_text(content).await?;
            info!("{}", report.summary());
            return Ok(report.output());
        }

        self.translate_plain_text(content).await
    }

    /// Translate WebVTT text held in memory
    pub async fn translate_vtt_text(&self, content: &str) -> Result<TranslationReport> {
        let document = webvtt::split(content);
        let report = self.engine.translate_document(&document).await?;
        self.log_report(&report);
        Ok(report)
    }

    /// One backend call for the trimmed text, answer returned with a trailing newline
    pub async fn translate_plain_text(&self, content: &str) -> Result<String> {
        let text = content.trim();
        if text.is_empty() {
            warn!("Input is empty, nothing to translate");
            return Ok("\n".to_string());
        }

        debug!("Input is not WebVTT, translating {} chars as plain text", text.chars().count());
        let translated = self
            .engine
            .translator()
            .translate(text)
            .await
            .context("Failed to translate plain text")?;

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(ProviderError::EmptyResponse).context("Failed to translate plain text");
        }

        Ok(format!("{}\n", translated))
    }

    /// Translate one file, writing next to it unless `output_path` is given
    pub async fn run(&self, input_file: PathBuf, output_path: Option<PathBuf>, force_overwrite: bool) -> Result<FileStatus> {
        let output_path = output_path.unwrap_or_else(|| self.default_output_path(&input_file));
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, &output_path, &multi_progress, force_overwrite)
            .await
    }

    /// Run a single file with progress reporting
    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_path: &Path,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileStatus> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(FileStatus::Skipped);
        }

        if FileManager::detect_file_type(input_file)? != FileType::WebVtt {
            return Err(anyhow!("Not a WebVTT file: {:?}", input_file));
        }

        let content = FileManager::read_to_string(input_file)?;
        let document = webvtt::split(&content);
        if !document.has_header() {
            warn!("{:?} has no WEBVTT header, translating cues anyway", input_file);
        }

        let progress_bar = multi_progress.add(ProgressBar::new(document.cue_count() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cues ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(display_name(input_file));

        let result = self
            .engine
            .translate_document_with_progress(&document, |done, _| progress_bar.set_position(done as u64))
            .await;
        progress_bar.finish_and_clear();

        let report = result.with_context(|| format!("Failed to translate {:?}", input_file))?;
        self.log_report(&report);

        FileManager::write_to_file(output_path, &report.output())?;
        info!(
            "Saved {} ({}, {})",
            output_path.display(),
            report.summary(),
            Self::format_duration(report.elapsed)
        );

        Ok(FileStatus::Translated)
    }

    /// Translate every `.vtt` file under `input_dir`.
    ///
    /// Files that are themselves translations into the target language are
    /// left alone. With `output_root`, the directory layout is mirrored there.
    pub async fn run_folder(&self, input_dir: PathBuf, output_root: Option<PathBuf>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let target_language = &self.config.target_language;
        let files: Vec<PathBuf> = FileManager::find_files(&input_dir, "vtt")?
            .into_iter()
            .filter(|file| !FileManager::is_translated_output(file, target_language))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No WebVTT files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for file in &files {
            folder_pb.set_message(format!("Processing: {}", display_name(file)));

            let output_path = match &output_root {
                Some(root) => self.mirrored_output_path(file, &input_dir, root),
                None => self.default_output_path(file),
            };

            match self
                .run_with_progress(file, &output_path, &multi_progress, force_overwrite)
                .await
            {
                Ok(FileStatus::Translated) => summary.translated += 1,
                Ok(FileStatus::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", display_name(file), e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} translated, {} skipped, {} errors in {}",
            summary.translated,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// `<dir>/<stem>.<target>.vtt` next to the input
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        let output_dir = input_file.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(input_file, output_dir, &self.config.target_language, "vtt")
    }

    fn mirrored_output_path(&self, input_file: &Path, input_dir: &Path, output_root: &Path) -> PathBuf {
        let relative_dir = input_file
            .strip_prefix(input_dir)
            .ok()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));

        FileManager::generate_output_path(
            input_file,
            output_root.join(relative_dir),
            &self.config.target_language,
            "vtt",
        )
    }

    fn log_report(&self, report: &TranslationReport) {
        for failure in &report.failures {
            warn!(
                "Cue {} ({}) kept its original text: {}",
                failure.cue_index + 1,
                failure.timing,
                failure.error
            );
        }

        if let Some(cache) = &self.cache {
            let (hits, misses, hit_rate) = cache.stats();
            debug!(
                "Translation cache: {} hits, {} misses ({:.1}% hit rate)",
                hits,
                misses,
                hit_rate * 100.0
            );
        }
    }

    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        let millis = duration.subsec_millis();

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, millis)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
