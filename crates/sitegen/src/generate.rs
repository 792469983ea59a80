use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use sitegen_core::extract::{extract_files, Strategy};
use sitegen_core::project::{plan_project, ProjectId};
use sitegen_core::prompt::{build_user_prompt, system_prompt};

use crate::error::Error;
use crate::llm::{Completer, CompletionOptions, RigCompleter};
use crate::materialize::{materialize, Bundle};
use crate::prelude::println;

#[derive(Debug, Clone, clap::Args)]
pub struct GeneratorOptions {
    /// Directory that holds generated projects and their archives
    #[arg(long, env = "SITEGEN_GENERATED_DIR", default_value = "generated_projects")]
    pub generated_dir: PathBuf,

    /// How the model is asked to encode multiple files (marker or envelope)
    #[arg(long, env = "SITEGEN_STRATEGY", default_value = "marker")]
    pub strategy: Strategy,

    #[clap(flatten)]
    pub completion: CompletionOptions,
}

#[derive(Debug, clap::Parser)]
#[command(name = "generate")]
#[command(about = "Generate a website from a description without starting the server")]
pub struct App {
    /// Natural-language description of the project
    pub description: String,

    #[clap(flatten)]
    pub options: GeneratorOptions,
}

/// Runs one generation: prompt, completion, extraction, files on disk.
pub struct Generator {
    generated_dir: PathBuf,
    strategy: Strategy,
    completer: Arc<dyn Completer>,
}

impl Generator {
    pub fn new(generated_dir: PathBuf, strategy: Strategy, completer: Arc<dyn Completer>) -> Self {
        Self {
            generated_dir,
            strategy,
            completer,
        }
    }

    /// Build a generator backed by the OpenAI completion client.
    pub fn from_options(options: &GeneratorOptions) -> color_eyre::Result<Self> {
        let completer = RigCompleter::new(&options.completion)?;
        Ok(Self::new(
            options.generated_dir.clone(),
            options.strategy,
            Arc::new(completer),
        ))
    }

    pub fn generated_dir(&self) -> &std::path::Path {
        &self.generated_dir
    }

    pub async fn generate(&self, description: &str) -> Result<Bundle, Error> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation("Missing project description".to_string()));
        }

        let id = ProjectId::from_entropy(rand::random());
        log::info!("Generating project {id} with {} strategy", self.strategy);

        // Call the model
        let response = self
            .completer
            .complete(system_prompt(self.strategy), &build_user_prompt(description))
            .await?;
        log::debug!("Project {id}: model returned {} chars", response.len());

        // Extract files and plan the project
        let entries =
            extract_files(&response, self.strategy).map_err(|e| Error::Parse(e.to_string()))?;
        let plan = plan_project(entries, id);

        for rejected in &plan.rejected {
            log::warn!(
                "Project {}: skipping {:?}: {}",
                plan.id,
                rejected.path,
                rejected.reason
            );
        }
        if plan.files.is_empty() {
            log::warn!("Project {}: model output contained no files", plan.id);
        }

        // Write files and archive
        let root = self.generated_dir.clone();
        let bundle = tokio::task::spawn_blocking(move || materialize(&root, &plan))
            .await
            .map_err(|e| Error::Io(format!("Materialization task failed: {e}")))??;

        log::info!(
            "Project {} written: {} files, archive {}",
            bundle.id,
            bundle.files,
            bundle.archive.display()
        );

        Ok(bundle)
    }
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> color_eyre::Result<()> {
    let generator = Generator::from_options(&app.options)?;

    if global.verbose {
        anstream::eprintln!("Model: {}", app.options.completion.model);
        anstream::eprintln!("Strategy: {}", app.options.strategy);
        anstream::eprintln!("Output: {}", app.options.generated_dir.display());
    }

    // Create spinner for progress indication
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| color_eyre::eyre::eyre!("Invalid spinner template: {e}"))?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message("Generating project...");

    let result = generator.generate(&app.description).await;
    spinner.finish_and_clear();

    let bundle = result.map_err(|e| color_eyre::eyre::eyre!(e))?;

    println!("Project: {}", bundle.id);
    println!("Directory: {}", bundle.directory.display());
    println!("Archive: {}", bundle.archive.display());
    println!("Files: {}", bundle.files);

    Ok(())
}
