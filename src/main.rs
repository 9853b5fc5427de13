use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use prompty::{RenderContext, TemplateDocument, TemplateError, templates};

#[derive(Parser)]
#[command(name = "prompty")]
#[command(version)]
#[command(
    about = "Load and render .prompty chat template assets",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against a context file
    #[clap(visible_alias = "r")]
    Render {
        /// Template file (defaults to the embedded grounded-chat template)
        template: Option<PathBuf>,
        /// Context file supplying conversation, documents, and other inputs (JSON or YAML)
        #[arg(short, long)]
        context: PathBuf,
        /// Write the rendered prompt to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a template and report authoring smells
    #[clap(visible_alias = "c")]
    Check {
        /// Template file to check
        template: PathBuf,
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },
    /// Write the embedded grounded-chat template to disk
    Init {
        /// Destination path
        #[arg(default_value = "grounded_chat.prompty")]
        path: PathBuf,
    },
    /// List a template's declared inputs as YAML
    Inputs {
        /// Template file to inspect
        template: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { template, context, output } => {
            render(template.as_deref(), &context, output.as_deref())
        }
        Commands::Check { template, strict } => check(&template, strict),
        Commands::Init { path } => init(&path),
        Commands::Inputs { template } => inputs(&template),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_template(path: Option<&Path>) -> Result<TemplateDocument, TemplateError> {
    match path {
        Some(path) => TemplateDocument::load(path),
        None => TemplateDocument::parse(templates::GROUNDED_CHAT),
    }
}

fn render(
    template: Option<&Path>,
    context: &Path,
    output: Option<&Path>,
) -> Result<ExitCode, TemplateError> {
    let template = load_template(template)?;
    let context = RenderContext::load(context)?;
    let prompt = prompty::render(&template, &context)?;

    match output {
        Some(path) => fs::write(path, &prompt)?,
        None => print!("{}", prompt),
    }
    Ok(ExitCode::SUCCESS)
}

fn check(template: &Path, strict: bool) -> Result<ExitCode, TemplateError> {
    let document = TemplateDocument::load(template)?;
    let report = prompty::check(&document);

    for finding in &report.findings {
        println!("{}: {}", finding.severity, finding.message);
    }
    if report.is_clean() {
        println!("✅ {} looks good", template.display());
    }
    Ok(ExitCode::from(report.exit_code(strict)))
}

fn init(path: &Path) -> Result<ExitCode, TemplateError> {
    if path.exists() {
        return Err(TemplateError::DestinationExists(path.display().to_string()));
    }
    fs::write(path, templates::GROUNDED_CHAT)?;
    println!("✅ Wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn inputs(template: &Path) -> Result<ExitCode, TemplateError> {
    let document = TemplateDocument::load(template)?;
    let yaml = serde_yaml::to_string(&document.metadata.inputs)
        .map_err(TemplateError::Metadata)?;
    print!("{}", yaml);
    Ok(ExitCode::SUCCESS)
}
