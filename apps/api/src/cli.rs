//! Command-line surface: `tailor serve` (default) and a one-shot `tailor generate`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::errors::AppError;
use crate::export::{export, ExportFormat, ExportOptions};
use crate::generation::generator::{generate_resume, GenerationRequest, GenerationSettings};
use crate::llm_client::LlmClient;
use crate::profiles::store::load_profile_file;
use crate::storage::write_atomic;

#[derive(Debug, Parser)]
#[command(name = "tailor", version)]
#[command(about = "Tailor resume profiles to job descriptions with an LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default when no command is given)
    Serve,
    /// Tailor one profile file to one job description and write the export
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Profile JSON file
    #[arg(long)]
    pub profile: PathBuf,
    /// Plain-text job description file
    #[arg(long)]
    pub job: PathBuf,
    /// Where to write the exported resume
    #[arg(long)]
    pub output: PathBuf,
    /// pdf, docx or txt. Defaults to the output file's extension, else pdf
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ExportFormat>,
    /// File with extra context for the model
    #[arg(long)]
    pub extra: Option<PathBuf>,
    #[arg(long)]
    pub no_summary: bool,
    #[arg(long)]
    pub no_projects: bool,
    /// Bullet count for one experience entry, as INDEX=COUNT. Repeatable
    #[arg(long = "bullets", value_parser = parse_bullet_count)]
    pub bullets: Vec<(usize, usize)>,
}

impl GenerateArgs {
    fn resolved_format(&self) -> ExportFormat {
        self.format.unwrap_or_else(|| {
            self.output
                .extension()
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse().ok())
                .unwrap_or(ExportFormat::Pdf)
        })
    }
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse().map_err(|e: crate::errors::AppError| e.to_string())
}

fn parse_bullet_count(raw: &str) -> Result<(usize, usize), String> {
    let (index, count) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=COUNT, got '{raw}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid experience index '{index}'"))?;
    let count = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid bullet count '{count}'"))?;
    Ok((index, count))
}

pub async fn run_generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let profile = load_profile_file(&args.profile).await?;
    if profile.personal_info.name.trim().is_empty() {
        // Export needs a name; fail before any LLM call is spent.
        return Err(AppError::EmptyResume.into());
    }
    let job_description = read_text(&args.job).await?;
    let extra_knowledge = match &args.extra {
        Some(path) => Some(read_text(path).await?),
        None => None,
    };

    let credentials =
        CredentialStore::open(config.credential_path(), config.anthropic_api_key.clone()).await;
    let api_key = credentials.get().await;
    let llm = LlmClient::new().context("Failed to build HTTP client")?;

    let request = GenerationRequest {
        profile_name: args
            .profile
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        job_description,
        extra_knowledge,
        experience_bullet_counts: args.bullets.iter().copied().collect::<BTreeMap<_, _>>(),
        job_title: None,
        company: None,
    };

    let resume = generate_resume(
        &llm,
        api_key.as_deref(),
        &GenerationSettings::from(config),
        &profile,
        &request,
    )
    .await?;

    let format = args.resolved_format();
    let opts = ExportOptions {
        include_summary: !args.no_summary,
        include_projects: !args.no_projects,
    };
    let bytes = export(&resume, format, &opts)?;
    write_atomic(&args.output, &bytes).await?;

    info!(
        "Wrote {format} resume for '{}' to {}",
        request.profile_name,
        args.output.display()
    );
    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["tailor"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "tailor",
            "generate",
            "--profile",
            "jane.json",
            "--job",
            "jd.txt",
            "--output",
            "out/jane.docx",
            "--no-summary",
            "--bullets",
            "0=3",
            "--bullets",
            "2=5",
        ])
        .unwrap();

        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.no_summary);
        assert!(!args.no_projects);
        assert_eq!(args.bullets, vec![(0, 3), (2, 5)]);
        assert_eq!(args.resolved_format(), ExportFormat::Docx);
    }

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let cli = Cli::try_parse_from([
            "tailor", "generate", "--profile", "p.json", "--job", "j.txt", "--output", "out.bin",
            "--format", "txt",
        ])
        .unwrap();
        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.resolved_format(), ExportFormat::Text);
    }

    #[test]
    fn test_bad_bullet_spec_is_rejected() {
        assert!(parse_bullet_count("3").is_err());
        assert!(parse_bullet_count("a=2").is_err());
        assert_eq!(parse_bullet_count(" 1 = 4 ").unwrap(), (1, 4));
    }

    fn test_config(dir: &Path) -> Config {
        Config {
            port: 0,
            rust_log: "info".to_string(),
            profiles_dir: dir.join("profiles"),
            data_dir: dir.join("data"),
            anthropic_api_key: Some("sk-ant-test-abcd".to_string()),
            llm_timeout: std::time::Duration::from_secs(1),
            generation_concurrency: 1,
            history_limit: 20,
        }
    }

    #[tokio::test]
    async fn test_nameless_profile_fails_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("nameless.json");
        tokio::fs::write(&profile, r#"{"summary": "Engineer", "experience": []}"#)
            .await
            .unwrap();
        // Left missing: reaching the job file would mean the name check was skipped.
        let args = GenerateArgs {
            profile,
            job: dir.path().join("jd.txt"),
            output: dir.path().join("out.pdf"),
            format: None,
            extra: None,
            no_summary: false,
            no_projects: false,
            bullets: Vec::new(),
        };

        let err = run_generate(&test_config(dir.path()), args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::EmptyResume)
        ));
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[tokio::test]
    async fn test_missing_profile_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            profiles_dir: dir.path().join("profiles"),
            data_dir: dir.path().join("data"),
            anthropic_api_key: None,
            llm_timeout: std::time::Duration::from_secs(1),
            generation_concurrency: 1,
            history_limit: 20,
        };
        let args = GenerateArgs {
            profile: dir.path().join("missing.json"),
            job: dir.path().join("jd.txt"),
            output: dir.path().join("out.txt"),
            format: None,
            extra: None,
            no_summary: false,
            no_projects: false,
            bullets: Vec::new(),
        };
        assert!(run_generate(&config, args).await.is_err());
        assert!(!dir.path().join("out.txt").exists());
    }
}
