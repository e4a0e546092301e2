//! missing-post - announce the newest missing-person records on X

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use libmissingcast::announcer::post_image;
use libmissingcast::logging::{init_default, LogFormat, LoggingConfig};
use libmissingcast::platforms::x::XClient;
use libmissingcast::{
    Announcer, Config, HttpMediaFetcher, MissingcastError, MySqlRecordStore, PipelineOutcome,
    RunReport,
};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "missing-post")]
#[command(version, about = "Announce the newest missing-person records on X")]
#[command(long_about = r#"Announce the newest missing-person records on X.

Reads the most recent row of the missing_persons and mirror_missing_persons
tables, writes a Thai-language announcement for each, and posts it with the
person's photo when one is available.

ENVIRONMENT:
    API_KEY, API_KEY_SECRET          X app consumer credentials (required)
    ACCESS_TOKEN, ACCESS_SECRET      X user access credentials (required)
    DB_HOST, DB_PORT, DB_USER,       MySQL connection
    DB_PASSWORD, DB_NAME             (default: localhost:3306, admin, missing_persons_db)
    MISSINGCAST_LOG_FORMAT           text, json or pretty (default: text)
    MISSINGCAST_LOG_LEVEL            error, warn, info, debug, trace (default: info)

EXIT CODES:
    0 - Run finished (including when there was nothing to post)
    1 - Configuration, authentication, database or other fatal error
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Compose and log posts without downloading photos or publishing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Output format for the run summary
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log format (text, json or pretty); overrides MISSINGCAST_LOG_FORMAT
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Announce the newest record from each table (default)
    Run,

    /// Upload a local image and post it with a caption
    PostImage {
        /// Image file (jpg, png, gif or webp)
        file: PathBuf,

        /// Caption for the post
        #[arg(short, long, default_value = "Bot posting an image!")]
        text: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match (cli.log_format, cli.verbose) {
        (None, false) => init_default(),
        (format, verbose) => {
            let mut logging = LoggingConfig::from_env(verbose);
            if let Some(format) = format {
                logging.format = format;
            }
            logging.init();
        }
    }

    if let Err(e) = run(cli).await {
        error!(error = %format!("{:#}", e), "Run aborted");
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<MissingcastError>()
        .map(MissingcastError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let publisher = XClient::new(config.x);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let store = MySqlRecordStore::from_config(&config.database);
            let media = HttpMediaFetcher::default();

            let report = Announcer::new(&store, &media, &publisher)
                .dry_run(cli.dry_run)
                .run()
                .await?;

            print_report(&report, cli.format)?;
        }
        Command::PostImage { file, text } => {
            if cli.dry_run {
                println!("Would post {} with caption: {}", file.display(), text);
                return Ok(());
            }

            let post_id = post_image(&publisher, &file, &text)
                .await
                .with_context(|| format!("Failed to post {}", file.display()))?;

            match cli.format {
                OutputFormat::Text => println!("x:{}", post_id),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "platform": "x", "post_id": post_id })
                ),
            }
        }
    }

    Ok(())
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("account: {}", report.account);
            println!("primary: {}", describe(&report.primary));
            println!("mirror: {}", describe(&report.mirror));
        }
    }
    Ok(())
}

fn describe(outcome: &PipelineOutcome) -> String {
    match outcome {
        PipelineOutcome::Skipped => "skipped (no record)".to_string(),
        PipelineOutcome::Published { post_id } => format!("published x:{}", post_id),
        PipelineOutcome::Failed { error } => format!("failed: {}", error),
        PipelineOutcome::DryRun { text } => format!("dry run\n{}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_run() {
        let cli = Cli::try_parse_from(["missing-post"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_post_image() {
        let cli = Cli::try_parse_from(["missing-post", "post-image", "photo.png", "--text", "hi"])
            .unwrap();
        match cli.command {
            Some(Command::PostImage { file, text }) => {
                assert_eq!(file, PathBuf::from("photo.png"));
                assert_eq!(text, "hi");
            }
            other => panic!("Expected post-image, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_log_format() {
        let cli = Cli::try_parse_from(["missing-post", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));

        assert!(Cli::try_parse_from(["missing-post", "--log-format", "yaml"]).is_err());
    }

    #[test]
    fn test_exit_code_from_library_error() {
        let err = anyhow::Error::new(MissingcastError::InvalidInput("bad".to_string()));
        assert_eq!(exit_code(&err), 1);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(describe(&PipelineOutcome::Skipped), "skipped (no record)");
        assert_eq!(
            describe(&PipelineOutcome::Published {
                post_id: "9".to_string()
            }),
            "published x:9"
        );
    }
}
