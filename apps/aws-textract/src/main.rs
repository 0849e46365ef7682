//! Textract CLI
//!
//! Runs one document analysis and prints the result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aws_textract::{AnalyseDocument, TextractConfig};

#[derive(Parser, Debug)]
#[command(name = "textract", version, about = "Analyse a document with AWS Textract")]
#[command(group(ArgGroup::new("source").required(true).args(["file", "s3_bucket"])))]
struct Cli {
    /// Feature type to request (TABLES, FORMS, QUERIES, SIGNATURES, LAYOUT)
    #[arg(short, long = "feature", default_value = "TABLES")]
    features: Vec<String>,

    /// Local file to analyse
    #[arg(long)]
    file: Option<PathBuf>,

    /// S3 bucket holding the document
    #[arg(long, requires = "s3_key")]
    s3_bucket: Option<String>,

    /// S3 object key of the document
    #[arg(long, requires = "s3_bucket")]
    s3_key: Option<String>,

    /// Include DocumentMetadata and @metadata in the output
    #[arg(long)]
    metadata: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "aws_textract=info,textract=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = TextractConfig::from_env();

    tracing::info!("Textract region: {}", config.region);

    let mut analyse = AnalyseDocument::from_config(&config)
        .await
        .with_features(cli.features);

    if let Some(path) = cli.file {
        analyse = analyse.file(path)?;
    }
    if let (Some(bucket), Some(key)) = (cli.s3_bucket, cli.s3_key) {
        analyse = analyse.s3(bucket, key)?;
    }
    if cli.metadata {
        analyse = analyse.with_metadata();
    }

    let response = analyse.analyze().await.context("Document analysis failed")?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_s3_source() {
        let cli = Cli::try_parse_from([
            "textract", "--s3-bucket", "bucket", "--s3-key", "file.pdf", "-f", "FORMS", "--metadata",
        ])
        .unwrap();

        assert_eq!(cli.features, ["FORMS"]);
        assert_eq!(cli.s3_bucket.as_deref(), Some("bucket"));
        assert_eq!(cli.s3_key.as_deref(), Some("file.pdf"));
        assert!(cli.metadata);
    }

    #[test]
    fn test_requires_a_source() {
        assert!(Cli::try_parse_from(["textract"]).is_err());
        assert!(Cli::try_parse_from(["textract", "--s3-bucket", "bucket"]).is_err());
    }

    #[test]
    fn test_file_and_s3_conflict() {
        let result = Cli::try_parse_from([
            "textract", "--file", "a.png", "--s3-bucket", "b", "--s3-key", "k",
        ]);
        assert!(result.is_err());
    }
}
