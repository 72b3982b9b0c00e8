use crate::checker_config::CheckerConfig;
use anyhow::Context;
use clap::Parser;
use robots_policy::PolicyDocument;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io, process};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod checker_config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineArgs {
    /// Policy document to read, or `-` for standard input
    #[arg(long, value_name = "PATH")]
    file: PathBuf,

    /// Agent name to check for (defaults to `*`)
    #[arg(long)]
    agent: Option<String>,

    /// URL the document was served from; rules and paths for other hosts are refused
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Paths or URLs to check
    #[arg(value_name = "PATH_OR_URL")]
    paths: Vec<String>,
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("reading policy document from stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main_impl(args: &CommandLineArgs) -> anyhow::Result<()> {
    let checker_config = CheckerConfig::new(args.agent.clone(), args.origin.clone());

    let content = read_document(&args.file)?;
    let document = match checker_config.origin() {
        Some(origin) => PolicyDocument::parse_for_origin(&content, origin),
        None => PolicyDocument::parse(&content),
    }
    .with_context(|| format!("parsing {}", args.file.display()))?;

    if args.paths.is_empty() {
        println!("{}", document.agent(checker_config.agent()));
        for sitemap in document.sitemaps() {
            println!("Sitemap: {}", sitemap);
        }
        return Ok(());
    }

    for path in &args.paths {
        let verdict = if document.allowed(path, checker_config.agent()) {
            "allowed"
        } else {
            "disallowed"
        };
        println!("{} {}", verdict, path);
    }
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(e) = main_impl(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
