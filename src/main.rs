use clap::{Arg, ArgAction, ArgMatches, Command};
use env_logger::Builder;
use std::{
    path::{Component, Path, PathBuf},
    process::ExitCode,
};

use anyhow::{anyhow, Result};
use converter::ConversionOptions;

mod converter;
mod document_index;
mod frontmatter;
mod link_resolver;
pub mod note;
mod rewriter;
mod slug;
mod wikilink_parser;

fn cli() -> Command {
    Command::new("wikilink2md")
        .version("0.1.0")
        .about("Rewrite wikilinks in a vault of markdown notes into plain markdown links.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert a vault directory into static site content.")
                .arg(
                    Arg::new("input")
                        .help("Path to the vault directory.")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .help("Path to the content directory to write.")
                        .required(true),
                )
                .arg(
                    Arg::new("preserve-structure")
                        .short('p')
                        .long("preserve-structure")
                        .help("Preserve the original directory structure.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("frontmatter")
                        .short('f')
                        .long("frontmatter")
                        .help("Add title and publishDate frontmatter to converted files.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("base-url")
                        .short('b')
                        .long("base-url")
                        .value_name("URL")
                        .help("Base URL prefix for internal links (e.g. /blog)."),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Show what would be converted without writing anything.")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Make `path` absolute against `cwd` and resolve `.` and `..` without
/// touching the filesystem, since the output may not exist yet.
fn normalize_path(cwd: &Path, path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn check_paths(input: &Path, output: &Path) -> Result<()> {
    if input == output {
        return Err(anyhow!("Input and output paths cannot be the same"));
    }
    if output.starts_with(input) {
        return Err(anyhow!("Output path cannot be inside input path"));
    }
    Ok(())
}

fn options_from_matches(matches: &ArgMatches) -> Result<ConversionOptions> {
    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .unwrap_or_default();
    if !base_url.is_empty() && !base_url.starts_with('/') {
        return Err(anyhow!(r#"Base URL must start with "/" (e.g. /blog)"#));
    }

    Ok(ConversionOptions {
        preserve_structure: matches.get_flag("preserve-structure"),
        frontmatter: matches.get_flag("frontmatter"),
        dry_run: matches.get_flag("dry-run"),
        base_url,
    })
}

fn run_convert(matches: &ArgMatches) -> Result<bool> {
    let cwd = std::env::current_dir()?;
    let input = matches
        .get_one::<String>("input")
        .ok_or(anyhow!("Missing input path"))?;
    let output = matches
        .get_one::<String>("output")
        .ok_or(anyhow!("Missing output path"))?;
    let input_path = normalize_path(&cwd, Path::new(input));
    let output_path = normalize_path(&cwd, Path::new(output));
    check_paths(&input_path, &output_path)?;
    let options = options_from_matches(matches)?;

    log::info!(
        "Converting: {} -> {}",
        input_path.display(),
        output_path.display()
    );
    if !options.base_url.is_empty() {
        log::info!("Using base URL: {}", options.base_url);
    }

    let dry_run = options.dry_run;
    let result = converter::convert(input_path.clone(), output_path.clone(), options)?;

    if !result.errors.is_empty() {
        log::error!("Conversion completed with {} errors:", result.errors.len());
        for error in &result.errors {
            log::error!("  {}", error);
        }
    }

    if dry_run {
        log::info!("Dry run completed. No files were modified.");
    } else {
        log::info!(
            "Converted {} files with {} links",
            result.processed_files,
            result.converted_links
        );
        log::info!("  Source: {}", input_path.display());
        log::info!("  Target: {}", output_path.display());
    }

    Ok(result.errors.is_empty())
}

fn main() -> ExitCode {
    // Initialize the logger.
    Builder::new()
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = cli().get_matches();
    let outcome = match matches.subcommand() {
        Some(("convert", sub_matches)) => run_convert(sub_matches),
        _ => Err(anyhow!("Unknown command")),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Conversion failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_matches(args: &[&str]) -> ArgMatches {
        let matches = cli().try_get_matches_from(args).unwrap();
        matches.subcommand_matches("convert").unwrap().clone()
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_convert_flags() -> Result<()> {
        let matches = convert_matches(&[
            "wikilink2md",
            "convert",
            "vault",
            "site",
            "-p",
            "--frontmatter",
            "--base-url",
            "/blog",
            "--dry-run",
        ]);
        let options = options_from_matches(&matches)?;
        assert!(options.preserve_structure);
        assert!(options.frontmatter);
        assert!(options.dry_run);
        assert_eq!(options.base_url, "/blog");
        Ok(())
    }

    #[test]
    fn defaults_to_no_options() -> Result<()> {
        let matches = convert_matches(&["wikilink2md", "convert", "vault", "site"]);
        let options = options_from_matches(&matches)?;
        assert!(!options.preserve_structure);
        assert!(!options.frontmatter);
        assert!(!options.dry_run);
        assert_eq!(options.base_url, "");
        Ok(())
    }

    #[test]
    fn rejects_relative_base_url() {
        let matches = convert_matches(&["wikilink2md", "convert", "a", "b", "-b", "blog"]);
        assert!(options_from_matches(&matches).is_err());
    }

    #[test]
    fn normalizes_paths_lexically() {
        let cwd = Path::new("/home/user");
        assert_eq!(
            normalize_path(cwd, Path::new("vault/../site/./out")),
            PathBuf::from("/home/user/site/out")
        );
        assert_eq!(
            normalize_path(cwd, Path::new("/abs/path")),
            PathBuf::from("/abs/path")
        );
    }

    #[test]
    fn rejects_overlapping_paths() {
        let input = Path::new("/data/vault");
        assert!(check_paths(input, Path::new("/data/vault")).is_err());
        assert!(check_paths(input, Path::new("/data/vault/site")).is_err());
        assert!(check_paths(input, Path::new("/data/vault2")).is_ok());
        assert!(check_paths(input, Path::new("/data/site")).is_ok());
    }
}
