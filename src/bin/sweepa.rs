//! sweepa CLI — a thin binary over `sweepa::engine::run`, proving the
//! library's contract end-to-end. No SARIF/CSV/GitHub-annotation
//! serializers and no colored output; those are outer-surface concerns this
//! repo does not ship (see SPEC_FULL.md §1).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

use sweepa::baseline::Baseline;
use sweepa::engine;
use sweepa::facade::oxc::OxcFacade;
use sweepa::types::Issue;

fn format_usage() -> &'static str {
    "sweepa - reachability engine for dead code and dependency hygiene\n\n\
Usage: sweepa [root] [options]\n\n\
Options:\n  \
  --json                    Emit the issue list as JSON instead of text\n  \
  --baseline <path>         Suppress issues already present in this baseline file\n  \
  --write-baseline <path>   Write the current issue list as a new baseline and exit\n  \
  --fail-on-issues          Exit 1 if any issue (after baseline filtering) remains\n  \
  --help, -h                Show this message\n  \
  --version                 Show version\n\n\
Examples:\n  \
  sweepa                                 # Analyze the current directory\n  \
  sweepa src --json                      # JSON output for a subdirectory\n  \
  sweepa --baseline .sweepa-baseline.json --fail-on-issues\n"
}

struct ParsedArgs {
    root: PathBuf,
    json: bool,
    baseline_path: Option<PathBuf>,
    write_baseline_path: Option<PathBuf>,
    fail_on_issues: bool,
    show_help: bool,
    show_version: bool,
}

fn parse_args() -> Result<ParsedArgs> {
    let mut root = None;
    let mut json = false;
    let mut baseline_path = None;
    let mut write_baseline_path = None;
    let mut fail_on_issues = false;
    let mut show_help = false;
    let mut show_version = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--fail-on-issues" => fail_on_issues = true,
            "--help" | "-h" => show_help = true,
            "--version" => show_version = true,
            "--baseline" => {
                let value = args.next().context("--baseline requires a path")?;
                baseline_path = Some(PathBuf::from(value));
            }
            "--write-baseline" => {
                let value = args.next().context("--write-baseline requires a path")?;
                write_baseline_path = Some(PathBuf::from(value));
            }
            other if !other.starts_with('-') && root.is_none() => {
                root = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("unrecognized argument '{}'", other),
        }
    }

    Ok(ParsedArgs {
        root: root.unwrap_or_else(|| PathBuf::from(".")),
        json,
        baseline_path,
        write_baseline_path,
        fail_on_issues,
        show_help,
        show_version,
    })
}

fn print_text(root: &Path, issues: &[Issue]) {
    if issues.is_empty() {
        println!("no issues found");
        return;
    }
    for issue in issues {
        let relative = issue.file.strip_prefix(root).unwrap_or(&issue.file);
        println!(
            "{}:{}:{} [{}] {} — {}",
            relative.display(),
            issue.line,
            issue.column,
            issue.kind.as_str(),
            issue.name,
            issue.message
        );
    }
    println!("\n{} issue(s)", issues.len());
}

fn print_json(issues: &[Issue]) -> Result<()> {
    let text = serde_json::to_string_pretty(issues).context("failed to serialize issues")?;
    println!("{}", text);
    Ok(())
}

fn main() -> Result<ExitCode> {
    let parsed = parse_args()?;

    if parsed.show_help {
        println!("{}", format_usage());
        return Ok(ExitCode::SUCCESS);
    }
    if parsed.show_version {
        println!("sweepa {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let root = parsed.root.canonicalize().unwrap_or(parsed.root.clone());
    let facade = OxcFacade::new(root.clone());
    let issues = engine::run(&root, &facade);

    if let Some(path) = &parsed.write_baseline_path {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let baseline = Baseline::create(&root, &issues, timestamp);
        let json = baseline.to_json().context("failed to serialize baseline")?;
        std::fs::write(path, json).with_context(|| format!("failed to write baseline to {}", path.display()))?;
        println!("wrote baseline with {} issue(s) to {}", issues.len(), path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let reported: Vec<Issue> = match &parsed.baseline_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read baseline at {}", path.display()))?;
            let baseline = Baseline::from_json(&content).context("failed to parse baseline")?;
            baseline.filter_new(&root, &issues).into_iter().cloned().collect()
        }
        None => issues,
    };

    if parsed.json {
        print_json(&reported)?;
    } else {
        print_text(&root, &reported);
    }

    if parsed.fail_on_issues && !reported.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
