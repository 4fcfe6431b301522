use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use driftguard_analysis::pipeline::{DriftPipeline, DriftReport};
use driftguard_core::{CodeBundle, DriftguardConfig, OutputFormat};
use driftguard_report::{report_drift, PrContext, ReportOutcome};

#[derive(Parser)]
#[command(
    name = "driftguard",
    version,
    about = "Catch documentation drifting away from the code it describes",
    long_about = "Driftguard asks an LLM whether your documentation contradicts what your code\n\
                   actually does, posts the finding to the pull request, and fails the CI check.\n\n\
                   Examples:\n  \
                     driftguard check --code src/refund.py --doc docs/refunds.md\n  \
                     driftguard check --code 'a.py b.py' --doc README.md --fail-on-drift false\n  \
                     driftguard init                 Create a .driftguard.toml config file\n  \
                     driftguard doctor               Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .driftguard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summary (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Audit documentation against code and fail CI on drift
    #[command(long_about = "Audit documentation against code and fail CI on drift.\n\n\
        Runs a two-stage LLM analysis: first the behavioral intent of the code is\n\
        extracted, then the documentation is audited against it. When drift is found\n\
        the verdict is posted as a PR comment (if GitHub context is available) and\n\
        the process exits non-zero unless --fail-on-drift false is set.\n\n\
        Examples:\n  driftguard check --code src/refund.py --doc docs/refunds.md\n  \
        driftguard check --code 'src/a.py src/b.py' --doc README.md\n  \
        driftguard check --code src/lib.rs --doc docs/api.md --fail-on-drift false")]
    Check {
        /// Code file(s) to analyze (a value may hold several space-separated paths)
        #[arg(
            long = "code",
            required = true,
            num_args = 1..,
            long_help = "Code file(s) to analyze.\n\nRepeat the flag or pass several space-separated paths in one value\n(CI matrices often pass a quoted file list as a single argument)."
        )]
        code: Vec<String>,

        /// Documentation file to audit
        #[arg(long)]
        doc: PathBuf,

        /// Exit non-zero when drift is detected
        #[arg(
            long,
            default_value_t = true,
            action = clap::ArgAction::Set,
            long_help = "Whether drift fails the build.\n\nPass --fail-on-drift false to report drift (console + PR comment)\nwhile keeping the exit code at zero."
        )]
        fail_on_drift: bool,
    },
    /// Create a default .driftguard.toml configuration file
    #[command(long_about = "Create a default .driftguard.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .driftguard.toml already exists.")]
    Init,
    /// Check your driftguard setup and environment
    #[command(long_about = "Check your driftguard setup and environment.\n\n\
        Runs diagnostics for the config file, LLM provider and API key, GitHub\n\
        token, repository slug, and PR number resolution. Use --format json for\n\
        machine-readable output.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m\u{26a1}\x1b[0m \x1b[1mdriftguard\x1b[0m v{version} — documentation that stays honest\n");

        println!("Quick start:");
        println!("  \x1b[36mdriftguard init\x1b[0m                                    Create a .driftguard.toml config file");
        println!("  \x1b[36mdriftguard check --code src/x.py --doc README.md\x1b[0m   Audit docs against code\n");

        println!("All commands:");
        println!("  \x1b[32mcheck\x1b[0m    LLM audit of documentation against code, with PR reporting");
        println!("  \x1b[32mdoctor\x1b[0m   Check your setup and environment");
        println!("  \x1b[32minit\x1b[0m     Create default configuration\n");
    } else {
        println!("driftguard v{version} — documentation that stays honest\n");

        println!("Quick start:");
        println!("  driftguard init                                    Create a .driftguard.toml config file");
        println!("  driftguard check --code src/x.py --doc README.md   Audit docs against code\n");

        println!("All commands:");
        println!("  check    LLM audit of documentation against code, with PR reporting");
        println!("  doctor   Check your setup and environment");
        println!("  init     Create default configuration\n");
    }

    println!("Run 'driftguard <command> --help' for details.");
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &DriftguardConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    let config_path = std::path::Path::new(".driftguard.toml");
    if config_path.exists() {
        checks.push(CheckResult::pass("config_file", ".driftguard.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".driftguard.toml not found",
            "run 'driftguard init' to create a default config",
        ));
    }

    // 2. LLM provider + API key
    let llm_env_var = config.llm.api_key_env();
    checks.push(CheckResult::pass(
        "llm_provider",
        format!(
            "{} ({} candidate models)",
            config.llm.provider,
            config.llm.models.len()
        ),
    ));
    if config.llm.api_key.is_some() || std::env::var(llm_env_var).is_ok() {
        checks.push(CheckResult::pass(
            "llm_api_key",
            format!("{llm_env_var} set"),
        ));
    } else {
        checks.push(CheckResult::fail(
            "llm_api_key",
            format!("{llm_env_var} not set"),
            format!("export {llm_env_var}=... or set api_key in .driftguard.toml"),
        ));
    }
    checks.push(CheckResult::info(
        "candidate_models",
        config.llm.models.join(" > "),
    ));

    // 3. GitHub reporting context
    let ctx = PrContext::from_env(&config.github);
    if ctx.token.is_some() {
        checks.push(CheckResult::pass("github_token", "GITHUB_TOKEN set"));
    } else {
        checks.push(CheckResult::fail(
            "github_token",
            "GITHUB_TOKEN not set",
            "export GITHUB_TOKEN=... (needed to post PR comments)",
        ));
    }
    match &ctx.repository {
        Some(slug) => checks.push(CheckResult::pass("repository", slug.clone())),
        None => checks.push(CheckResult::fail(
            "repository",
            "GITHUB_REPOSITORY not set",
            "export GITHUB_REPOSITORY=owner/name or set repository in .driftguard.toml",
        )),
    }
    match ctx.resolve_pr_number() {
        Some(number) => checks.push(CheckResult::pass(
            "pr_number",
            format!("resolved to #{number}"),
        )),
        None => checks.push(CheckResult::info(
            "pr_number",
            "not resolvable (PR comments will be skipped)",
        )),
    }

    // Output
    match format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let version = env!("CARGO_PKG_VERSION");
            println!("Driftguard v{version} — Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<20} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

fn print_verdict(report: &DriftReport, use_color: bool) {
    let status = if report.verdict.has_drift {
        if use_color {
            "\x1b[1m\x1b[31mDRIFT DETECTED\x1b[0m"
        } else {
            "DRIFT DETECTED"
        }
    } else if use_color {
        "\x1b[1m\x1b[32mIN SYNC\x1b[0m"
    } else {
        "IN SYNC"
    };

    println!("Status:  {status}");
    println!("Risk:    {}", report.verdict.risk_level);
    if !report.verdict.summary.is_empty() {
        println!("Summary: {}", report.verdict.summary);
    }
    println!(
        "Models:  intent={} audit={} | Files: {}",
        report.stats.intent_model, report.stats.audit_model, report.stats.files_analyzed,
    );

    if report.verdict.has_drift && !report.verdict.details.is_empty() {
        println!("\nDetails:\n{}", report.verdict.details);
    }
}

const DEFAULT_CONFIG: &str = r#"# Driftguard Configuration
# See: https://github.com/driftguard/driftguard

[llm]
# provider = "gemini"
# models = ["gemini-2.0-flash", "gemini-2.0-flash-001", "gemini-1.5-flash"]
# api_key is taken from GEMINI_API_KEY / OPENAI_API_KEY / ANTHROPIC_API_KEY
# base_url = "https://generativelanguage.googleapis.com/v1beta/openai"

[github]
# token is taken from GITHUB_TOKEN
# repository = "owner/name"
# pr_number = 123
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DriftguardConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".driftguard.toml");
            if default_path.exists() {
                DriftguardConfig::from_file(default_path)?
            } else {
                DriftguardConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!(
            "provider: {} | candidate models: {}",
            config.llm.provider,
            config.llm.models.join(" > "),
        );
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Check {
            ref code,
            ref doc,
            fail_on_drift,
        }) => {
            // CI matrices often pass several paths as one quoted string
            let code_paths: Vec<PathBuf> = code
                .iter()
                .flat_map(|item| item.split_whitespace())
                .map(PathBuf::from)
                .collect();
            if code_paths.is_empty() {
                miette::bail!("no code files given");
            }

            // Missing API key is fatal before any network I/O
            let mut llm_config = config.llm.clone();
            if llm_config.api_key.is_none() {
                llm_config.api_key = std::env::var(llm_config.api_key_env()).ok();
            }
            if llm_config.api_key.is_none() {
                let env_var = llm_config.api_key_env();
                miette::bail!(miette::miette!(
                    help = format!(
                        "Set {env_var} or add api_key in your .driftguard.toml under [llm]"
                    ),
                    "No API key configured for LLM provider '{}'",
                    llm_config.provider
                ));
            }

            let bundle = CodeBundle::from_paths(&code_paths)?;
            let doc_text = driftguard_core::read_doc(doc)?;

            let client = driftguard_analysis::llm::CompletionClient::new(&llm_config)?;
            let pipeline = DriftPipeline::new(client);

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message("Step 1/2: Extracting code intent...");
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let intent = pipeline.extract_intent(&bundle).await.inspect_err(|_e| {
                if let Some(pb) = &spinner {
                    pb.finish_with_message("Failed");
                }
            })?;

            if let Some(pb) = &spinner {
                pb.set_message("Step 2/2: Auditing documentation...");
            }

            let report = pipeline
                .audit(&intent, &bundle, &doc_text)
                .await
                .inspect_err(|_e| {
                    if let Some(pb) = &spinner {
                        pb.finish_with_message("Failed");
                    }
                })?;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    print!("{}", report.to_markdown());
                }
                OutputFormat::Text => {
                    print_verdict(&report, use_color);
                }
            }

            if report.verdict.has_drift {
                let ctx = PrContext::from_env(&config.github);
                match report_drift(&report.verdict, &ctx).await {
                    ReportOutcome::Posted { number } => {
                        eprintln!("Posted drift report to thread #{number}");
                    }
                    ReportOutcome::Skipped { reason } => {
                        eprintln!("Skipping PR comment: {reason}");
                    }
                    ReportOutcome::Failed { reason } => {
                        eprintln!("warning: failed to post PR comment: {reason}");
                    }
                }

                if fail_on_drift {
                    std::process::exit(1);
                }
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".driftguard.toml");
            if path.exists() {
                miette::bail!(".driftguard.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .driftguard.toml with default configuration");
        }
        Some(Command::Doctor) => {
            run_doctor(&config, cli.format, use_color)?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "driftguard", &mut std::io::stdout());
        }
    }

    Ok(())
}
