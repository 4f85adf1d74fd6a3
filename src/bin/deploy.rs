//! Pushes the application bundle to a hosted "apps" workspace by driving the
//! platform's command line tool.
//!
//! The steps run in order and stop at the first failure: version probe,
//! workspace probe, deploy. The process exits 0 only if all three succeed.

use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitCode, Output};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "deploy")]
#[command(about = "Deploy the todo app with the platform CLI")]
struct Cli {
    /// CLI binary to invoke.
    #[arg(long, default_value = "databricks")]
    cli: String,
    #[arg(long, default_value = "todo-app")]
    app_name: String,
    #[arg(long, default_value = ".")]
    source_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum DeployError {
    #[error("`{cli}` not found")]
    CliMissing { cli: String, source: io::Error },
    #[error("failed to run `{cli}`: {source}")]
    Spawn { cli: String, source: io::Error },
    #[error("`{cli} --version` exited with {code}")]
    VersionProbe { cli: String, code: String, stderr: String },
    #[error("cannot connect to the workspace ({code})")]
    Workspace { cli: String, code: String, stderr: String },
    #[error("deployment failed ({code})")]
    Deploy { code: String, stderr: String },
}

impl DeployError {
    /// Operator-facing follow-up printed after the error line.
    fn hint(&self) -> Option<String> {
        match self {
            DeployError::CliMissing { cli, .. } => Some(format!(
                "Install the CLI, then configure it with: {} configure --token",
                cli
            )),
            DeployError::VersionProbe { cli, stderr, .. } => Some(format!(
                "{}\nInstall the CLI, then configure it with: {} configure --token",
                stderr.trim(),
                cli
            )),
            DeployError::Workspace { cli, stderr, .. } => {
                Some(format!("{}\nPlease run: {} configure --token", stderr.trim(), cli))
            }
            DeployError::Deploy { stderr, .. } => Some(stderr.trim().to_string()),
            DeployError::Spawn { .. } => None,
        }
    }
}

fn exit_code(output: &Output) -> String {
    match output.status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn run(cli: &str, args: &[&str]) -> Result<Output, DeployError> {
    log::debug!("running {} {}", cli, args.join(" "));
    Command::new(cli).args(args).output().map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            DeployError::CliMissing { cli: cli.to_string(), source }
        } else {
            DeployError::Spawn { cli: cli.to_string(), source }
        }
    })
}

fn check_cli(cli: &str) -> Result<String, DeployError> {
    let output = run(cli, &["--version"])?;
    if !output.status.success() {
        return Err(DeployError::VersionProbe {
            cli: cli.to_string(),
            code: exit_code(&output),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_workspace(cli: &str) -> Result<(), DeployError> {
    let output = run(cli, &["workspace", "list", "/"])?;
    if !output.status.success() {
        return Err(DeployError::Workspace {
            cli: cli.to_string(),
            code: exit_code(&output),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn deploy_args(args: &Cli) -> Vec<String> {
    vec![
        "apps".to_string(),
        "deploy".to_string(),
        "--source-dir".to_string(),
        args.source_dir.display().to_string(),
        "--app-name".to_string(),
        args.app_name.clone(),
    ]
}

fn deploy(args: &Cli) -> Result<String, DeployError> {
    println!("Starting deployment of {}", args.app_name);

    let version = check_cli(&args.cli)?;
    println!("ok: {} found: {}", args.cli, version);

    check_workspace(&args.cli)?;
    println!("ok: connected to workspace");

    let deploy_args = deploy_args(args);
    println!("Running: {} {}", args.cli, deploy_args.join(" "));

    let argv: Vec<&str> = deploy_args.iter().map(String::as_str).collect();
    let output = run(&args.cli, &argv)?;
    if !output.status.success() {
        return Err(DeployError::Deploy {
            code: exit_code(&output),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match deploy(&args) {
        Ok(stdout) => {
            println!("ok: app deployed");
            if !stdout.trim().is_empty() {
                println!("{}", stdout.trim_end());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            if let Some(hint) = e.hint().filter(|h| !h.is_empty()) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
