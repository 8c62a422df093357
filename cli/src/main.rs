//! Command-line front end for the touchkit authentication bridge.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use owo_colors::OwoColorize;
use touchkit::{AuthContext, CancelHandle, Policy};

#[derive(Parser, Debug)]
#[command(name = "touchid")]
#[command(
    about = "Verify the user's presence with TouchID or the device password",
    long_about = None
)]
struct Cli {
    /// Reason shown in the authentication prompt
    #[arg(short, long, required_unless_present = "check")]
    reason: Option<String>,

    /// Give up after this long (e.g. 30s, 1m); 0 waits indefinitely
    #[arg(short, long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Which proof the prompt accepts
    #[arg(short, long, value_enum, default_value_t = PolicyArg::DeviceOwner)]
    policy: PolicyArg,

    /// Only check whether the policy can be evaluated, without prompting
    #[arg(long)]
    check: bool,

    /// Log bridge activity
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyArg {
    /// Biometrics only
    Biometrics,
    /// Biometrics, falling back to the device password
    DeviceOwner,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Biometrics => Self::DeviceOwnerAuthenticationWithBiometrics,
            PolicyArg::DeviceOwner => Self::DeviceOwnerAuthentication,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(message) => {
            println!("{}", message.green().bold());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", "authentication failed:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<&'static str> {
    let policy = Policy::from(cli.policy);

    if cli.check {
        touchkit::can_authenticate(policy)?;
        return Ok("authentication available");
    }

    let reason = validate_reason(cli.reason.as_deref())?;
    let (ctx, handle) = AuthContext::with_cancel();
    let ctx = ctx.timeout(cli.timeout.unwrap_or_default());
    tokio::spawn(cancel_on_interrupt(handle));

    touchkit::authenticate(&ctx, policy, reason).await?;
    Ok("authentication successful")
}

fn validate_reason(reason: Option<&str>) -> Result<&str> {
    match reason.map(str::trim) {
        Some(reason) if !reason.is_empty() => Ok(reason),
        _ => bail!("--reason is required"),
    }
}

async fn cancel_on_interrupt(handle: CancelHandle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("interrupted, cancelling authentication");
            handle.cancel();
        }
        Err(e) => {
            warn!("cannot listen for Ctrl-C: {e}");
            // Dropping the handle would cancel the prompt.
            std::future::pending::<()>().await;
        }
    }
}
