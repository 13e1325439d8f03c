//! `authflow` binary.

use std::process::ExitCode;

use anyhow::Context;
use authflow::{ClientSettings, Flow, FlowOutcome, EXIT_INVALID_CONFIG};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_INVALID_CONFIG)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout is reserved for the outcome
    let _ = if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}

async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = ClientSettings::from_env().context("invalid AUTHFLOW_* environment")?;
    let settings = cli.apply(settings).context("invalid arguments")?;
    let flow = Flow::new(settings).context("invalid client settings")?;

    let outcome = flow.run().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    } else {
        println!("Server: {}", flow.settings().server_url);
        print_outcome(&outcome);
    }

    Ok(ExitCode::from(outcome.exit_code()))
}

fn print_outcome(outcome: &FlowOutcome) {
    match outcome {
        FlowOutcome::Completed(report) => {
            println!("Authorization code flow completed");
            println!("  issuer:        {}", report.configuration.issuer);
            println!("  code:          {}", report.code);
            println!("  token type:    {}", report.token.token_type());
            println!("  expires in:    {}s", report.token.expires_in);
            println!("  sub:           {}", report.userinfo.sub);
            println!("  name:          {}", report.userinfo.name);
            println!(
                "  email:         {} (verified: {})",
                report.userinfo.email, report.userinfo.email_verified
            );
            match (&report.refreshed_token, &report.refreshed_userinfo) {
                (Some(token), Some(info)) => println!(
                    "  refresh:       ok (expires in {}s, sub {})",
                    token.expires_in, info.sub
                ),
                _ => println!("  refresh:       skipped (no refresh token issued)"),
            }
        }
        FlowOutcome::Failed(failure) => {
            println!("Authorization code flow failed at {}", failure.stage);
            println!("  reason:        {}", failure.error);
            if let Some(code) = failure.error.oauth_error_code() {
                println!("  oauth error:   {code}");
            }
        }
    }

    let reached: Vec<_> = outcome.reached().iter().map(|s| s.as_str()).collect();
    println!("  reached:       {}", reached.join(" -> "));
}
