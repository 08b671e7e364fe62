//! Root parser, global options and command dispatch.

use crate::commands::{self, registry};
use crate::error::{CliError, CliResult};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sample_client::v1::ClientBuilder;
use sample_core::config::SampleClientConfig;
use std::io::Write;
use tracing::debug;

/// Build the root command with every registered subcommand.
pub fn build_cli() -> Command {
    let mut cmd = Command::new("sample")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command-line interface to the Sample service")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("os_sample_url")
                .long("os-sample-url")
                .env("OS_SAMPLE_URL")
                .value_name("url")
                .global(true)
                .help("Sample service endpoint URL"),
        )
        .arg(
            Arg::new("os_auth_token")
                .long("os-auth-token")
                .env("OS_AUTH_TOKEN")
                .hide_env_values(true)
                .value_name("token")
                .global(true)
                .help("Pre-issued authentication token sent as X-Auth-Token"),
        )
        .arg(
            Arg::new("os_sample_api_version")
                .long("os-sample-api-version")
                .env("OS_SAMPLE_API_VERSION")
                .value_name("version")
                .global(true)
                .help("API version to request, <major>.<minor> or \"latest\""),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .env("SAMPLE_TIMEOUT")
                .value_name("seconds")
                .value_parser(value_parser!(u64))
                .global(true)
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v, -vv, -vvv)"),
        );

    for spec in registry() {
        cmd = cmd.subcommand(spec.command());
    }
    cmd
}

/// Verbosity requested on the command line, wherever `-v` was given.
pub fn verbosity(matches: &ArgMatches) -> u8 {
    let top = matches.get_count("verbose");
    let sub = matches
        .subcommand()
        .map_or(0, |(_, sub)| sub.get_count("verbose"));
    top.max(sub)
}

/// Assemble the client configuration from global options.
pub fn config_from_args(matches: &ArgMatches) -> CliResult<SampleClientConfig> {
    let endpoint = matches.get_one::<String>("os_sample_url").ok_or_else(|| {
        CliError::command(
            "You must provide a sample service URL via either --os-sample-url or env[OS_SAMPLE_URL]",
        )
    })?;

    let mut config = SampleClientConfig::new(endpoint.clone())?;
    if let Some(token) = matches.get_one::<String>("os_auth_token") {
        config = config.with_token(token.clone());
    }
    if let Some(version) = matches.get_one::<String>("os_sample_api_version") {
        config = config.with_api_version(version.clone());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }
    config.check()?;
    Ok(config)
}

/// Run the invoked subcommand, writing its output to `out`.
pub async fn run(matches: &ArgMatches, out: &mut (dyn Write + Send)) -> CliResult<()> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| CliError::command("No command given"))?;
    let spec = commands::find(name)
        .ok_or_else(|| CliError::command(format!("Unknown command {name}")))?;

    let config = config_from_args(sub)?;
    let client = ClientBuilder::from_config(&config).build()?;
    debug!(command = name, api_version = %client.api_version(), "Running command");

    (spec.handler)(&client, sub, out).await
}
