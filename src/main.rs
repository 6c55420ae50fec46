//! rcat - Fast File Concatenation with Line Formatting
//!
//! Concatenate FILE(s) to standard output with optional formatting and follow mode.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use rcat::{CancellationToken, Options, Pipeline, Source};

fn build_cli() -> Command {
    Command::new("rcat")
        .version(rcat::VERSION)
        .about("Concatenate FILE(s) to standard output with formatting and follow mode")
        .long_about(
            "rcat concatenates files to standard output. Files of 1MB or more are memory \
             mapped; smaller files and standard input are streamed. With no FILE, or when \
             FILE is -, standard input is read.",
        )
        .arg(
            Arg::new("number")
                .short('n')
                .long("number")
                .action(ArgAction::SetTrue)
                .help("Number all output lines"),
        )
        .arg(
            Arg::new("number-nonblank")
                .short('b')
                .long("number-nonblank")
                .action(ArgAction::SetTrue)
                .help("Number nonblank output lines"),
        )
        .arg(
            Arg::new("squeeze-blank")
                .short('s')
                .long("squeeze-blank")
                .action(ArgAction::SetTrue)
                .help("Suppress repeated blank lines"),
        )
        .arg(
            Arg::new("show-ends")
                .short('E')
                .short_alias('e')
                .long("show-ends")
                .action(ArgAction::SetTrue)
                .help("Display $ at the end of each line"),
        )
        .arg(
            Arg::new("show-tabs")
                .short('T')
                .long("show-tabs")
                .action(ArgAction::SetTrue)
                .help("Display TAB characters as ^I"),
        )
        .arg(
            Arg::new("show-nonprinting")
                .short('v')
                .long("show-nonprinting")
                .action(ArgAction::SetTrue)
                .help("Use ^ notation for control characters, except TAB and newline"),
        )
        .arg(
            Arg::new("show-all")
                .short('A')
                .long("show-all")
                .action(ArgAction::SetTrue)
                .help("Equivalent to -vET"),
        )
        .arg(
            Arg::new("follow")
                .short('f')
                .long("follow")
                .action(ArgAction::SetTrue)
                .help("Output appended data as the file grows"),
        )
        .arg(
            Arg::new("reset-on-truncate")
                .long("reset-on-truncate")
                .action(ArgAction::SetTrue)
                .requires("follow")
                .help("When following, restart from the beginning if a file shrinks"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .help("Files to concatenate; - reads standard input")
                .action(ArgAction::Append)
                .index(1),
        )
}

/// Layer command-line flags over the base options
fn apply_flags(base: Options, matches: &ArgMatches) -> Options {
    let flag = |name: &str| matches.get_flag(name);

    let mut options = base
        .number_all(flag("number"))
        .number_nonblank(flag("number-nonblank"))
        .squeeze_blank(flag("squeeze-blank"))
        .show_ends(flag("show-ends"))
        .show_tabs(flag("show-tabs"))
        .show_nonprinting(flag("show-nonprinting"))
        .follow(flag("follow"));

    if flag("show-all") {
        options = options.visualize_all();
    }
    if flag("reset-on-truncate") {
        options = options.reset_on_truncate(true);
    }
    options
}

fn base_options() -> Result<Options> {
    #[cfg(feature = "config")]
    {
        Ok(rcat::config::load_options()?)
    }
    #[cfg(not(feature = "config"))]
    {
        Ok(Options::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Errors are reported through the logger; RUST_LOG widens the filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = build_cli().get_matches();
    let options = apply_flags(base_options()?, &matches);
    let sources = Source::from_args(
        matches
            .get_many::<String>("files")
            .into_iter()
            .flatten(),
    );

    let cancel = CancellationToken::new();
    if options.follow {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            // First ctrl-c ends following; a second one exits like SIGINT would
            match cancel.escalate(tokio::signal::ctrl_c).await {
                Ok(()) => std::process::exit(130),
                Err(e) => log::warn!("Cannot listen for ctrl-c: {}", e),
            }
        });
    }

    let mut pipeline = Pipeline::new(options, std::io::stdout());
    let report = pipeline.run(&sources, &cancel).await;
    log::debug!(
        "Processed {} source(s), {} failed, {} write error(s)",
        report.sources,
        report.failed,
        report.write_errors
    );

    Ok(())
}
