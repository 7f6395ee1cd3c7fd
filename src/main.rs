use std::{process::ExitCode, time::Duration};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::{cli::Cli, config::Config, error::Url2BibError, http::HttpClient};

mod archive;
mod citation;
mod cli;
mod config;
mod error;
mod html;
mod http;
mod logging;
mod resolver;
mod schema;
mod title;
mod wikipedia;

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = err
                .downcast_ref::<Url2BibError>()
                .map(Url2BibError::exit_code)
                .unwrap_or(1);
            let msg = format!("{err:#}");
            if logging::use_color() {
                eprintln!("{} {}", "error:".red().bold(), msg);
            } else {
                eprintln!("error: {msg}");
            }
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: &Cli) -> anyhow::Result<Vec<String>> {
    let url = match args.url.as_deref() {
        Some(url) if url.starts_with("http") => url,
        _ => return Err(Url2BibError::Usage.into()),
    };
    let config = Config::from_cli(args)?;
    let client = HttpClient::new(&config);

    let spinner = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };
    let today = chrono::Local::now().date_naive();
    let res = resolver::resolve(&client, &config, url, today, &|stage| {
        spinner.set_message(stage.to_string())
    });
    spinner.finish_and_clear();

    Ok(res?.to_bibtex_lines())
}
