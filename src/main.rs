use anyhow::{ Context, Result };
use colored::Colorize;
use std::time::Duration;
use tracing::{ error, info, warn };

mod archive_handler;
mod aur_api;
mod config;
mod error;
mod logging;
mod options;
mod package_info;
#[cfg(test)]
mod test_utils;

use archive_handler::ArchiveHandler;
use aur_api::AurClient;
use config::ClientConfig;
use options::{ Destination, OptionParser };
use package_info::PackageInfo;

/// Everything the user asked for on the command line.
#[derive(Debug)]
struct Request {
    packages: Vec<String>,
    info: Vec<String>,
    search: Vec<String>,
    limit: i64,
    timeout: i64,
    help: bool,
    debug: bool,
}

impl Default for Request {
    fn default() -> Self {
        Request {
            packages: Vec::new(),
            info: Vec::new(),
            search: Vec::new(),
            limit: 10,
            timeout: 0,
            help: false,
            debug: false,
        }
    }
}

/// Parse the arguments into a request, together with the rendered help text.
fn parse_request(program: &str, args: &[String]) -> Result<(Request, String)> {
    let mut request = Request::default();
    let usage;
    {
        let mut parser = OptionParser::new();
        parser.register(
            "p",
            "package",
            Destination::TextList(&mut request.packages),
            "Download and unpack a package."
        )?;
        parser.register(
            "i",
            "info",
            Destination::TextList(&mut request.info),
            "Show package information."
        )?;
        parser.register(
            "s",
            "search",
            Destination::TextList(&mut request.search),
            "Search for a package."
        )?;
        parser.register(
            "l",
            "limit",
            Destination::Integer(&mut request.limit),
            "Limit amount of search results."
        )?;
        parser.register(
            "t",
            "timeout",
            Destination::Integer(&mut request.timeout),
            "Request timeout in seconds."
        )?;
        parser.register("", "help", Destination::Flag(&mut request.help), "Show this help message.")?;
        parser.register("", "debug", Destination::Flag(&mut request.debug), "Enable debug output.")?;

        usage = parser.usage(&format!("{} --opt1 [arg1] [arg2] --opt2 [arg1] ...", program));
        parser.parse(args)?;
    }

    if args.is_empty() {
        request.help = true;
    }

    Ok((request, usage))
}

/// Render at most `limit` search results as a votes / name / id table.
fn format_search_results(results: &[PackageInfo], limit: usize) -> String {
    let mut table = format!("{:>7}  {:<30}  {}\n", "Votes", "Package Name", "Id");
    table.push_str(&"-".repeat(50));
    table.push('\n');
    for package in results.iter().take(limit) {
        table.push_str(&format!("{:>7}  {:<30}  {:>7}\n", package.num_votes, package.name, package.id));
    }
    table
}

fn run(request: &Request) -> Result<()> {
    let timeout = if request.timeout > 0 {
        Some(Duration::from_secs(request.timeout as u64))
    } else {
        None
    };
    let config = ClientConfig::default().with_debug(request.debug).with_timeout(timeout);
    let client = AurClient::new(config)?;

    for name in &request.info {
        let package = client
            .fetch_package_info(name)
            .with_context(|| format!("Failed to get information for {}", name))?;
        println!("{}", package);
        if package.is_orphaned() {
            warn!("{} is orphaned", package.name);
        }
    }

    let limit = request.limit.max(0) as usize;
    for term in &request.search {
        let results = client
            .search_packages(term)
            .with_context(|| format!("Failed to search for {}", term))?;
        print!("{}", format_search_results(&results, limit));
    }

    let handler = ArchiveHandler::new(".");
    for name in &request.packages {
        let mut archive = client
            .fetch_package_archive(name)
            .with_context(|| format!("Failed to download {}", name))?;

        print!("Unpacking {} ... - ", name.bold());
        let written = handler
            .unpack(&mut archive)
            .with_context(|| format!("Failed to unpack {}", name))?;
        println!("done.");
        info!("{} files written for {}", written, name);
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("aq");

    let (request, usage) = match parse_request(program, &args[1.min(args.len())..]) {
        Ok(parsed) => parsed,
        Err(err) => {
            logging::setup_logging(false);
            error!("{}", err);
            std::process::exit(1);
        }
    };

    if request.help {
        print!("{}", usage);
        std::process::exit(0);
    }

    logging::setup_logging(request.debug);

    if let Err(err) = run(&request) {
        error!("{}", err);
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  due to: {}", cause));
        std::process::exit(1);
    }
}
