use clap::Parser;

pub const DEFAULT_ARCHIVE_API: &str = "https://archive.org/wayback/available";

#[derive(Parser, Debug)]
#[command(version, about = "Turn a web URL into an @ONLINE bibliography entry", long_about = None)]
pub struct Cli {
    /// The page to cite, including its http(s) scheme
    // Optional so that a missing URL goes through the same usage path as a malformed one.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "URL2BIB_TIMEOUT", default_value_t = 15)]
    pub timeout: u64,

    /// Wayback Machine availability endpoint
    #[arg(long, env = "URL2BIB_ARCHIVE_API", default_value = DEFAULT_ARCHIVE_API)]
    pub archive_api: String,

    /// Don't look the page up in the web archive
    #[arg(long)]
    pub no_archive: bool,

    /// User-Agent header sent with every request
    #[arg(long, env = "URL2BIB_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}
