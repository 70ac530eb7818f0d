use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fitscout",
    version,
    about = "terminal shoe-fit recommendation browser",
    long_about = "Fitscout browses the recommendations a shoe-fit service computed for your foot profile, right from the terminal.\n\nExamples:\n  fitscout -b http://localhost:5000/\n  fitscout -b http://localhost:5000/ -e you@example.com -p hunter2\n  fitscout -b http://localhost:5000/ --min-compatibility 60 --type sport --sort name-asc\n  fitscout -b http://localhost:5000/ -I\n\nTip: Use --config to persist the service URL and session so invocations stay short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'b',
        long = "bu",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Input",
        help = "Base URL of the shoe-fit service."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.fitscout/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'e',
        long = "em",
        visible_alias = "email",
        value_name = "EMAIL",
        help_heading = "Session",
        help = "Account email, submitted to the login endpoint before fetching."
    )]
    pub email: Option<String>,

    #[arg(
        short = 'p',
        long = "pw",
        visible_alias = "password",
        value_name = "PASSWORD",
        help_heading = "Session",
        help = "Account password (only used together with --email)."
    )]
    pub password: Option<String>,

    #[arg(
        short = 'm',
        long = "mc",
        visible_alias = "min-compatibility",
        value_name = "PCT",
        help_heading = "Filters",
        help = "Hide recommendations below this compatibility percentage (0-100)."
    )]
    pub min_compatibility: Option<u8>,

    #[arg(
        short = 't',
        long = "ty",
        visible_alias = "type",
        value_name = "TYPE",
        help_heading = "Filters",
        help = "Only show one shoe category (all, sport, casual, running, boots)."
    )]
    pub shoe_type: Option<String>,

    #[arg(
        short = 's',
        long = "srt",
        visible_alias = "sort",
        value_name = "KEY",
        help_heading = "Filters",
        help = "Sort order (compat-desc, compat-asc, name-asc, name-desc)."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'l',
        long = "lim",
        visible_alias = "limit",
        value_name = "N",
        help_heading = "Filters",
        help = "Initial number of cards shown (grows with `more`)."
    )]
    pub limit: Option<usize>,

    #[arg(
        short = 'a',
        long = "all",
        visible_alias = "show-all",
        help_heading = "Filters",
        help = "Show the whole filtered set at once, no pagination."
    )]
    pub show_all: bool,

    #[arg(
        short = 'I',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Mode",
        help = "Keep the gallery open and accept filter commands on stdin."
    )]
    pub interactive: bool,

    #[arg(
        short = 'P',
        long = "np",
        visible_alias = "no-probe",
        help_heading = "Photos",
        help = "Skip probing catalog photos (cards render placeholders)."
    )]
    pub no_probe: bool,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Request rate limit for lookups and probing (requests per second)."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 'w',
        long = "wrk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of runtime worker threads."
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'F',
        long = "frd",
        visible_alias = "follow-redirects",
        help_heading = "HTTP",
        help = "Follow HTTP redirects."
    )]
    pub follow_redirects: bool,

    #[arg(
        short = 'k',
        long = "thm",
        visible_alias = "theme",
        value_name = "THEME",
        help_heading = "Output",
        help = "Gallery theme (dark or light)."
    )]
    pub theme: Option<String>,

    #[arg(
        long = "save-theme",
        help_heading = "Output",
        help = "Persist the chosen theme to the config file."
    )]
    pub save_theme: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Export the visible gallery to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Export format (text, json, xml, html)."
    )]
    pub output_format: Option<String>,
}
