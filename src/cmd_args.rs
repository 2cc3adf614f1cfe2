use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// URL to analyze
    /// Optional. When given, the URL is analyzed once and the program exits.
    /// When omitted, the interactive prompt starts.
    url: Option<String>,

    /// Profile name
    /// Optional. Profile section to read the endpoint from. Default is 'default'.
    /// If the profile is not configured, the built-in endpoint is used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Endpoint override
    /// Optional. Classifier base URL; takes precedence over the profile.
    #[clap(short = 'e', long, help = "classifier base URL")]
    endpoint: Option<String>,

    /// Verbose output
    /// Optional. Echo the outgoing request and dump the full feature vector.
    #[clap(
        short = 'v',
        long,
        help = "echo the request and dump features",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    url: Option<String>,
    profile: String,
    endpoint: Option<String>,
    verbose: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        let args = ClapArgs::parse();
        Self::from_clap(args)
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = ClapArgs::parse_from(itr);
        Self::from_clap(args)
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            url: args.url,
            profile: args.profile,
            endpoint: args.endpoint,
            verbose: args.verbose,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
