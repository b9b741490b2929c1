use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod list;
mod s_client;

/// leap command-line tool: TLS test client and suite registry listing.
#[derive(Parser)]
#[command(name = "leap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// TLS client connection.
    SClient {
        /// Host:port to connect to (default port 443).
        connect: String,
        /// ALPN protocols (comma-separated, e.g. "h2,http/1.1").
        #[arg(long)]
        alpn: Option<String>,
        /// Highest protocol version to offer: "1.0", "1.1" or "1.2".
        #[arg(long = "tls", default_value = "1.2")]
        tls_version: String,
        /// Cipher suites to offer, by name, comma-separated.
        #[arg(long)]
        ciphers: Option<String>,
        /// Pin a raw public key peer by its SubjectPublicKeyInfo DER file.
        #[arg(long)]
        spki: Option<String>,
        /// Skip server certificate verification.
        #[arg(long)]
        insecure: bool,
        /// Send HTTP GET / after handshake and print response.
        #[arg(long)]
        http: bool,
        /// Offer GREASE values.
        #[arg(long)]
        grease: bool,
        /// Quiet mode: suppress connection info.
        #[arg(long, short)]
        quiet: bool,
    },
    /// List the cipher suite registry and supported groups.
    List {
        /// What to list: all, suites, groups, versions.
        #[arg(default_value = "all")]
        filter: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::SClient {
            connect,
            alpn,
            tls_version,
            ciphers,
            spki,
            insecure,
            http,
            grease,
            quiet,
        } => s_client::run(&s_client::Options {
            connect,
            alpn: alpn.as_deref(),
            tls_version,
            ciphers: ciphers.as_deref(),
            spki: spki.as_deref(),
            insecure: *insecure,
            http: *http,
            grease: *grease,
            quiet: *quiet,
        }),
        Commands::List { filter } => list::run(filter),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
