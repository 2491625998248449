use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::core::models::Protocol;

#[derive(Parser, Debug, Clone)]
#[command(name = "vhostcrawler", version)]
#[command(about = "Discover virtual hosts on a single IP by response differential analysis", long_about = None)]
pub struct Cli {
    /// Target IPv4 address (dotted quad)
    #[arg(value_name = "TARGET_IP")]
    pub target_ip: String,

    /// Base domain; candidates are probed as <word>.<domain>
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Wordlist file, or a name configured under [wordlists]
    #[arg(value_name = "WORDLIST")]
    pub wordlist: String,

    /// Use http instead of https
    #[arg(long = "insecure", action = ArgAction::SetTrue)]
    pub insecure: bool,

    /// Concurrent probes (default from config: 20)
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Per-request timeout in seconds (default from config: 10)
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Port to connect to instead of the scheme default
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Override resolution by rewriting a hosts file instead of per request
    /// (racy under concurrency; defaults to the configured /etc/hosts)
    #[arg(long = "hosts-file", value_name = "PATH", num_args = 0..=1)]
    pub hosts_file: Option<Option<PathBuf>>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Verbose human output
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug logs (implies verbose)
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Do not draw the progress bar
    #[arg(long = "no-progress", action = ArgAction::SetTrue)]
    pub no_progress: bool,
}

impl Cli {
    pub fn protocol(&self) -> Protocol {
        if self.insecure { Protocol::Http } else { Protocol::Https }
    }

    /// `Some(None)` means hosts-file mode with the configured path.
    pub fn hosts_override(&self) -> Option<Option<PathBuf>> {
        self.hosts_file.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("vhostcrawler").chain(args.iter().copied()))
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["10.0.0.5", "example.com", "words.txt"]).unwrap();
        assert_eq!(cli.target_ip, "10.0.0.5");
        assert_eq!(cli.domain, "example.com");
        assert_eq!(cli.wordlist, "words.txt");
        assert_eq!(cli.protocol(), Protocol::Https);
        assert_eq!(cli.hosts_override(), None);
    }

    #[test]
    fn test_insecure_selects_http() {
        let cli = parse(&["10.0.0.5", "example.com", "words.txt", "--insecure"]).unwrap();
        assert_eq!(cli.protocol(), Protocol::Http);
    }

    #[test]
    fn test_too_few_arguments() {
        assert!(parse(&["10.0.0.5", "example.com"]).is_err());
    }

    #[test]
    fn test_hosts_file_flag() {
        let cli = parse(&["10.0.0.5", "example.com", "w.txt", "--hosts-file"]).unwrap();
        assert_eq!(cli.hosts_override(), Some(None));

        let cli = parse(&["10.0.0.5", "example.com", "w.txt", "--hosts-file", "/tmp/hosts"]).unwrap();
        assert_eq!(cli.hosts_override(), Some(Some(PathBuf::from("/tmp/hosts"))));
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&["10.0.0.5", "example.com", "w.txt", "-t", "5", "--timeout", "3", "-p", "8443"]).unwrap();
        assert_eq!(cli.threads, Some(5));
        assert_eq!(cli.timeout, Some(3));
        assert_eq!(cli.port, Some(8443));
    }
}
