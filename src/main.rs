use clap::Parser;
use vhostcrawler::{app, cli::args::Cli, ui::printer};

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not usage errors
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = app::run(cli).await {
        printer::print_error(&format!("fatal: {}", err));
        std::process::exit(err.exit_code());
    }
}
