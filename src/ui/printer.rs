use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::core::models::{DiscoveryReport, Target};

pub fn print_banner(target: &Target, resolver: &str, workers: usize) {
    println!("{}", "═══════════════════════════════════════".green().bold());
    println!("{}", "vhostcrawler".green().bold());
    println!("{}", "═══════════════════════════════════════".green().bold());
    println!("{}: {}", "Target".cyan().bold(), target.ip);
    println!("{}: {}", "Domain".cyan().bold(), target.domain);
    println!("{}: {}", "Protocol".cyan().bold(), target.protocol);
    println!("{}: {}", "Resolution".cyan().bold(), resolver);
    println!("{}: {}", "Workers".cyan().bold(), workers);
}

pub fn print_hosts_warning(path: &std::path::Path) {
    println!("{}", format!("[..] Backing up {}", path.display()).yellow());
    println!(
        "{}",
        "[W] Do not kill the process until it finishes!".white().on_red()
    );
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.white().on_red());
}

/// Summary table of discovered virtual hosts.
pub fn summary_table(report: &DiscoveryReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("URL").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Words").add_attribute(Attribute::Bold),
    ]);

    for outcome in &report.discoveries {
        table.add_row(vec![
            Cell::new(&outcome.url).fg(Color::Green),
            Cell::new(outcome.status_code.to_string()),
            Cell::new(outcome.word_count.to_string()),
        ]);
    }

    table.to_string()
}

pub fn print_summary(report: &DiscoveryReport) {
    if !report.is_empty() {
        println!("\n{}", summary_table(report));
    }
    println!(
        "\n{}",
        format!("[+] Found {} subdomains ({}/{} probed)", report.len(), report.processed, report.total)
            .green()
            .bold()
    );
}
