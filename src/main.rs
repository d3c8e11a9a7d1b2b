// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Run one analysis (Ctrl-C cancels it)
// 4. Print the report and exit with a proper code
//    (0 = analyzed, 1 = analysis reported an error, 2 = internal error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use cli::Cli;
use page_analyzer::logging::init_logging;
use page_analyzer::{AnalysisResult, PageAnalyzer};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    let analyzer = PageAnalyzer::new(cli.analyzer_config())?;

    // Ctrl-C cancels the analysis instead of killing the process, so we
    // still get a report back
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling analysis");
            on_interrupt.cancel();
        }
    });

    let result = analyzer.analyze_with_cancel(&cli.url, cancel).await;

    print_results(&result, cli.json)?;

    if result.is_successful() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the report either as a summary table or JSON
fn print_results(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_table(result);
    }
    Ok(())
}

// Prints the report as a human-readable summary in the terminal
fn print_table(result: &AnalysisResult) {
    println!("🔍 {}", result.url);
    println!("{}", "=".repeat(60));

    if !result.is_successful() {
        println!("❌ {}", result.error);
        if result.http_status_code != 0 {
            println!("   HTTP status: {}", result.http_status_code);
        }
        println!("   Analysis time: {:?}", result.analysis_time);
        return;
    }

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!("{:<28} {}", "HTML version", result.html_version);
    println!("{:<28} {}", "Title", result.page_title);

    let headings: Vec<String> = result
        .headings
        .iter()
        .map(|(level, count)| format!("{}={}", level, count))
        .collect();
    println!("{:<28} {}", "Headings", headings.join(" "));

    println!();
    println!("🔗 Links:");
    println!("   {:<25} {}", "Internal", result.internal_links);
    println!("   {:<25} {}", "External", result.external_links);
    println!("   {:<25} {}", "Inaccessible", result.inaccessible_links);

    println!();
    println!("📄 Content:");
    println!("   {:<25} {}", "Forms", result.forms.len());
    println!("   {:<25} {}", "Login form", yes_no(result.has_login_form));
    println!("   {:<25} {}", "Images", result.images.len());
    println!("   {:<25} {}", "Scripts", result.scripts.len());
    println!("   {:<25} {}", "Stylesheets", result.stylesheets.len());
    println!("   {:<25} {}", "Meta tags", result.meta_tags.len());
    println!("   {:<25} {}", "Tables", result.tables);
    println!("   {:<25} {}", "Lists", result.lists);
    println!("   {:<25} {}", "Buttons", result.buttons);
    println!("   {:<25} {}", "Inputs", result.inputs);
    println!("   {:<25} {}", "Paragraphs", result.text_content.paragraphs);
    println!("   {:<25} {}", "Words", result.text_content.word_count);
    println!("   {:<25} {}", "Characters", result.text_content.char_count);

    let a11y = &result.accessibility;
    println!();
    println!("♿ Accessibility:");
    println!("   {:<25} {}", "Alt text", yes_no(a11y.has_alt_text));
    println!("   {:<25} {}", "ARIA labels", yes_no(a11y.has_aria_labels));
    println!("   {:<25} {}", "Semantic HTML", yes_no(a11y.has_semantic_html));
    println!("   {:<25} {}", "Skip links", yes_no(a11y.has_skip_links));

    println!();
    println!("⏱️  Analysis time: {:?}", result.analysis_time);
}
