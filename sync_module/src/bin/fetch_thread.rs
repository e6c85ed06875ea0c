use std::env;
use std::process::exit;

use sync_module::config::OutreachConfig;
use thread_fetch_module::LeadThread;

fn print_usage() {
    eprintln!(
        r##"Usage: fetch-thread <lead-email>

Prints every email exchanged with the lead, grouped by thread.

Environment Variables:
  INSTANTLY_API_KEY        - Instantly API key (required)
  INSTANTLY_API_BASE_URL   - (optional) API base, defaults to https://api.instantly.ai/api/v2
"##
    );
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let lead = match args.as_slice() {
        [flag] if flag == "-h" || flag == "--help" => {
            print_usage();
            return Ok(());
        }
        [lead] => lead.trim().to_string(),
        _ => {
            print_usage();
            exit(2);
        }
    };

    let config = OutreachConfig::from_env()?;
    match config.client().fetch_thread(&lead)? {
        LeadThread::NoMessages => println!("No emails found for {}", lead),
        LeadThread::Conversation(text) => println!("{}", text),
    }
    Ok(())
}
