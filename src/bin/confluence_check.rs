//! Configuration diagnostic for the Confluence MCP server.
//!
//! Prints which environment variables are set (API key masked), warns
//! on malformed URLs and, with `--probe`, issues a one-item spaces
//! request to verify connectivity and credentials.

use clap::Parser;
use colored::Colorize;
use confluence_mcp::core::client::{ConfluenceClient, RetryPolicy, WikiApi};
use confluence_mcp::core::config::{
    normalize_base_url, Settings, ENV_API_KEY, ENV_DEBUG, ENV_URL, ENV_USER_EMAIL,
};
use std::env;

/// Check Confluence MCP configuration
#[derive(Parser, Debug)]
#[command(name = "confluence-check")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verify connectivity with a test API request
    #[arg(long)]
    probe: bool,
}

/// Mask an API token for display, keeping the first and last 4 characters.
///
/// Counts characters rather than bytes so tokens containing multi-byte
/// characters never split a char boundary.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
    } else {
        "*".repeat(chars.len())
    }
}

fn report_var(name: &str, mask: bool) -> bool {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            let shown = if mask { mask_token(&value) } else { value };
            println!("{} {name}: {shown}", "✓".green());
            true
        }
        _ => {
            println!("{} {name}: NOT SET", "✗".red());
            false
        }
    }
}

fn check_config() -> bool {
    println!("=== Confluence MCP Configuration Check ===");
    println!();

    let mut all_set = true;
    all_set &= report_var(ENV_URL, false);
    all_set &= report_var(ENV_API_KEY, true);
    all_set &= report_var(ENV_USER_EMAIL, false);
    println!("  {ENV_DEBUG}: {}", env::var(ENV_DEBUG).unwrap_or_else(|_| "false".to_string()));
    println!();

    if !all_set {
        println!("{}", "✗ Missing required environment variables!".red());
        println!();
        println!("To fix this, add these lines to your ~/.zshrc or ~/.bashrc:");
        println!();
        if env::var(ENV_URL).is_err() {
            println!("export {ENV_URL}=https://your-domain.atlassian.net/wiki");
        }
        if env::var(ENV_API_KEY).is_err() {
            println!("export {ENV_API_KEY}=your-api-token");
        }
        if env::var(ENV_USER_EMAIL).is_err() {
            println!("export {ENV_USER_EMAIL}=your-email@example.com");
        }
        println!();
        println!("Then run: source ~/.zshrc");
        return false;
    }

    println!("{}", "✓ All required environment variables are set!".green());

    // Validate URL format on top of presence
    if let Ok(url) = env::var(ENV_URL) {
        if let Err(e) = normalize_base_url(&url) {
            println!("{} {e}", "⚠".yellow());
            return false;
        }
        if url.ends_with('/') {
            println!(
                "{} Note: {ENV_URL} should not end with '/' (it will be stripped)",
                "⚠".yellow()
            );
        }
    }

    true
}

async fn probe() -> bool {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            println!("{} {e}", "✗".red());
            return false;
        }
    };

    let client = match ConfluenceClient::with_retry_policy(&settings, RetryPolicy::none()) {
        Ok(client) => client,
        Err(e) => {
            println!("{} {e}", "✗".red());
            return false;
        }
    };

    println!("Probing {} ...", settings.api_url());
    match client
        .get("spaces", &[("limit".to_string(), "1".to_string())])
        .await
    {
        Ok(_) => {
            println!("{}", "✓ API request succeeded, credentials accepted".green());
            true
        }
        Err(e) => {
            println!("{} API request failed: {e}", "✗".red());
            false
        }
    }
}


#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut success = check_config();
    if success && args.probe {
        println!();
        success = probe().await;
    }

    std::process::exit(if success { 0 } else { 1 });
}
