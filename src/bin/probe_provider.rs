use clap::Parser;
use nutri_report::adapters::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, SUGGESTED_MODELS};
use nutri_report::config::DEFAULT_TIMEOUT_SECONDS;
use nutri_report::core::prompt::PromptTemplate;
use nutri_report::utils::{logger, validation};
use nutri_report::{GeminiProvider, ResponseAcquirer};
use std::time::Duration;

/// 以極短的提示詞確認 API key 與模型可用
#[derive(Parser)]
#[command(name = "probe-provider")]
#[command(about = "Check that the configured model answers before analyzing reports")]
struct Args {
    #[arg(long, env = "NUTRI_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    api_endpoint: String,

    #[arg(long, env = "NUTRI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout_seconds: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = validation::validate_api_key("api_key", &args.api_key) {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    println!("🧪 Testing {} (key: {})", args.model, logger::mask_secret(&args.api_key));

    let provider = GeminiProvider::new(
        &args.api_endpoint,
        &args.model,
        &args.api_key,
        Duration::from_secs(args.timeout_seconds),
    )?;
    let acquirer = ResponseAcquirer::new(provider, PromptTemplate::builtin());

    match acquirer.probe().await {
        Ok(response) => {
            println!("✅ AI service is working");
            println!("  Model: {}", response.model);
            println!("  Response: {}", response.text.trim());
        }
        Err(e) => {
            tracing::error!(
                "❌ AI service test failed: {} (Category: {:?}, Status: {})",
                e,
                e.category(),
                e.status_code()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("  Suggested models: {}", SUGGESTED_MODELS.join(", "));
            std::process::exit(1);
        }
    }

    Ok(())
}
