use clap::Parser;
use nutri_report::config::build_engine;
use nutri_report::config::toml_config::TomlConfig;
use nutri_report::core::ConfigProvider;
use nutri_report::core::prompt::PromptTemplate;
use nutri_report::utils::{logger, validation::Validate};
use nutri_report::{ExportOptions, ExtractionRequest, LocalStorage, ReportExporter};

#[derive(Parser)]
#[command(name = "toml-analyze")]
#[command(about = "Nutrition report analysis with TOML configuration support")]
struct Args {
    /// File holding the extracted report text
    input: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "nutri-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be sent without calling the provider
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based nutrition analysis");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let text = match tokio::fs::read_to_string(&args.input).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ Failed to read report text '{}': {}", args.input, e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No provider call will be made");
        perform_dry_run(&config, &text)?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let engine = build_engine(&config, monitor_enabled)?;
    let exporter = ReportExporter::new(
        LocalStorage::new(config.output_path()),
        ExportOptions::from_config(&config)?,
    );

    match engine
        .analyze_and_export(&ExtractionRequest::new(text), &exporter)
        .await
    {
        Ok((report, paths)) => {
            if report.analysis.is_fallback() {
                tracing::warn!("⚠️ Provider reply was unreadable, fallback analysis exported");
            }
            println!("✅ Nutrition analysis completed with {}", report.model);
            for path in paths {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                nutri_report::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                nutri_report::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
                nutri_report::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                nutri_report::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", config.api_endpoint());
    println!("  Model: {}", config.model());
    println!("  API Key: {}", logger::mask_secret(config.api_key()));
    println!("  Timeout: {}s", config.request_timeout().as_secs());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Bundle: {}", config.bundle());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let template = PromptTemplate::load(config.prompt_file())?;
    let prompt = template.render(text);

    println!("📝 Prompt:");
    println!(
        "  Template: {}",
        config.prompt_file().unwrap_or("built-in nutrition analysis")
    );
    println!("  Report text: {} characters", text.chars().count());
    println!("  Rendered prompt: {} characters", prompt.chars().count());
    if text.trim().is_empty() {
        println!("  ⚠️ Report text is blank, a real run would be rejected");
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.bundle() {
        println!("  Bundle: single zip archive");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
