use clap::Parser;
use nutri_report::config::build_engine;
use nutri_report::utils::error::{AnalysisError, ErrorSeverity};
use nutri_report::utils::{logger, validation::Validate};
use nutri_report::{CliConfig, ExportOptions, ExtractionRequest, LocalStorage, ReportExporter};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting nutri-report CLI");
    tracing::debug!(
        "Provider: {} / {} (key: {})",
        config.api_endpoint,
        config.model,
        logger::mask_secret(&config.api_key)
    );

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let export_options = match ExportOptions::from_config(&config) {
        Ok(options) => options,
        Err(e) => fail(&e),
    };

    let text = match read_input(&config.input).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ Failed to read '{}': {}", config.input, e);
            std::process::exit(1);
        }
    };
    tracing::info!("📄 Loaded {} characters from {}", text.chars().count(), config.input);

    let engine = match build_engine(&config, config.monitor) {
        Ok(engine) => engine,
        Err(e) => fail(&e),
    };
    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let exporter = ReportExporter::new(LocalStorage::new(&config.output_path), export_options);

    match engine
        .analyze_and_export(&ExtractionRequest::new(text), &exporter)
        .await
    {
        Ok((report, paths)) => {
            if report.analysis.is_fallback() {
                println!("⚠️ The AI response could not be parsed; an empty plan was written.");
            } else {
                println!("✅ Nutrition analysis completed with {}", report.model);
            }
            for path in paths {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input).await
    }
}

fn fail(e: &AnalysisError) -> ! {
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?}, Status: {})",
        e,
        e.category(),
        e.severity(),
        e.status_code()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
