use clap::Parser;
use syno2bw::config::paths::{self, PathRole};
use syno2bw::config::toml_config::TomlConfig;
use syno2bw::utils::validation::{self, Validate};
use syno2bw::utils::{error::ConvertError, logger};
use syno2bw::{CliConfig, ConversionPipeline, ConversionReport, EtlEngine, LocalStorage};

const BANNER: &str = "
    Welcome to the Synology C2 Password Manager to Bitwarden CSV converter!
    This tool converts a Synology C2 Password Manager CSV export into a CSV file
    that Bitwarden and Vaultwarden can import.

    Press Ctrl+C at any time to exit.
";

const IMPORT_GUIDE: &str = "
    To import the file into Bitwarden/Vaultwarden:
      1. Open the web vault and go to Tools -> Import data.
      2. Choose \"Bitwarden (csv)\" as the file format.
      3. Select the generated file and confirm the import.

    The file contains your passwords in plain text. Delete it once the import is done.
";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置（選用）
    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 初始化日誌
    let verbose = cli.verbose || file_config.as_ref().is_some_and(TomlConfig::verbose);
    if cli.json_logs || file_config.as_ref().is_some_and(TomlConfig::json_logs) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting syno2bw");
    println!("{}", BANNER);

    if let Some(file) = &file_config {
        if let Err(e) = file.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            fail(&e);
        }
    }

    let no_prompt = cli.no_prompt;
    let config = syno2bw::config::resolve(&cli, file_config.as_ref(), |role: PathRole| {
        if no_prompt {
            Ok(String::new())
        } else {
            paths::prompt_for_path(role)
        }
    })
    .and_then(|config| config.validate().map(|_| config));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            fail(&e);
        }
    };

    println!("Synology C2 Password Manager CSV file: {}", config.input_path.display());
    println!("Bitwarden CSV file will be saved to: {}\n", config.output_path.display());

    // 驗證路徑
    if let Err(e) = validation::validate_input_file(&config.input_path)
        .and_then(|_| validation::prepare_output_path(&config.output_path))
    {
        tracing::error!("❌ Path validation failed: {}", e);
        fail(&e);
    }

    let pipeline = ConversionPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    tokio::select! {
        result = engine.run() => match result {
            Ok(report) => print_report(&report),
            Err(e) => {
                tracing::error!(
                    "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                fail(&e);
            }
        },
        _ = shutdown_signal() => {
            tracing::warn!("Shutdown signal received");
            println!("Shutdown signal received. Exiting...");
            std::process::exit(130);
        }
    }

    Ok(())
}

fn print_report(report: &ConversionReport) {
    println!(
        "✅ Converted {} of {} entries ({} skipped, source encoding {}).",
        report.written, report.total_rows, report.skipped, report.encoding
    );
    println!(
        "📁 The Bitwarden import file has been saved to: {}",
        report.output_path.display()
    );
    if report.skipped > 0 {
        println!("⚠️  Skipped rows are listed in the log above; add those entries manually.");
    }
    println!("{}", IMPORT_GUIDE);
}

fn fail(e: &ConvertError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
