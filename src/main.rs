use buyback_contracts::core::transform::contracts_to_json;
use buyback_contracts::core::{ConfigProvider, ConnectionProvider};
use buyback_contracts::utils::error::{ContractError, ErrorSeverity};
use buyback_contracts::utils::logger::{self, LogFormat};
use buyback_contracts::utils::validation::Validate;
use buyback_contracts::{CliConfig, ContractFetcher, FetchContext, HttpConnectionProvider};
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, format);

    tracing::info!("Starting buyback-contracts");

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    let provider = HttpConnectionProvider::from_config(&config);
    let stub = match provider.connect(config.server_address()).await {
        Ok(stub) => stub,
        Err(e) => exit_with(&e),
    };
    let fetcher = ContractFetcher::from_config(stub, &config);

    // Ctrl-C cancels the in-flight call or the wait between attempts.
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling fetch");
            ctrl_c_token.cancel();
        }
    });

    let mut ctx = FetchContext::with_cancellation(cancel);
    if let Some(timeout) = cli.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(timeout));
    }

    let rendered = fetcher
        .fetch_contracts(&ctx)
        .await
        .and_then(|contracts| contracts_to_json(&contracts));
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &ContractError) -> ! {
    tracing::error!(
        "❌ Fetch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 130, // interrupted
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
