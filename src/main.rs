use clap::Parser;
use cv_screen::core::engine::dry_run;
use cv_screen::utils::error::ErrorCategory;
use cv_screen::utils::{logger, validation::Validate};
use cv_screen::{
    AppConfig, Assessor, CliArgs, GeminiClient, LocalStorage, PromptTemplate, ScreenError,
    ScreeningEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.verbose, args.log_format);

    tracing::info!("🚀 Starting cv-screen v{}", env!("CARGO_PKG_VERSION"));

    // CLI over TOML over defaults, then validate
    let config = AppConfig::resolve(&args).unwrap_or_else(|e| fail(e));
    if let Err(e) = config.validate() {
        fail(e);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let storage = LocalStorage::new(".");
    let template = PromptTemplate::resolve(&storage, &config.inputs.prompt)
        .await
        .unwrap_or_else(|e| fail(e));

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No model calls, no files written");
        let entries = dry_run(&storage, &template, &config)
            .await
            .unwrap_or_else(|e| fail(e));
        let found = entries.iter().filter(|e| e.found).count();
        let unreadable = entries.iter().filter(|e| e.error.is_some()).count();
        println!(
            "🔍 {} of {} CVs found ({} unreadable); nothing was sent or written",
            found,
            entries.len(),
            unreadable
        );
        return Ok(());
    }

    let client = GeminiClient::new(&config.model, config.retry)
        .unwrap_or_else(|e| fail(ScreenError::from(e)));
    tracing::info!(
        "Model client initialized (model: {}, attempts: {})",
        config.model.name,
        config.retry.max_attempts
    );

    let assessor = Assessor::new(
        client,
        template,
        config.model.temperature,
        config.model.json_mode,
    );
    let engine = ScreeningEngine::new(storage, assessor, &config);

    let report = engine.run().await.unwrap_or_else(|e| fail(e));

    println!(
        "✅ {} done, {} skipped, {} failed. Results in '{}/'",
        report.succeeded, report.skipped, report.failed, config.output.dir
    );
    Ok(())
}

/// Prints the error the way the user should see it and exits with a code
/// derived from its category.
fn fail(e: ScreenError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Input => 3,
        ErrorCategory::Output => 2,
        ErrorCategory::Configuration | ErrorCategory::Model => 1,
    };
    std::process::exit(exit_code);
}
