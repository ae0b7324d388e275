use cable_crawler::config::Command;
use cable_crawler::core::Pipeline;
use cable_crawler::utils::error::ErrorSeverity;
use cable_crawler::utils::{logger, validation::Validate};
use cable_crawler::{
    CliConfig, CrawlEngine, CrawlError, CrawlerConfig, DownloadPipeline, ExportPipeline,
    MergePipeline, PagesPipeline,
};
use clap::Parser;

fn exit_with(e: &CrawlError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run_pipeline<P: Pipeline>(pipeline: P, monitor: bool) {
    let engine = CrawlEngine::new_with_monitoring(pipeline, monitor);
    match engine.run().await {
        Ok(report) => {
            println!("✅ {} completed: {} items", report.pipeline, report.items);
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => exit_with(&e),
    }
}

fn load_config(cli: &CliConfig) -> CrawlerConfig {
    let config = cli
        .load_crawler_config()
        .and_then(|config| config.validate().map(|_| config));
    match config {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let config = load_config(&cli);
    let user_agent = cli.user_agent.clone();

    match cli.command.clone() {
        Command::Export {
            year,
            output,
            no_header,
        } => {
            let pipeline = ExportPipeline::new(config, year, output)
                .with_header(!no_header)
                .with_user_agent(user_agent);
            run_pipeline(pipeline, cli.monitor).await;
        }
        Command::Pages {
            year,
            output_dir,
            start_page,
            page_size,
        } => {
            let pipeline = PagesPipeline::new(config, year, output_dir)
                .with_start_page(start_page)
                .with_page_size(page_size)
                .with_user_agent(user_agent);
            run_pipeline(pipeline, cli.monitor).await;
        }
        Command::Merge { input_dir, output } => {
            run_pipeline(MergePipeline::new(input_dir, output), cli.monitor).await;
        }
        Command::Download {
            overview,
            output_dir,
            offset,
        } => {
            let pipeline = DownloadPipeline::new(config, overview, output_dir)
                .with_offset(offset)
                .with_user_agent(user_agent);
            run_pipeline(pipeline, cli.monitor).await;
        }
        Command::Years => {
            for year in config.year_list() {
                println!("{}", year);
            }
        }
    }

    Ok(())
}
