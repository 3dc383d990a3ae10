use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::Result;
use log::info;

use edugen::agents::{Generator, Reviewer};
use edugen::cli::Cli;
use edugen::config::Config;
use edugen::content::{OptionKey, ReviewStatus};
use edugen::llm::GeminiClient;
use edugen::pipeline::{LessonOutput, Pipeline, Request};

fn setup_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose && std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Wire up clients and run one generate-then-review pass.
async fn run_pipeline(cli: &Cli, config: &Config) -> Result<LessonOutput> {
    let env_var = Some(config.llm.api_key_env.as_str());

    let generator_client = Arc::new(GeminiClient::new(config.generator_client_config(), env_var)?);

    // A review model override means a second client; otherwise both agents
    // share one.
    let pipeline = if config.review.model.is_some() {
        let reviewer_client =
            Arc::new(GeminiClient::new(config.reviewer_client_config(), env_var)?);
        Pipeline::new(
            Generator::new(generator_client),
            Reviewer::new(reviewer_client),
        )
    } else {
        Pipeline::with_client(generator_client)
    };

    let state = pipeline
        .run(Request::new(cli.grade, cli.topic.clone()))
        .await?;
    Ok(state.into_output()?)
}

fn render_output(output: &LessonOutput) {
    println!("{}", "Explanation".bold().underline());
    println!("{}\n", output.explanation);

    println!("{}", "MCQ Questions".bold().underline());
    for (i, mcq) in output.mcq_questions.iter().enumerate() {
        println!("Q{}. {}", i + 1, mcq.question.bold());
        for key in OptionKey::ALL {
            if let Some(text) = mcq.options.get(&key) {
                println!("   {}. {}", key, text);
            }
        }
        println!("   {} {}\n", "Answer:".green(), mcq.answer);
    }

    match output.status {
        ReviewStatus::Pass => println!("{} {}", "Review:".bold(), "PASS".green().bold()),
        ReviewStatus::Fail => {
            println!("{} {}", "Review:".bold(), "FAIL".red().bold());
            for issue in &output.feedback {
                println!("  {} {}", "-".red(), issue);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref())?;
    config.validate()?;

    info!(
        "generating lesson for grade {} topic '{}'",
        cli.grade, cli.topic
    );

    let output = run_pipeline(&cli, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render_output(&output);
    }

    Ok(())
}
