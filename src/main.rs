use anyhow::{Context, Result};
use handoff::{
    agents::{
        catalog::{FRENCH_AGENT_NAME, TRIAGE_AGENT_NAME, WEB_SEARCH_AGENT_NAME},
        AgentSet, Runner, TriageSession,
    },
    cli::{chat, demo, output::Output, Cli, Commands},
    llm::{LLMClientFactory, Provider},
    tools::SearchTool,
    utils::config::HandoffConfig,
    voice::{
        open_default_io, OpenAIVoice, SingleAgentVoiceWorkflow, VoicePipeline,
        VoicePipelineConfig, VoiceSession,
    },
};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const AGENT_ROLES: [(&str, &str); 3] = [
    (TRIAGE_AGENT_NAME, "Routes your request to the appropriate agent"),
    (WEB_SEARCH_AGENT_NAME, "Searches the web for information"),
    (
        FRENCH_AGENT_NAME,
        "Handles French translations and language questions",
    ),
];

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    dotenvy::dotenv().ok();

    let config = HandoffConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config, cli.verbose);

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.selected_command() {
        Commands::Agents => {
            show_agents(&config, &output);
            Ok(())
        }
        Commands::Chat => run_chat(&config, &output).await,
        Commands::Demo { delay } => {
            let delay = delay.unwrap_or(config.demo.delay_secs);
            run_demo(&config, Duration::from_secs(delay), &output).await
        }
        Commands::Voice { once } => run_voice(&config, once, &output).await,
    }
}

/// `RUST_LOG` wins, then the config level; `--verbose` forces debug
fn init_tracing(config: &HandoffConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_runner(config: &HandoffConfig) -> Result<Runner> {
    let api_key = config.api_key()?;
    let provider = Provider::OpenAI {
        api_key,
        api_base: config.llm.api_base.clone(),
        model: config.llm.model.clone(),
    };

    Ok(Runner::new(Arc::new(LLMClientFactory::new(provider))).with_max_turns(config.llm.max_turns))
}

fn search_tool(config: &HandoffConfig) -> Arc<SearchTool> {
    Arc::new(SearchTool::with_base_url(&config.search.base_url).max_topics(config.search.max_topics))
}

async fn run_chat(config: &HandoffConfig, output: &Output) -> Result<()> {
    let runner = build_runner(config)?;
    let agents = AgentSet::text(search_tool(config));
    let session = TriageSession::new(runner, Arc::clone(&agents.triage));

    output.banner("Multi-Agent System Interactive Session");
    output.agent_roster(&AGENT_ROLES);
    output.hint("Type 'exit' or 'quit' to end the session.");
    output.rule('=');

    let stdin = BufReader::new(tokio::io::stdin());
    let handled = chat::run_interactive(stdin, &session, output).await?;
    tracing::info!(handled, "Chat session ended");
    Ok(())
}

async fn run_demo(config: &HandoffConfig, delay: Duration, output: &Output) -> Result<()> {
    let runner = build_runner(config)?;
    let agents = AgentSet::text(search_tool(config));
    let session = TriageSession::new(runner, Arc::clone(&agents.triage));

    output.banner("Multi-Agent System Demo");
    output.info("This demo will run through a series of predefined test queries to demonstrate");
    output.info("how the various agents work together to handle different types of requests.");
    output.rule('=');

    demo::run_demo(&session, &demo::TEST_QUERIES, delay, output).await;
    Ok(())
}

async fn run_voice(config: &HandoffConfig, once: bool, output: &Output) -> Result<()> {
    let runner = build_runner(config)?;
    let api_key = config.api_key()?;
    let agents = AgentSet::voice(&config.voice.model, search_tool(config));

    let workflow = SingleAgentVoiceWorkflow::new(runner, Arc::clone(&agents.triage));
    let models = Arc::new(OpenAIVoice::new(
        api_key,
        config.llm.api_base.clone(),
        &config.voice,
    ));
    let io = open_default_io(&config.voice, once).context("Failed to open audio devices")?;
    let pipeline = VoicePipeline::new(
        workflow,
        models.clone(),
        models,
        VoicePipelineConfig::for_session(&config.voice, io.continuous),
    );

    output.banner("Voice Multi-Agent System");
    output.agent_roster(&AGENT_ROLES);
    if io.continuous {
        output.hint("Speak into your microphone when prompted. Press Ctrl+C to exit.");
    } else {
        output.hint(&format!("Testing with {}.", io.source.describe()));
    }
    output.rule('=');

    let continuous = io.continuous;
    let mut session = VoiceSession::new(pipeline, io.source, io.sink, *output);

    if continuous {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };
        let turns = session.run_until(shutdown).await?;
        output.info(&format!(
            "\nExiting voice agent session after {} turns. Goodbye!",
            turns
        ));
    } else {
        session.run_turn().await?;
        output.success("Voice interaction completed successfully!");
    }

    Ok(())
}

fn show_agents(config: &HandoffConfig, output: &Output) {
    let agents = AgentSet::text(search_tool(config));

    output.header("Agents");
    output.table_header(&["Agent", "Tools", "Handoffs"]);
    for agent in agents.all() {
        let tools = agent.tools().tool_names().join(", ");
        let handoffs = agent
            .handoffs()
            .iter()
            .map(|h| h.handoff_tool_name())
            .collect::<Vec<_>>()
            .join(", ");
        output.table_row(&[
            agent.name(),
            if tools.is_empty() { "-" } else { tools.as_str() },
            if handoffs.is_empty() { "-" } else { handoffs.as_str() },
        ]);
    }

    output.header("Models");
    output.kv("text", &config.llm.model);
    output.kv("voice", &config.voice.model);
    output.kv("speech-to-text", &config.voice.stt_model);
    output.kv("text-to-speech", &format!("{} ({})", config.voice.tts_model, config.voice.voice));
    output.newline();
}
