use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use algoscope::{
    ChannelClient, EngineConfig, Interpreter, Pacing, PlaybackStatus, SvgBackend,
    VisualizationPayload, VisualizationSession,
    channel::{
        protocol::ServerMessage,
        topics::{self, TopicCategory},
    },
};
use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "algoscope", version)]
struct Cli {
    /// Engine configuration (TOML). Defaults plus `ALGOSCOPE_*` environment overrides if absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode and dry-run a payload, reporting every skipped command.
    Validate(ValidateArgs),
    /// Play a payload headless and optionally write the final frame.
    Play(PlayArgs),
    /// List topic presets.
    Topics,
    /// Request a visualization from the backend and play it.
    Connect(ConnectArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input visualization payload JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Exit with an error when any command would be skipped.
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Playback speed multiplier.
    #[arg(long)]
    speed: Option<f64>,

    /// Jump straight to the scene before this step instead of playing in real time.
    #[arg(long)]
    until: Option<usize>,

    /// Speak narration only through the local synthesizer.
    #[arg(long)]
    no_voice: bool,

    /// Write the final scene as SVG.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the final scene as PNG.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Raster scale for `--png`.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input visualization payload JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Parser, Debug)]
struct ConnectArgs {
    /// Topic preset slug (see `algoscope topics`).
    #[arg(long, conflicts_with = "request")]
    topic: Option<String>,

    /// Free-form visualization request.
    #[arg(long)]
    request: Option<String>,

    /// Seconds to wait for the backend's answer.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    #[command(flatten)]
    out: OutputArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args).await,
        Command::Play(args) => cmd_play(args, config).await,
        Command::Topics => cmd_topics(),
        Command::Connect(args) => cmd_connect(args, config).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::from_env().context("read configuration from environment")?,
    };
    Ok(config)
}

fn read_payload(path: &Path) -> anyhow::Result<VisualizationPayload> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("open payload '{}'", path.display()))?;
    let payload = VisualizationPayload::from_json(&src)
        .with_context(|| format!("parse payload '{}'", path.display()))?;
    Ok(payload)
}

async fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let payload = read_payload(&args.in_path)?;
    let (info, timeline) = payload.into_parts();
    let interpreter = Interpreter::new(SvgBackend::new());

    let mut applied = 0;
    let mut skipped = 0;
    let setup = interpreter.execute(&timeline.setup, Pacing::Instant).await;
    applied += setup.applied;
    for s in &setup.skipped {
        skipped += 1;
        println!("initial state, command {}: {}", s.index, s.error);
    }
    for (i, step) in timeline.steps.iter().enumerate() {
        let report = interpreter.execute(&step.commands, Pacing::Instant).await;
        applied += report.applied;
        for s in &report.skipped {
            skipped += 1;
            println!("step {i}, command {}: {}", s.index, s.error);
        }
    }

    println!(
        "{}: {} steps, {applied} commands applied, {skipped} skipped",
        info.title,
        timeline.len()
    );
    if args.strict && skipped > 0 {
        anyhow::bail!("{skipped} command(s) would be skipped");
    }
    Ok(())
}

async fn cmd_play(args: PlayArgs, config: EngineConfig) -> anyhow::Result<()> {
    let payload = read_payload(&args.in_path)?;
    let (session, backend) = make_session(&config, &args.out)?;
    run(&session, payload, &args.out).await?;
    write_outputs(&backend, &args.out)
}

fn cmd_topics() -> anyhow::Result<()> {
    for (category, heading) in [
        (TopicCategory::DataStructure, "Data structures"),
        (TopicCategory::Algorithm, "Algorithms"),
        (TopicCategory::Pattern, "Patterns"),
    ] {
        println!("{heading}:");
        for topic in topics::TOPICS.iter().filter(|t| t.category == category) {
            println!("  {:<20} {}", topic.slug, topic.title);
        }
    }
    Ok(())
}

async fn cmd_connect(args: ConnectArgs, config: EngineConfig) -> anyhow::Result<()> {
    let request = match (&args.topic, &args.request) {
        (Some(slug), _) => topics::request_for(slug, slug),
        (None, Some(text)) => text.clone(),
        (None, None) => anyhow::bail!("pass --topic or --request"),
    };

    let url = config.ws_url()?;
    let (handle, mut inbound, _task) =
        ChannelClient::new(url.clone(), config.reconnect_policy()).spawn();
    let mut status = handle.status_watch();
    status
        .wait_for(|s| *s == algoscope::ConnectionStatus::Connected)
        .await
        .with_context(|| format!("connect to '{url}'"))?;
    anyhow::ensure!(
        handle.request_visualization(request.clone(), None),
        "connection to '{url}' dropped before the request was sent"
    );
    eprintln!("requested: {request}");

    let data = tokio::time::timeout(Duration::from_secs(args.timeout), async {
        while let Some(msg) = inbound.recv().await {
            match msg {
                ServerMessage::VisualizationResponse { data } => return Ok(data),
                ServerMessage::Error { message } => anyhow::bail!("backend error: {message}"),
                ServerMessage::Status { message } => eprintln!("status: {message}"),
                other => tracing::debug!(kind = other.kind(), "ignored"),
            }
        }
        anyhow::bail!("channel closed before a visualization arrived")
    })
    .await
    .context("timed out waiting for the visualization")??;

    let payload = VisualizationPayload::from_value(data).context("parse visualization")?;
    let (session, backend) = make_session(&config, &args.out)?;
    run(&session, payload, &args.out).await?;
    write_outputs(&backend, &args.out)
}

fn make_session(
    config: &EngineConfig,
    out: &OutputArgs,
) -> anyhow::Result<(VisualizationSession, Rc<RefCell<SvgBackend>>)> {
    let mut config = config.clone();
    if out.no_voice {
        config.voice.enabled = false;
    }
    let backend = Rc::new(RefCell::new(SvgBackend::new()));
    let session = VisualizationSession::from_config(&config, backend.clone())?;
    if let Some(speed) = out.speed {
        session.set_speed(speed)?;
    }
    Ok((session, backend))
}

async fn run(
    session: &VisualizationSession,
    payload: VisualizationPayload,
    out: &OutputArgs,
) -> anyhow::Result<()> {
    let mut report = session.load(payload).await;
    let info = session.info();
    eprintln!("{}", info.title);
    if let Some(subtitle) = &info.subtitle {
        eprintln!("{subtitle}");
    }
    if let Some(text) = &info.educational {
        eprintln!("\n{text}\n");
    }

    match out.until {
        Some(step) => report.merge(session.playback().seek(step).await),
        None => report.merge(session.play().await),
    }

    let playback = session.playback();
    eprintln!(
        "{} at step {}/{} ({} commands applied, {} skipped)",
        match playback.status() {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Finished => "finished",
        },
        playback.cursor(),
        playback.total(),
        report.applied,
        report.skipped.len()
    );
    Ok(())
}

fn write_outputs(backend: &Rc<RefCell<SvgBackend>>, out: &OutputArgs) -> anyhow::Result<()> {
    if let Some(path) = &out.svg {
        create_parent(path)?;
        std::fs::write(path, backend.borrow().to_svg())
            .with_context(|| format!("write svg '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &out.png {
        create_parent(path)?;
        let frame = backend.borrow().rasterize(out.scale)?;
        frame
            .save_png(path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
