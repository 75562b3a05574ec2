use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use std::time::Duration;
use workout_core::engine::WARMUP_SECONDS;
use workout_core::media::{resolve_video_id, watch_url, OVERLAY_PLAYLIST};
use workout_core::prompt::{Equipment, FocusArea, DEFAULT_DURATION};
use workout_core::*;

#[derive(Parser)]
#[command(name = "nextworkout")]
#[command(about = "Guided interval workouts from built-in and imported plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in and imported workouts
    List,

    /// Show one workout in detail
    Show { id: String },

    /// Print a request for generating a new workout with a chat assistant
    Prompt {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Minutes, free text (e.g. 15-20)
        #[arg(long, default_value = DEFAULT_DURATION)]
        duration: String,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "beginner", value_parser = parse_level)]
        level: Level,

        /// Focus area ids, comma separated (fullBody, upperBody, core, ...)
        #[arg(long, value_delimiter = ',', value_parser = parse_focus)]
        focus: Vec<FocusArea>,

        /// Equipment ids, comma separated (none, dumbbells, resistanceBands, ...)
        #[arg(long, value_delimiter = ',', value_parser = parse_equipment)]
        equipment: Vec<Equipment>,

        #[arg(long)]
        notes: Option<String>,

        /// Print the chat link instead of the prompt text
        #[arg(long)]
        url: bool,
    },

    /// Import a workout from pasted JSON (file, or stdin when omitted or "-")
    Import { file: Option<PathBuf> },

    /// Delete an imported workout
    Delete { id: String },

    /// Run a guided session
    Start {
        id: String,

        /// Exercise to perform; repeat for several (default: all).
        /// Names are taken whole, so they may contain commas.
        #[arg(long = "exercise", value_name = "NAME")]
        exercise: Vec<String>,

        #[arg(long)]
        rounds: Option<u32>,

        /// Reps per exercise
        #[arg(long)]
        reps: Option<u32>,

        /// Rest between exercises/rounds, seconds
        #[arg(long)]
        rest: Option<u32>,

        /// Seconds per rep
        #[arg(long)]
        time_per_rep: Option<u32>,

        /// straight-sets or circuit
        #[arg(long, value_parser = parse_mode)]
        mode: Option<WorkoutMode>,

        /// Show the motivational overlay playlist
        #[arg(long)]
        zyzz: bool,

        /// Milliseconds per tick (for testing)
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,

        /// Disable sound cues
        #[arg(long)]
        no_audio: bool,
    },
}

fn parse_level(s: &str) -> std::result::Result<Level, String> {
    Level::parse(s).ok_or_else(|| format!("unknown level '{}'", s))
}

fn parse_mode(s: &str) -> std::result::Result<WorkoutMode, String> {
    WorkoutMode::parse(s).ok_or_else(|| format!("unknown workout mode '{}'", s))
}

fn parse_focus(s: &str) -> std::result::Result<FocusArea, String> {
    FocusArea::from_id(s).ok_or_else(|| {
        let ids: Vec<_> = FocusArea::ALL.iter().map(|f| f.id()).collect();
        format!("unknown focus area '{}' (expected one of: {})", s, ids.join(", "))
    })
}

fn parse_equipment(s: &str) -> std::result::Result<Equipment, String> {
    Equipment::from_id(s).ok_or_else(|| {
        let ids: Vec<_> = Equipment::ALL.iter().map(|e| e.id()).collect();
        format!("unknown equipment '{}' (expected one of: {})", s, ids.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    workout_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let mut store = PlanStore::new(FileStorage::new(data_dir));

    match cli.command {
        Commands::List => cmd_list(&store),
        Commands::Show { id } => cmd_show(&store, &id),
        Commands::Prompt {
            title,
            description,
            duration,
            level,
            focus,
            equipment,
            notes,
            url,
        } => {
            let request = PromptRequest {
                title,
                description,
                duration,
                level,
                focus_areas: focus,
                equipment,
                notes,
            };
            cmd_prompt(&request, url)
        }
        Commands::Import { file } => cmd_import(&mut store, file),
        Commands::Delete { id } => {
            store.delete_by_id(&id)?;
            println!("✓ Deleted workout {}", id);
            Ok(())
        }
        Commands::Start {
            id,
            exercise,
            rounds,
            reps,
            rest,
            time_per_rep,
            mode,
            zyzz,
            tick_ms,
            no_audio,
        } => {
            let plan = store.require(&id)?;
            let mut setup = SessionConfig::for_plan(&plan, &config.session);
            if !exercise.is_empty() {
                setup.selected_exercises = exercise;
            }
            setup.rounds = rounds.unwrap_or(setup.rounds);
            setup.reps_per_exercise = reps.unwrap_or(setup.reps_per_exercise);
            setup.rest_period = rest.unwrap_or(setup.rest_period);
            setup.time_per_rep = time_per_rep.unwrap_or(setup.time_per_rep);
            setup.workout_mode = mode.unwrap_or(setup.workout_mode);
            setup.zyzz_mode = zyzz;

            let cues = TerminalCues::new(&plan, config.audio.enabled && !no_audio, config.audio.bell);
            let session = Session::new(plan, setup)?;
            cmd_start(session, cues, Duration::from_millis(tick_ms))
        }
    }
}

fn cmd_list<S: Storage>(store: &PlanStore<S>) -> Result<()> {
    let plans = store.list_all();
    let custom = store.list_custom().len();

    println!("{} workouts ({} imported)", plans.len(), custom);
    println!();
    for plan in &plans {
        let marker = if workout_core::catalog::is_builtin(&plan.id) {
            ""
        } else {
            "  [imported]"
        };
        println!("  {}{}", plan.id, marker);
        println!(
            "    {} · {} · {} · {} exercises",
            plan.title,
            plan.level,
            plan.duration,
            plan.exercises.len()
        );
    }
    Ok(())
}

fn cmd_show<S: Storage>(store: &PlanStore<S>, id: &str) -> Result<()> {
    let plan = store.require(id)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.title);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", plan.description);
    println!("  Level: {}   Duration: {}", plan.level, plan.duration);
    println!(
        "  Rounds: {}   Reps: {}   Rest: {}",
        plan.instructions.rounds, plan.instructions.reps, plan.instructions.rest
    );

    for (i, exercise) in plan.exercises.iter().enumerate() {
        println!();
        let alternating = if exercise.altering { " (alternating)" } else { "" };
        println!("  {}. {}{}", i + 1, exercise.name, alternating);
        println!("     Targets: {}", exercise.target_muscles.join(", "));
        for step in &exercise.instructions {
            println!("     → {}", step);
        }
        for url in &exercise.video_urls {
            match resolve_video_id(url) {
                Some(video) => println!("     ℹ Video: {}", watch_url(&video)),
                None => println!("     ℹ Video: {}", url),
            }
        }
    }
    println!();
    Ok(())
}

fn cmd_prompt(request: &PromptRequest, url: bool) -> Result<()> {
    let prompt = build_prompt(request);
    if url {
        println!("{}", chat_url(&prompt));
    } else {
        print!("{}", prompt);
    }
    Ok(())
}

fn cmd_import<S: Storage>(store: &mut PlanStore<S>, file: Option<PathBuf>) -> Result<()> {
    let raw = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let plan = import_plan(store, &raw)?;
    println!("✓ Imported '{}' as {}", plan.title, plan.id);
    Ok(())
}

// ============================================================================
// Session runtime
// ============================================================================

/// Prints cue lines; sounds optionally ring the terminal bell
struct TerminalCues {
    /// (name, first resolvable video id) per plan exercise
    exercises: Vec<(String, Option<String>)>,
    audio: bool,
    bell: bool,
}

impl TerminalCues {
    fn new(plan: &Plan, audio: bool, bell: bool) -> Self {
        let exercises = plan
            .exercises
            .iter()
            .map(|ex| (ex.name.clone(), ex.video_ids().into_iter().next()))
            .collect();
        Self {
            exercises,
            audio,
            bell,
        }
    }
}

impl CueSink for TerminalCues {
    fn play(&mut self, cue: &Cue) -> Result<()> {
        let mut out = io::stdout().lock();
        match cue {
            Cue::Sound(sound) => {
                if !self.audio {
                    return Ok(());
                }
                let text = match sound {
                    Sound::Start => "Get ready!",
                    Sound::Begin => "Go!",
                    Sound::Rest => "Rest",
                    Sound::RestOver => "Back to work",
                    Sound::Done => "Done!",
                };
                let bell = if self.bell { "\x07" } else { "" };
                writeln!(out, "♪ {}{}", text, bell)?;
            }
            Cue::PlayVideo { exercise } => {
                let (name, video) = self.exercises.get(*exercise).ok_or_else(|| {
                    Error::Other(format!("no exercise at index {}", exercise))
                })?;
                match video {
                    Some(id) => writeln!(out, "▶ {}: {}", name, watch_url(id))?,
                    None => writeln!(out, "▶ {}", name)?,
                }
            }
            Cue::PauseVideo => writeln!(out, "⏸ Paused (p + Enter to resume)")?,
            Cue::ResumeVideo => writeln!(out, "▶ Resumed")?,
        }
        out.flush()?;
        Ok(())
    }
}

enum Input {
    Tick,
    TogglePause,
    Skip,
    Quit,
}

/// One tick per interval until the receiver goes away
fn spawn_ticker(tx: SyncSender<Input>, interval: Duration) {
    thread::spawn(move || loop {
        if !interval.is_zero() {
            thread::sleep(interval);
        }
        if tx.send(Input::Tick).is_err() {
            break;
        }
    });
}

/// Line commands from stdin. EOF only stops reading; the session keeps going.
fn spawn_commands(tx: SyncSender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let input = match line.trim() {
                "p" => Input::TogglePause,
                "s" => Input::Skip,
                "q" => Input::Quit,
                _ => continue,
            };
            if tx.send(input).is_err() {
                break;
            }
        }
    });
}

fn cmd_start(session: Session, cues: TerminalCues, interval: Duration) -> Result<()> {
    print_session_header(&session);

    let (tx, rx): (SyncSender<Input>, Receiver<Input>) = mpsc::sync_channel(1);
    spawn_commands(tx.clone());

    let mut driver = SessionDriver::start(session, cues);
    println!("Get ready... {}", WARMUP_SECONDS);
    spawn_ticker(tx, interval);

    while let Ok(input) = rx.recv() {
        let result = match input {
            Input::Tick => {
                driver.tick()?;
                print_status(&driver);
                Ok(())
            }
            Input::TogglePause => driver.toggle_pause(),
            Input::Skip => driver.skip(),
            Input::Quit => break,
        };

        // Disallowed commands are reported and ignored
        if let Err(e) = result {
            println!("  ! {}", e);
        }

        if driver.is_complete() {
            break;
        }
    }

    let summary = driver.finish();
    print_summary(&summary);
    Ok(())
}

fn print_session_header(session: &Session) {
    let config = session.config();
    let plan = session.plan();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.title);
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  {} · {} {}s × {} reps · {}s per rep · {}s rest",
        config.workout_mode,
        config.rounds,
        config.workout_mode.round_label().to_lowercase(),
        config.reps_per_exercise,
        config.time_per_rep,
        config.rest_period
    );
    for &i in session.selected() {
        println!("  • {}", plan.exercises[i].name);
    }
    if config.zyzz_mode {
        println!("  Overlay playlist:");
        for video in OVERLAY_PLAYLIST {
            println!("    {}", watch_url(video));
        }
    }
    println!("  Commands: p + Enter pause/resume, s + Enter skip rep, q + Enter quit");
    println!();
}

fn print_status<C: CueSink>(driver: &SessionDriver<C>) {
    let state = driver.state();
    let session = driver.session();
    let config = session.config();
    let plan = session.plan();

    let line = match state.phase {
        Phase::Warmup => format!("Get ready... {}", state.remaining),
        Phase::Active => format!(
            "[{}] {} · {} {}/{} · Rep {}/{} · {}s · {:.0}%",
            state.phase,
            plan.exercises[state.exercise].name,
            config.workout_mode.round_label(),
            state.round,
            config.rounds,
            state.rep,
            session.required_reps(state.exercise),
            state.remaining,
            driver.progress().percent
        ),
        Phase::Rest => {
            let next = driver
                .next_exercise()
                .map(|i| plan.exercises[i].name.as_str())
                .unwrap_or("-");
            format!(
                "[{}] {}s · Next: {} · {:.0}%",
                state.phase,
                state.remaining,
                next,
                driver.progress().percent
            )
        }
        Phase::Complete => "Workout complete!".to_string(),
    };

    if state.paused {
        println!("{} (paused)", line);
    } else {
        println!("{}", line);
    }
}

fn print_summary(summary: &SessionSummary) {
    println!();
    if summary.completed {
        println!("✓ {} finished!", summary.plan_title);
    } else {
        println!("Workout exited.");
    }
    println!(
        "  Reps: {}/{}   Time: {}:{:02}",
        summary.completed_reps,
        summary.total_reps,
        summary.elapsed_seconds / 60,
        summary.elapsed_seconds % 60
    );
    println!(
        "  Started: {}",
        summary.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
    );
}
