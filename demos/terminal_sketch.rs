//! Terminal Sketch: draw a seed with the mouse, watch the model finish it.
//!
//! Drag with the left button to draw the seed; releasing starts the model.
//! Every finished drawing is cropped and written to `--out-dir`.
//!
//! Press 'q', Escape or Ctrl+C to quit.
//!
//! ```text
//! cargo run --example terminal_sketch -- --rounds 5
//! cargo run --example terminal_sketch -- --fixed-seed --rounds 3
//! RUST_LOG=sketchflow=debug cargo run --example terminal_sketch -- --log-file sketch.log
//! ```

use clap::Parser;
use env_logger::{Builder, Env, Target};
use sketchflow::terminal::{TerminalGuard, TerminalPreview};
use sketchflow::{
    CancelToken, DoodleModel, InputAdapter, PngDirectory, Point, Seed, Session, SessionConfig,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Seed a doodle in the terminal and let a stroke model continue it")]
struct Args {
    /// Frames per second used to pace model strokes.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop after this many rounds.
    #[arg(long)]
    rounds: Option<u32>,

    /// Directory receiving the cropped PNGs.
    #[arg(long, default_value = "sketches")]
    out_dir: PathBuf,

    /// Random seed for the doodle model.
    #[arg(long, default_value_t = 7)]
    model_seed: u64,

    /// Skip the terminal and start from a single dot at (300, 300).
    #[arg(long)]
    fixed_seed: bool,

    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logger(log_file: Option<&PathBuf>) -> sketchflow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("sketchflow=info"));
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn main() -> sketchflow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_file.as_ref())?;

    let config = SessionConfig {
        target_fps: args.fps,
        max_rounds: args.rounds,
        ..SessionConfig::default()
    };
    let mut sink = PngDirectory::new(&args.out_dir)?;
    let model = DoodleModel::new(args.model_seed);

    if args.fixed_seed {
        let mut session = Session::spawn(config, model);
        let seed = Seed::fixed(Point::new(300.0, 300.0));
        let rounds = session.run(&seed, &mut sink)?;
        session.close();
        println!("{rounds} drawing(s) written to {}", args.out_dir.display());
        return Ok(());
    }

    // Without a round limit only the quit keys stop the session.
    let guard = TerminalGuard::enter(true, true)?;
    let cancel = CancelToken::new();
    let input = InputAdapter::spawn_terminal(config.input, cancel.clone());
    let preview = TerminalPreview::stdout(config.input.mapping);

    let mut session = Session::spawn(config, model)
        .with_cancel_token(cancel)
        .with_presenter(Box::new(preview));

    let result = match session.seed_from_input(&input) {
        Ok(Some(seed)) => session.run(&seed, &mut sink),
        Ok(None) => Ok(0),
        Err(e) => Err(e),
    };

    input.join();
    session.close();
    drop(guard);

    let rounds = result?;
    println!("{rounds} drawing(s) written to {}", args.out_dir.display());
    Ok(())
}
