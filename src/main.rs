use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ship_xb11::audio::open_terminal_bell;
use ship_xb11::backend::SoundPlayer;
use ship_xb11::config::Settings;
use ship_xb11::display::input::{spawn_event_reader, TerminalInput};
use ship_xb11::display::{playfield_origin, TerminalGraphics, TerminalSession};
use ship_xb11::error::StartupError;
use ship_xb11::frame_loop::{self, FramePacer};
use ship_xb11::game::{Game, SpriteSet};

// ── Logging ───────────────────────────────────────────────────────────────────

/// The screen belongs to the game, so log records go to a file. Without
/// a writable file there is no logging at all.
fn init_logging(settings: &Settings) {
    let file = match File::create(&settings.log_path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let settings = Settings::from_env();
    init_logging(&settings);
    settings.log_warnings();
    log::info!("starting with {:?}", settings);

    let mut out = BufWriter::new(stdout());

    let session = match TerminalSession::enter(&mut out) {
        Ok(session) => session,
        Err(err) => return report(err),
    };

    let result = run(&mut out, &session, &settings);

    // Always restore the terminal before saying anything on stderr.
    session.restore(&mut out);
    let _ = out.flush();

    match result {
        Ok(()) => {
            log::info!("bye");
            ExitCode::SUCCESS
        }
        Err(err) => report(err),
    }
}

fn report(err: StartupError) -> ExitCode {
    log::error!("{}", err);
    eprintln!("ship_xb11: {}", err);
    ExitCode::from(err.exit_code())
}

fn run<W: Write>(
    out: &mut W,
    session: &TerminalSession,
    settings: &Settings,
) -> Result<(), StartupError> {
    let origin = playfield_origin(session.size.0, session.size.1);
    let mut gfx = TerminalGraphics::new(out, origin);
    let sprites = SpriteSet::load(&mut gfx, &settings.data_dir)?;

    let mut sound = open_terminal_bell(settings.sound);
    let mut game = Game::new(sprites, sound.is_some());

    let mut input = TerminalInput::new(spawn_event_reader()?, session.keyboard_enhanced);

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pacer = FramePacer::new(settings.tick_duration());

    let played = frame_loop::run(
        &mut game,
        &mut gfx,
        &mut input,
        sound.as_mut().map(|s| s as &mut dyn SoundPlayer),
        &mut rng,
        &mut pacer,
    );

    if let Some(sound) = sound.as_mut() {
        sound.shutdown();
    }

    log::info!(
        "final score {} (high score {})",
        game.score.score,
        game.score.high
    );
    played.map_err(StartupError::Terminal)
}
