//! Arcade Engine headless runner
//!
//! Mounts one mission, lets the autopilot play it at a simulated 60 Hz
//! display rate and credits the result to an in-memory account.
//!
//! Usage:
//!   arcade-engine [--kind asteroids|survival|tower-defense] [--difficulty N]
//!                 [--objectives N] [--seed N] [--mission FILE] [--tuning FILE]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::error::Error;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use clap::{Parser, ValueEnum};

    use arcade_engine::input::InputAdapter;
    use arcade_engine::renderer::NullSurface;
    use arcade_engine::sim::{MineralTally, Outcome};
    use arcade_engine::{
        FrameStatus, GameLoop, HudSummary, MinigameKind, Mission, MissionConfig, MissionObserver,
        PlayerAccount, Settings, StyleSettings, Tuning, VisualSettings,
    };

    /// Simulated display refresh interval
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on missions that run longer than this (simulated seconds)
    const MAX_RUN_SECS: f64 = 600.0;

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum KindArg {
        Asteroids,
        Survival,
        TowerDefense,
    }

    impl From<KindArg> for MinigameKind {
        fn from(kind: KindArg) -> Self {
            match kind {
                KindArg::Asteroids => MinigameKind::Asteroids,
                KindArg::Survival => MinigameKind::Survival,
                KindArg::TowerDefense => MinigameKind::TowerDefense,
            }
        }
    }

    /// Play one mission headlessly with the autopilot and report the result.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Options {
        /// Minigame to play (ignored when --mission is given)
        #[arg(long, value_enum, default_value_t = KindArg::Asteroids)]
        kind: KindArg,
        /// Mission difficulty; scales hostile speed and spawn cadence
        #[arg(long, value_name = "LEVEL", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        difficulty: u32,
        /// Kills needed for victory
        #[arg(long, value_name = "COUNT", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        objectives: u32,
        /// Gameplay RNG seed
        #[arg(long, default_value_t = 0x5EED)]
        seed: u64,
        /// Mission record as JSON
        #[arg(long, value_name = "FILE")]
        mission: Option<PathBuf>,
        /// Balance overrides as JSON
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
    }

    #[derive(Default)]
    struct RunReport {
        outcome: Option<(Outcome, u64, MineralTally)>,
        last_summary: Option<HudSummary>,
    }

    struct LoggingObserver(Rc<RefCell<RunReport>>);

    impl MissionObserver for LoggingObserver {
        fn on_objective_resolved(&mut self, outcome: Outcome, final_score: u64, minerals: &MineralTally) {
            log::info!("Outcome: {:?}, final score {}", outcome, final_score);
            self.0.borrow_mut().outcome = Some((outcome, final_score, *minerals));
        }

        fn on_request_exit(&mut self) {
            log::info!("Exit requested");
        }

        fn on_summary(&mut self, summary: &HudSummary) {
            if self
                .0
                .borrow()
                .last_summary
                .as_ref()
                .is_none_or(|last| last.progress != summary.progress || last.wave != summary.wave)
            {
                log::debug!(
                    "Progress {}/{} score {} wave {}",
                    summary.progress,
                    summary.target,
                    summary.score,
                    summary.wave
                );
            }
            self.0.borrow_mut().last_summary = Some(summary.clone());
        }
    }

    fn load_tuning(path: Option<&Path>) -> Result<Tuning, Box<dyn Error>> {
        match path {
            Some(path) => Ok(Tuning::from_json(&std::fs::read_to_string(path)?)?),
            None => Ok(Tuning::default()),
        }
    }

    fn load_mission(options: &Options) -> Result<Mission, Box<dyn Error>> {
        match &options.mission {
            Some(path) => Ok(Mission::from_json(&std::fs::read_to_string(path)?)?),
            None => Ok(Mission::new(
                options.kind.into(),
                options.objectives,
                options.difficulty as u64 * 100,
                options.difficulty,
            )),
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let options = Options::parse();
        let tuning = load_tuning(options.tuning.as_deref())?;
        let mission = load_mission(&options)?;
        let kind = mission.minigame_type;

        let account = Rc::new(RefCell::new(PlayerAccount::new()));
        let report = Rc::new(RefCell::new(RunReport::default()));
        let input = InputAdapter::handle();
        input.borrow_mut().autopilot = true;

        let mut game = GameLoop::new(
            tuning,
            Settings::default(),
            input,
            Box::new(account.clone()),
            Box::new(LoggingObserver(report.clone())),
            Box::new(NullSurface::default()),
        );

        let config = MissionConfig::new(mission, StyleSettings::default(), VisualSettings::default());
        let token = game.mount(&config, options.seed)?;

        let mut now = 0.0;
        while game.frame(token, now) == FrameStatus::Continue {
            now += FRAME_MS;
            if now / 1000.0 > MAX_RUN_SECS {
                log::warn!("Mission still running after {} s, tearing down", MAX_RUN_SECS);
                game.teardown();
                break;
            }
        }
        game.dismiss();

        let report = report.borrow();
        let account = account.borrow();
        println!("=== {} ({:.1} s simulated) ===", kind.as_str(), now / 1000.0);
        match &report.outcome {
            Some((outcome, score, minerals)) => {
                println!("Outcome: {:?}  score: {}", outcome, score);
                for (mineral, count) in minerals.iter() {
                    println!("  {}: {}", mineral.as_str(), count);
                }
            }
            None => println!("Outcome: unresolved"),
        }
        if let Some(summary) = &report.last_summary {
            println!("Progress: {}/{}", summary.progress, summary.target);
        }
        println!(
            "Account: {} eWave tokens, {} minerals, {} missions",
            account.ewave_tokens,
            account.minerals.total(),
            account.missions_completed()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Engine (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; there is no standalone entry point
}
