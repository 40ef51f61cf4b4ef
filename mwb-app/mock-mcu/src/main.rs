use clap::Parser;
use embassy_executor::{Executor, Spawner};
use embassy_time::Delay;
use embedded_hal::digital::PinState;
use mwb_core::mk_static;
use mwb_core::utils::controllers::{
    MecanumDrive, MotionCommand, PinBank, PinId, PinMap, SystemController, MOTION_CHANNEL,
};
use std::convert::Infallible;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// Twelve pin ids: rear right, rear left, front right, front left (speed, dir1, dir2 each)
    #[clap(long, value_delimiter = ',', default_value = "0,1,2,3,4,5,6,7,8,9,10,11")]
    pins: Vec<PinId>,
    /// cap every duty at this value
    #[clap(long)]
    max_duty: Option<u16>,
    /// JSON-lines file of motion commands; a demo sequence runs when absent
    #[clap(long)]
    script: Option<PathBuf>,
}

/// Pin bank that logs every write to the console.
struct ConsolePins;

impl PinBank for ConsolePins {
    type Error = Infallible;

    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        info!(pin, "output");
        Ok(())
    }

    fn write_digital(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error> {
        info!(pin, ?level, "digital");
        Ok(())
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), Self::Error> {
        info!(pin, duty, "analog");
        Ok(())
    }
}

fn demo() -> Vec<MotionCommand> {
    vec![
        MotionCommand::Forward { s: 200, t: 500 },
        MotionCommand::TurnLeft { s: 150, t: 300 },
        MotionCommand::RotateCw { s: 100, t: 0 },
        MotionCommand::ShiftRight { fl: 180, rl: 180, rr: 180, fr: 180, t: 400 },
        MotionCommand::ShiftLeft { fl: 180, rl: 180, rr: 180, fr: 180, t: 400 },
        MotionCommand::Backward { s: 200, t: 500 },
        MotionCommand::Stop,
    ]
}

/// Parse a JSON-lines script; blank lines and `#` comments are skipped.
fn load_script(path: &PathBuf) -> Result<Vec<MotionCommand>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str::<MotionCommand>(line)
                .map_err(|e| format!("{}:{}: {e}", path.display(), n + 1))
        })
        .collect()
}

/// Serve `MOTION_CHANNEL` until `count` commands have run, then exit.
#[embassy_executor::task]
async fn motion_task(
    mut ctrl: SystemController<ConsolePins, Delay>,
    count: usize,
) {
    let mut failed = 0;
    for _ in 0..count {
        if ctrl.next_command().await.is_err() {
            failed += 1;
        }
    }
    info!(count, failed, "script finished");
    std::process::exit(if failed == 0 { 0 } else { 1 });
}

#[embassy_executor::task]
async fn script_task(commands: Vec<MotionCommand>) {
    let count = commands.len();
    for command in commands {
        MOTION_CHANNEL.send(command).await;
    }
    info!(count, "all commands queued");
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner, ctrl: SystemController<ConsolePins, Delay>, commands: Vec<MotionCommand>) {
    spawner.spawn(motion_task(ctrl, commands.len())).unwrap();
    spawner.spawn(script_task(commands)).unwrap();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();

    let slots: [PinId; 12] = match opts.pins.as_slice().try_into() {
        Ok(slots) => slots,
        Err(_) => {
            error!("expected 12 pin ids, got {}", opts.pins.len());
            std::process::exit(2);
        }
    };
    let pins = match PinMap::from_slots(slots) {
        Ok(pins) => pins,
        Err(e) => {
            error!(?e, "invalid pin map");
            std::process::exit(2);
        }
    };

    let commands = match &opts.script {
        Some(path) => match load_script(path) {
            Ok(commands) => commands,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        None => demo(),
    };

    let drive = match MecanumDrive::new(ConsolePins, Delay, pins, opts.max_duty) {
        Ok(drive) => drive,
        Err(e) => {
            error!(?e, "drive init failed");
            std::process::exit(1);
        }
    };
    let ctrl = SystemController::new(drive);

    let executor = mk_static!(Executor, Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner, ctrl, commands)).unwrap();
    });
}
