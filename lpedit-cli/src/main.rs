mod input;
mod render;

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufRead};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::LevelFilter;

use lpedit_core::{Config, EventBus, MutationOutcome, PodBinding, PodController, TapOutcome, ViewCursor};
use lpedit_net::RemoteBackend;

use input::Command;

type Controller = Rc<RefCell<PodController<RemoteBackend>>>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn init_logging(level: LevelFilter) {
    use simplelog::{Config, WriteLogger};

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("lpedit")
        .join("lpedit.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/lpedit.log")) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(level, Config::default(), log_file) {
        eprintln!("logging disabled: {}", e);
        return;
    }

    log::info!("lpedit starting (log level: {:?})", level);
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");

    let config = Config::load();
    init_logging(if verbose { LevelFilter::Debug } else { config.log_level() });

    let addr = flag_value(&args, "--connect").unwrap_or_else(|| config.backend_address());
    let name = flag_value(&args, "--name").unwrap_or_else(|| config.client_name());

    let remote = RemoteBackend::connect(&addr, &name)?;
    println!("connected to {} as {:?}; type 'help' for commands", addr, remote.client_id());

    let controller: Controller = Rc::new(RefCell::new(PodController::new(
        remote,
        config.service_options(),
    )));
    let mut bus = EventBus::new();
    let binding = PodBinding::attach(&mut bus, Rc::clone(&controller));
    let updates = controller.borrow_mut().subscribe();
    let lines = spawn_stdin_reader();

    let mut view = ViewCursor::new();
    let clock = Instant::now();

    loop {
        let events = controller.borrow_mut().backend_mut().poll_events();
        for event in &events {
            bus.emit_named(event);
        }
        let reverted = controller.borrow_mut().tick(Instant::now());
        if reverted > 0 {
            println!("{} edit(s) not confirmed by the device, reverted", reverted);
        }
        if let Some(snapshot) = updates.latest() {
            view.sync_with(&snapshot.pod);
            println!("{}", snapshot.summary());
        }
        report_backend_notices(&controller);
        if controller.borrow().backend().server_shutdown() {
            println!("backend went away");
            break;
        }

        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match input::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => run(command, &controller, &mut view, clock),
                Ok(None) => {}
                Err(e) => println!("{}", e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    binding.detach(&mut bus);
    drop(bus);
    controller.borrow_mut().unsubscribe(updates.id);
    if let Ok(cell) = Rc::try_unwrap(controller) {
        let remote = cell.into_inner().into_backend();
        if !remote.server_shutdown() {
            remote.disconnect()?;
        }
    }
    log::info!("lpedit exiting");
    Ok(())
}

fn report_backend_notices(controller: &Controller) {
    let mut controller = controller.borrow_mut();
    let backend = controller.backend_mut();
    if let Some(devices) = backend.take_devices() {
        if devices.is_empty() {
            println!("no devices attached");
        }
        for device in devices {
            println!("  {}  {}", device.id, device.name);
        }
    }
    if let Some(message) = backend.take_error() {
        println!("backend error: {}", message);
    }
}

fn report(outcome: MutationOutcome) {
    if let MutationOutcome::Rejected(reason) = outcome {
        println!("rejected: {}", reason);
    }
}

fn report_io(result: io::Result<()>) {
    if let Err(e) = result {
        println!("not sent: {}", e);
    }
}

fn run(command: Command, controller: &Controller, view: &mut ViewCursor, clock: Instant) {
    let mut controller = controller.borrow_mut();
    match command {
        Command::Show => {
            for line in render::show(&controller.snapshot()) {
                println!("{}", line);
            }
        }
        Command::View(set) => {
            let snapshot = controller.snapshot();
            if !view.view_set(&snapshot.pod, set) {
                println!("set {} not loaded", set);
                return;
            }
            let active = snapshot.current_preset.as_ref();
            for line in render::preset_listing(view.viewed_presets(&snapshot.pod), active) {
                println!("{}", line);
            }
        }
        Command::Param(id, value) => report(controller.request_parameter_value(id, &value)),
        Command::Tempo(bpm) => report(controller.request_tempo(&bpm)),
        Command::Tap => {
            let result = controller.tap_tempo(clock.elapsed().as_millis() as u64);
            match result.outcome {
                TapOutcome::Anchored => println!("tap again"),
                TapOutcome::Estimated(bpm) => println!("{:.1} bpm", bpm),
                TapOutcome::OutOfRange(bpm) => println!("{:.1} bpm is out of range", bpm),
                TapOutcome::NoTarget(bpm) => println!("{:.1} bpm, but no preset is active", bpm),
            }
            if let Some(outcome) = result.submitted {
                report(outcome);
            }
        }
        Command::Preset(set, preset) => report_io(controller.set_preset(preset, set)),
        Command::Start(device) => report_io(controller.start_device(&device)),
        Command::Stop => report_io(controller.stop_device()),
        Command::Save => report_io(controller.save_preset()),
        Command::Reload => report_io(controller.reload_preset()),
        Command::Devices => report_io(controller.list_devices()),
        Command::Help => println!("{}", input::HELP),
        Command::Quit => {}
    }
}
