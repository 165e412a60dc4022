use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use deskwm::components::{DebugLogHandle, debug_log, set_global_debug_log};
use deskwm::config::{Cli, WorkspaceConfig};
use deskwm::content::ModuleContent;
use deskwm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use deskwm::persistence::FileLayoutStore;
use deskwm::runner::{Workspace, run};
use deskwm::tracing_sub;
use deskwm::window::{Chrome, WindowManager, WindowStore};

const PANIC_TAIL_LINES: usize = 40;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = match WorkspaceConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("deskwm: {err}");
            return ExitCode::FAILURE;
        }
    };
    config.apply(&cli);

    let log = DebugLogHandle::default();
    set_global_debug_log(log.clone());
    debug_log::install_panic_hook();
    tracing_sub::init_default();

    let grid = config.grid();
    let store = match config.jitter_seed {
        Some(seed) => WindowStore::with_seed(seed),
        None => WindowStore::new(),
    };
    let layouts_dir = config.layouts_dir();
    tracing::info!(layouts_dir = %layouts_dir.display(), ?grid, "starting workspace");

    let wm = WindowManager::with_store(store, Default::default(), Chrome::for_cells(grid));
    let mut workspace = Workspace::new(
        wm,
        Box::new(FileLayoutStore::new(layouts_dir)),
        Box::new(ModuleContent::new(log.clone())),
        grid,
    )
    .with_layout_name(config.default_layout_name.clone());

    // The output driver restores the terminal when dropped, including while
    // unwinding, so the panic report below lands on the normal screen.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ConsoleOutputDriver::new().and_then(|mut output| {
            run(
                ConsoleInputDriver::new(),
                &mut output,
                &mut workspace,
                Duration::from_millis(16),
            )
        })
    }));
    if debug_log::take_panic_pending() {
        for line in log.tail(PANIC_TAIL_LINES, 0) {
            eprintln!("{line}");
        }
    }
    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            eprintln!("deskwm: {err}");
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}
