//! CLI smoke probe for `todoey_core`.
//!
//! Opens the store at the given path (default `<temp>/todoey.sqlite3`) and
//! prints one line per category. Logs go to `<temp>/todoey_logs`. Failing to
//! open the store is fatal.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use todoey_core::{core_version, CoreConfig, ListService, LogLevel};

const LOG_DIR_NAME: &str = "todoey_logs";

fn cli_config(db_arg: Option<OsString>, temp_dir: &Path) -> CoreConfig {
    let config = match db_arg {
        Some(path) => CoreConfig::with_db_path(PathBuf::from(path)),
        None => CoreConfig::in_dir(temp_dir),
    };
    config.log_to(temp_dir.join(LOG_DIR_NAME), LogLevel::build_default())
}

fn main() -> ExitCode {
    let config = cli_config(std::env::args_os().nth(1), &std::env::temp_dir());
    if let Err(err) = config.init_logging() {
        eprintln!("todoey: logging disabled: {err}");
    }

    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            log::error!("event=cli_start module=cli status=error error_code=store_open_failed error={err}");
            eprintln!("todoey: cannot open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = match ListService::new(store) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("todoey: cannot read store: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("todoey_core version={}", core_version());
    let categories = match service.load_categories() {
        Ok(categories) => categories,
        Err(err) => {
            eprintln!("todoey: cannot list categories: {err}");
            return ExitCode::FAILURE;
        }
    };

    for category in &categories {
        let items = service.load_items(category.uuid, None).unwrap_or_default();
        let done = items.iter().filter(|item| item.done).count();
        println!(
            "{} {:<24} {done}/{} done",
            category.colour,
            category.name,
            items.len()
        );
    }
    println!(
        "categories={} next_colour={}",
        categories.len(),
        service.rotation().peek()
    );

    ExitCode::SUCCESS
}
