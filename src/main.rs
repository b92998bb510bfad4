// Entry point and high-level CLI flow.
//
// The dataset is loaded once, then either:
// - rendered a single time for the selection given on the command line
//   (`--once`), or
// - shown in an interactive menu where every accepted answer is one filter
//   event and the whole dashboard is redrawn after it.
mod aggregate;
mod config;
mod controller;
mod filter;
mod input;
mod loader;
mod output;
mod types;
mod util;
mod view;

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{Args, OutputFormat};
use controller::{Controller, FilterEvent};
use input::InputError;
use loader::LoadError;
use types::Dataset;

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // stdout belongs to the dashboard.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(args: &Args) -> Result<Dataset, LoadError> {
    let names = args.column_names();
    if args.data.as_os_str() == "-" {
        loader::read_dataset(io::stdin().lock(), &names)
    } else {
        loader::load_dataset(&args.data, &names)
    }
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask for the new value of the control behind menu entry `choice`.
fn prompt_event(controller: &Controller, choice: &str) -> Option<Result<FilterEvent, InputError>> {
    let options = controller.options();
    let event = match choice {
        "1" => {
            let answer = read_line("Year: ")?;
            input::parse_year(&answer)
        }
        "2" => {
            print!("{}", output::render_options(&options.suppliers));
            let answer = read_line("Suppliers (names or numbers, comma separated; empty for all): ")?;
            input::parse_multi_select(&answer, &options.suppliers).map(FilterEvent::SuppliersChanged)
        }
        "3" => {
            print!("{}", output::render_options(&options.doc_types));
            let answer = read_line("Document types (names or numbers, comma separated; empty for all): ")?;
            input::parse_multi_select(&answer, &options.doc_types).map(FilterEvent::DocTypesChanged)
        }
        "4" => {
            let answer = read_line("Amount range (min max): ")?;
            input::parse_range(&answer)
        }
        _ => return None,
    };
    Some(event)
}

fn run_menu(controller: &mut Controller) {
    println!("{}", output::render_dashboard(controller.view(), controller.selection()));
    loop {
        print!("{}", output::render_menu(controller.options(), controller.selection()));
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "0" => break,
            "1" | "2" | "3" | "4" => match prompt_event(controller, &choice) {
                Some(Ok(event)) => {
                    controller.handle(event);
                    println!("\n{}", output::render_dashboard(controller.view(), controller.selection()));
                }
                Some(Err(e)) => println!("Invalid input: {}\n", e),
                None => break,
            },
            _ => println!("Invalid choice. Please enter 0-4.\n"),
        }
    }
    println!("Exiting the program.");
}

fn render_once(controller: &Controller, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Text => {
            print!("{}", output::render_dashboard(controller.view(), controller.selection()));
            ExitCode::SUCCESS
        }
        OutputFormat::Json => match output::render_json(controller.view(), controller.selection()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("failed to serialize view: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let dataset = match load(&args) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(path = %args.data.display(), "failed to load invoices: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(&dataset, args.currency.as_str());
    let options = controller.options();
    info!(
        rows = dataset.len(),
        years = options.years.len(),
        suppliers = options.suppliers.len(),
        doc_types = options.doc_types.len(),
        "invoices loaded"
    );
    if let Some(year) = args.year.filter(|y| !options.years.contains(y)) {
        warn!(year, "requested year has no invoices");
    }

    for event in args.selection_events(controller.options()) {
        controller.handle(event);
    }

    if args.once {
        return render_once(&controller, args.format);
    }
    run_menu(&mut controller);
    ExitCode::SUCCESS
}
