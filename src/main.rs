use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use ember::{
    compiler::compiler::Session,
    config::{CompilerOptions, Emit},
    display_error,
};
use log::{error, info};

#[derive(Parser)]
#[command(name = "ember", version, about = "Parses ember source files")]
struct Args {
    /// Source file to parse.
    file: PathBuf,

    /// Artifact to write for the file.
    #[arg(long, value_enum, default_value_t = Emit::Tree)]
    emit: Emit,

    /// Directory the artifact is written to.
    #[arg(long, default_value = "build")]
    out: PathBuf,

    /// Columns a tab counts for.
    #[arg(long, default_value_t = 4)]
    tab_width: u32,

    /// Print the artifact instead of writing it.
    #[arg(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let options = CompilerOptions {
        tab_width: args.tab_width,
        emit: args.emit,
        output_dir: args.out,
        ..CompilerOptions::default()
    };

    let start = Instant::now();
    let mut session = Session::new(options);
    let index = match session.compile(&args.file) {
        Ok(index) => index,
        Err(err) => {
            display_error(&err, &args.file, "");
            return ExitCode::FAILURE;
        }
    };

    for file in session.files() {
        for diagnostic in &file.diagnostics {
            display_error(diagnostic, &file.path, &file.source);
        }
    }

    if session.has_errors() {
        error!("{} has errors, nothing written", session.file(index).file_name());
        return ExitCode::FAILURE;
    }

    if args.stdout {
        print!("{}", session.render(index));
    } else if let Err(err) = session.emit(index) {
        error!("Could not write output: {}", err);
        return ExitCode::FAILURE;
    }

    info!("Total time: {:?}", start.elapsed());
    ExitCode::SUCCESS
}
