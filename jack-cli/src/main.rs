//! Entrypoint for CLI
mod error;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use jack::{compile_with, prelude::*, IMPL_VERSION};
use log::{error, info, warn};

use self::error::AppError;

static USAGE: &str = r#"
usage: jackc [--conf FILE] PATH

arguments:
    PATH           A .jack source file, or a directory of .jack files.
                   Each X.jack is compiled to X.vm beside it.

options:
    --conf FILE    YAML file overriding the runtime subroutine names

examples:
    jackc Main.jack
    jackc --conf runtime.yaml Pong/
"#;

fn main() {
    if let Err(err) = simple_logger::SimpleLogger::new().env().init() {
        eprintln!("failed to initialise logger: {err}");
    }

    let args = match parse_args(env::args().skip(1)) {
        Some(args) => args,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(1)
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let conf = match args.conf {
        Some(filepath) => load_conf(filepath)?,
        None => JackConf::default(),
    };

    let sources = find_sources(&args.path)?;
    if sources.is_empty() {
        warn!("no .jack files in {}", args.path.display());
    }

    for source in sources {
        compile_file(&source, &conf)?;
    }

    Ok(())
}

fn load_conf(filepath: impl AsRef<Path>) -> Result<JackConf, AppError> {
    let mut file = fs::File::open(filepath.as_ref())?;
    let conf: JackConf = serde_yaml::from_reader(&mut file)?;
    info!("runtime {:?}", conf.runtime);
    Ok(conf)
}

/// The path itself when it's a file, otherwise the `.jack` files
/// directly inside the directory in name order.
fn find_sources(path: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = vec![];
    for entry in fs::read_dir(path)? {
        let filepath = entry?.path();
        if filepath.is_file() && filepath.extension().map_or(false, |ext| ext == "jack") {
            sources.push(filepath);
        }
    }
    sources.sort();

    Ok(sources)
}

fn compile_file(filepath: &Path, conf: &JackConf) -> Result<(), AppError> {
    info!("compiling {}", filepath.display());

    let source_code = fs::read_to_string(filepath)?;

    // Output is only written once the whole class compiled,
    // so a failure never leaves a partial file behind.
    let writer = compile_with(source_code.as_str(), VmWriter::new(Vec::<u8>::new()), conf)
        .map_err(|err| AppError::source(filepath, err))?;
    let count = writer.count();

    let outpath = filepath.with_extension("vm");
    fs::write(&outpath, writer.into_inner())?;
    info!("wrote {} instructions to {}", count, outpath.display());

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let mut conf = None;
    let mut path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--conf" => conf = Some(PathBuf::from(args.next()?)),
            "-h" | "--help" => return None,
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }

    Some(Args { conf, path: path? })
}

fn print_usage() {
    println!("jackc v{IMPL_VERSION}");
    println!("{USAGE}");
}

struct Args {
    /// Runtime configuration file
    conf: Option<PathBuf>,
    /// Source file or directory
    path: PathBuf,
}
