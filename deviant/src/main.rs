use clap::Parser;
use console::style;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Compiler for the Deviant language.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Source file (`.dvt` or `.dv`).
    input: PathBuf,

    /// Path the generated textual IR is written to.
    #[arg(short, long, default_value = "out.ll")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();

    match args.input.extension().and_then(|ext| ext.to_str()) {
        Some("dvt") | Some("dv") => {}
        _ => fail(&format!(
            "{} is not a deviant source file (expected `.dvt` or `.dv`)",
            args.input.display()
        )),
    }

    let source_text = match fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) => fail(&format!("cannot read {}: {}", args.input.display(), err)),
    };

    let name = args
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main");

    match deviant::compile(name, &source_text) {
        Ok(module) => {
            print!("{}", module);
            if let Err(err) = fs::write(&args.output, module.to_string()) {
                fail(&format!("cannot write {}: {}", args.output.display(), err));
            }
        }
        Err(errors) => {
            eprint!("{}", errors);
            fail("compilation failed");
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", style("error:").red().bold(), message);
    process::exit(1);
}
