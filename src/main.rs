use std::{collections::HashMap, fs, path::PathBuf};

use bloq::{
    console::StdoutConsole,
    run_source,
    snippets::{DirSnippetStore, SnippetStore},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// bloq is a small scripting language with arbitrary-precision decimal
/// math, loops and console output.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the contents argument as a file path instead of script text.
    #[arg(short, long)]
    file: bool,

    /// Treat the contents argument as the id of a stored snippet.
    #[arg(short, long, conflicts_with = "file")]
    snippet: bool,

    /// Save the script under this snippet id after running it.
    #[arg(long, value_name = "ID")]
    save: Option<String>,

    /// Print the final variable bindings after the run.
    #[arg(short, long)]
    bindings: bool,

    /// Directory holding stored snippets.
    #[arg(long, value_name = "DIR", default_value = ".bloq-snippets")]
    snippet_dir: PathBuf,

    contents: String,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .with_writer(std::io::stderr)
                             .init();

    let args = Args::parse();
    let mut store = DirSnippetStore::new(args.snippet_dir.clone());

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else if args.snippet {
        match store.load_snippet(&args.contents) {
            Ok(source) if !source.is_empty() => source,
            _ => {
                eprintln!("No snippet saved under '{}'.", &args.contents);
                std::process::exit(1);
            },
        }
    } else {
        args.contents.clone()
    };

    let mut console = StdoutConsole;
    let results = run_source(&script, &HashMap::new(), &mut console);

    if args.bindings {
        let mut names: Vec<&String> = results.variables.keys().collect();
        names.sort();
        for name in names {
            println!("{name} = {}", results.variables[name].to_text());
        }
    }

    if let Some(id) = args.save {
        if let Err(error) = store.save_snippet(&id, &script) {
            eprintln!("Failed to save snippet '{id}': {error}");
            std::process::exit(1);
        }
    }
}
