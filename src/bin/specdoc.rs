//! Command-line interface for specdoc
//! This binary parses one planning artifact and prints the typed record as
//! JSON, which is handy for inspecting what a viewer will receive.
//!
//! Usage:
//!   specdoc `<path>` [--kind `<kind>`]   - Parse a document (kind inferred from the file name by default)
//!   specdoc --list-kinds                 - List the supported document kinds

use clap::{Arg, ArgAction, Command};
use specdoc::{parse_artifact, ArtifactKind};

fn main() {
    let matches = Command::new("specdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting spec-kit planning documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the markdown document")
                .required_unless_present("list-kinds")
                .index(1),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .short('k')
                .help("Document kind (e.g. 'spec', 'tasks'; default: infer from the file name)")
                .default_value("auto"),
        )
        .arg(
            Arg::new("list-kinds")
                .long("list-kinds")
                .help("List supported document kinds")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-kinds") {
        handle_list_kinds_command();
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing kinds");
    let kind = matches.get_one::<String>("kind").expect("kind has a default");
    handle_parse_command(path, kind);
}

fn handle_parse_command(path: &str, kind: &str) {
    let kind = resolve_kind(path, kind).unwrap_or_else(|| {
        eprintln!("Cannot determine document kind for '{}'", path);
        eprintln!("\nPass one explicitly with --kind:");
        for kind in ArtifactKind::ALL {
            eprintln!("  {}", kind.name());
        }
        std::process::exit(1);
    });

    let text = std::fs::read_to_string(path).unwrap_or_else(|error| {
        eprintln!("Cannot read '{}': {}", path, error);
        std::process::exit(1);
    });

    let parsed = parse_artifact(kind, &text);
    let json = serde_json::to_string_pretty(&parsed).unwrap_or_else(|error| {
        eprintln!("Error formatting output: {}", error);
        std::process::exit(1);
    });
    println!("{}", json);
}

fn resolve_kind(path: &str, kind: &str) -> Option<ArtifactKind> {
    if kind == "auto" {
        ArtifactKind::from_path(path)
    } else {
        ArtifactKind::from_name(kind)
    }
}

fn handle_list_kinds_command() {
    for kind in ArtifactKind::ALL {
        println!("{}", kind.name());
    }
}
