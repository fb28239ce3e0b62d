use keypose::{Annotator, AnnotatorConfig, SkeletonSet};
use std::path::PathBuf;
use std::process::ExitCode;

// Reads annotation files, upgrading legacy transition encodings on the way in.
// With --rewrite the normalized form is written back in place.
fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args: Vec<String> = std::env::args().collect();
    let mut rewrite = false;
    let mut files: Vec<PathBuf> = Vec::new();
    for a in &args[1..] {
        if a == "--rewrite" { rewrite = true; }
        else { files.push(PathBuf::from(a)); }
    }
    if files.is_empty() {
        eprintln!("usage: normalize [--rewrite] <annotation.json>...");
        return ExitCode::from(2);
    }

    let mut failed = 0usize;
    for path in &files {
        let mut set = SkeletonSet::new(AnnotatorConfig::default());
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).map_err(|e| e.to_string()))
            .and_then(|value| set.set_data(value).map_err(|e| e.to_string()));
        if let Err(e) = loaded {
            eprintln!("{}: {}", path.display(), e);
            failed += 1;
            continue;
        }
        let placed: usize = set
            .skeletons()
            .iter()
            .map(|s| s.tags().iter().filter(|t| !t.is_missing()).count())
            .sum();
        println!("{} skeletons={} nodes={}", path.display(), set.skeletons().len(), placed);
        if rewrite {
            let written = serde_json::to_string(&set.get_data())
                .map_err(|e| e.to_string())
                .and_then(|text| std::fs::write(path, text).map_err(|e| e.to_string()));
            if let Err(e) = written {
                eprintln!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }
    if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
