use std::io::Write;
use std::path::PathBuf;

use plugindex::diagnostics::E000;
use plugindex::parser::read_catalog_bytes;
use plugindex::sorter;

pub(crate) fn run(path: PathBuf, check: bool) {
    let canonical = read_catalog_bytes(&path).and_then(|raw| {
        let canonical = sorter::sort(&raw)?;
        Ok((raw, canonical))
    });
    let (raw, canonical) = match canonical {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{E000} plugindex sort: {}: {e}", path.display());
            std::process::exit(super::EXIT_FATAL);
        }
    };

    if !check {
        if let Err(e) = std::io::stdout().write_all(&canonical) {
            eprintln!("plugindex sort: cannot write output: {e}");
            std::process::exit(super::EXIT_FATAL);
        }
        return;
    }

    if raw == canonical {
        eprintln!("ok");
        return;
    }

    eprintln!("Not sorted: {}", path.display());
    eprint!(
        "{}",
        sorter::diff(&raw, &canonical, &path.display().to_string())
    );
    std::process::exit(1);
}
