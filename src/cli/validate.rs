use std::path::PathBuf;
use std::time::Duration;

use plugindex::config::BINARY_VALIDATION_VAR;
use plugindex::diagnostics::E000;
use plugindex::{ChecksumStatus, Config, Outcome};

pub(crate) fn run(
    path: PathBuf,
    format: super::Format,
    binary_validation: bool,
    jobs: Option<usize>,
    timeout: Option<u64>,
) {
    let mut config = Config::from_env();
    config.catalog_path = path;
    config.binary_validation |= binary_validation;
    if let Some(jobs) = jobs.filter(|&n| n > 0) {
        config.jobs = jobs;
    }
    if let Some(secs) = timeout.filter(|&s| s > 0) {
        config.timeout = Duration::from_secs(secs);
    }

    if config.binary_validation {
        eprintln!(
            "Running binary validations for {}, this could take a while",
            config.catalog_path.display()
        );
    }

    let report = match plugindex::run_file(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(
                "{E000} plugindex validate: {}: {e}",
                config.catalog_path.display()
            );
            std::process::exit(super::EXIT_FATAL);
        }
    };

    match format {
        super::Format::Text => {
            for d in report.failures.iter().chain(&report.warnings) {
                eprintln!("{} {d}", d.code);
            }
            match report.checksums {
                ChecksumStatus::Skipped => eprintln!(
                    "checksums: skipped (set {BINARY_VALIDATION_VAR}=true or pass --binary-validation to enable)"
                ),
                ChecksumStatus::Verified { binaries } => {
                    eprintln!("checksums: verified {binaries} binaries");
                }
            }
            match report.outcome() {
                Outcome::AllValid => eprintln!(
                    "{} plugins, {} binaries: ok",
                    report.plugins, report.binaries
                ),
                Outcome::ValidationFailed(failures) => eprintln!(
                    "{} plugins, {} binaries: {} violation(s)",
                    report.plugins,
                    report.binaries,
                    failures.len()
                ),
            }
        }
        super::Format::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("plugindex validate: cannot serialize report: {e}");
                std::process::exit(super::EXIT_FATAL);
            }
        },
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
}
