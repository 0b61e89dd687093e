//! `rcwarden paths`

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use rcwarden_service::Service;

#[derive(Tabled)]
struct PathRow {
    #[tabled(rename = "artifact")]
    artifact: String,
    #[tabled(rename = "path")]
    path: String,
}

pub fn run(service: &Service) -> Result<u8> {
    let paths = service.paths()?;
    let rows = [
        ("control script", &paths.control_script),
        ("pid file", &paths.pid_file),
        ("stdout log", &paths.stdout_log),
        ("stderr log", &paths.stderr_log),
    ]
    .into_iter()
    .map(|(artifact, path)| PathRow {
        artifact: artifact.to_string(),
        path: path.display().to_string(),
    })
    .collect::<Vec<_>>();

    println!(
        "{} ({})",
        service.descriptor().name().as_str().bold(),
        service.flavor()
    );
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(0)
}
