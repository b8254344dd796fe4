// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar students` — list and import student records.

use std::path::PathBuf;

use clap::Subcommand;
use serde_json::Value;

use crate::api::students;
use crate::client::ApiClient;

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List students.
    List {
        /// Include archived students.
        #[arg(long)]
        include_archived: bool,
    },
    /// Bulk-import students from a CSV file.
    Import {
        /// CSV file to upload.
        file: PathBuf,
    },
    /// Download the CSV import template.
    Template {
        /// Where to write the template.
        #[arg(long, default_value = "students-template.csv")]
        output: PathBuf,
    },
}

fn field<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or("-")
}

pub async fn run(client: &ApiClient, command: StudentsCommand) -> anyhow::Result<()> {
    match command {
        StudentsCommand::List { include_archived } => {
            let rows = students::list(client, include_archived).await?;
            for row in &rows {
                let id = row.get("id").map(Value::to_string).unwrap_or_else(|| "-".to_owned());
                println!("{id}\t{}\t{}", field(row, "fullName"), field(row, "gradeName"));
            }
            println!("{} student(s)", rows.len());
        }
        StudentsCommand::Import { file } => {
            let csv = std::fs::read(&file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "students.csv".to_owned());
            let result = students::import_csv(client, &name, &csv).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        StudentsCommand::Template { output } => {
            let bytes = students::import_template(client).await?;
            std::fs::write(&output, bytes)?;
            println!("wrote {}", output.display());
        }
    }
    Ok(())
}
