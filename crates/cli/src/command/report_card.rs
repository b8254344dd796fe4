// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar report-card` — generate and download a student's report card.

use std::path::PathBuf;

use clap::Parser;

use crate::api::reports;
use crate::client::ApiClient;

#[derive(Debug, Parser)]
pub struct ReportCardArgs {
    /// Student id.
    pub student_id: String,

    #[arg(long)]
    pub academic_year: i32,

    /// Term 1, 2, or 3.
    #[arg(long)]
    pub term: i32,

    /// Where to write the PDF.
    #[arg(long, short = 'o', default_value = "report-card.pdf")]
    pub output: PathBuf,
}

pub async fn run(client: &ApiClient, args: ReportCardArgs) -> anyhow::Result<()> {
    let generated =
        reports::generate_for_student(client, &args.student_id, args.academic_year, args.term)
            .await?;
    let id = generated
        .get("id")
        .map(|v| v.to_string().trim_matches('"').to_owned())
        .ok_or_else(|| anyhow::anyhow!("server returned no report card id"))?;

    let bytes = reports::download(client, &id).await?;
    std::fs::write(&args.output, bytes)?;
    println!("wrote {}", args.output.display());
    Ok(())
}
