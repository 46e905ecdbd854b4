use crate::cli::CheckArgs;
use crate::config::ProjectConfig;
use crate::input::read_input;
use pginline::{InlineError, SqlInliner};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub statements: usize,
    pub errors: usize,
}

impl CheckSummary {
    fn merge(&mut self, other: CheckSummary) {
        self.statements += other.statements;
        self.errors += other.errors;
    }
}

pub fn run(args: CheckArgs, project: &ProjectConfig) -> anyhow::Result<()> {
    let inliner = SqlInliner::new().config(project.file.inline_config());
    let mut summary = CheckSummary::default();

    if args.files.is_empty() {
        let (source, content) = read_input(None)?;
        summary.merge(check_source(&inliner, &source, &content)?);
    } else {
        for file in &args.files {
            let (source, content) = read_input(Some(file))?;
            summary.merge(check_source(&inliner, &source, &content)?);
        }
    }

    if summary.errors > 0 {
        anyhow::bail!(
            "sql check failed: {} of {} statement(s) invalid",
            summary.errors,
            summary.statements
        );
    }

    println!("{} statement(s) ok", summary.statements);
    Ok(())
}

/// Validate every statement of one input, printing each error to stderr.
pub fn check_source(
    inliner: &SqlInliner,
    source: &str,
    content: &str,
) -> anyhow::Result<CheckSummary> {
    let stmts = match pg_query::split_with_parser(content) {
        Ok(stmts) => stmts,
        Err(e) => {
            // Unsplittable input: validate it whole to locate the error.
            tracing::debug!(target: "pginline.cli", source, error = %e, "split failed");
            let err = inliner
                .validate(content)
                .err()
                .unwrap_or_else(|| InlineError::format(e.to_string()));
            report(source, None, &err);
            return Ok(CheckSummary {
                statements: 1,
                errors: 1,
            });
        }
    };

    let stmts: Vec<&str> = stmts
        .into_iter()
        .filter(|stmt| !stmt.trim().is_empty())
        .collect();
    if stmts.is_empty() {
        anyhow::bail!("no SQL statements found in {source}");
    }

    let mut summary = CheckSummary::default();
    for (idx, stmt) in stmts.into_iter().enumerate() {
        summary.statements += 1;
        if let Err(err) = inliner.validate(stmt) {
            summary.errors += 1;
            report(source, Some(idx + 1), &err);
        }
    }
    tracing::debug!(
        target: "pginline.cli",
        source,
        statements = summary.statements,
        errors = summary.errors,
        "checked"
    );
    Ok(summary)
}

fn report(source: &str, stmt: Option<usize>, err: &InlineError) {
    match stmt {
        Some(n) => eprintln!("[ERROR] {source}:stmt{n}: {err}"),
        None => eprintln!("[ERROR] {source}: {err}"),
    }
}
