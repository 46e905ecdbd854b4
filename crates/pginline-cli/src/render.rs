use crate::cli::RenderArgs;
use crate::config::ProjectConfig;
use crate::input::read_input;
use crate::params::{parse_params, parse_params_json};
use pginline::{InlineError, SqlInliner, SyntaxError};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum RenderOutput<'a> {
    Sql(&'a str),
    Error(ErrorReport<'a>),
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    syntax: Option<&'a SyntaxError>,
}

impl<'a> ErrorReport<'a> {
    fn new(err: &'a InlineError) -> Self {
        let kind = match err {
            InlineError::Syntax(_) => "syntax",
            InlineError::ParameterIndex(_) => "parameter_index",
            InlineError::UnsupportedType { .. } => "unsupported_type",
            InlineError::Format(_) => "format",
            InlineError::InputTooLarge { .. } => "input_too_large",
        };
        Self {
            kind,
            message: err.to_string(),
            syntax: err.as_syntax_error(),
        }
    }
}

pub fn run(args: RenderArgs, project: &ProjectConfig) -> anyhow::Result<()> {
    let values = match &args.params_json {
        Some(raw) => parse_params_json(raw)?,
        None => parse_params(&args.params)?,
    };

    let (source, raw) = read_input(args.file.as_deref())?;
    let template = raw.trim_end();
    tracing::debug!(
        target: "pginline.cli",
        source = %source,
        param_count = values.len(),
        "rendering template"
    );

    let inliner = SqlInliner::new().config(project.file.inline_config());
    let result = inliner.inline(template, &values);

    if args.json {
        let output = match &result {
            Ok(sql) => RenderOutput::Sql(sql),
            Err(err) => RenderOutput::Error(ErrorReport::new(err)),
        };
        println!("{}", serde_json::to_string(&output)?);
        if result.is_err() {
            anyhow::bail!("render failed");
        }
        return Ok(());
    }

    match result {
        Ok(sql) => {
            println!("{sql}");
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!("failed to render {source}"))),
    }
}
