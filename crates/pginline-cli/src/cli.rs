use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
    Check,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
    Check(CheckArgs),
}

impl Command {
    pub fn global(&self) -> Option<&GlobalArgs> {
        match self {
            Command::Help(_) => None,
            Command::Render(args) => Some(&args.global),
            Command::Check(args) => Some(&args.global),
        }
    }
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Explicit config path; `pginline.toml` is still picked up when present.
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub global: GlobalArgs,
    /// Raw `--param` values, in order.
    pub params: Vec<String>,
    pub params_json: Option<String>,
    pub json: bool,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub global: GlobalArgs,
    pub files: Vec<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());
    let mut global = GlobalArgs::default();

    loop {
        let Some(first) = it.next() else {
            return Ok(Command::Help(HelpTopic::Root));
        };
        match first {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Root)),
            "-v" | "--verbose" => global.verbose = true,
            "render" => return parse_render(global, it),
            "check" => return parse_check(global, it),
            _ => anyhow::bail!("unknown command: {first}"),
        }
    }
}

/// Handle an option every command accepts. Returns `false` if `token` is not one.
fn parse_global<'a>(
    global: &mut GlobalArgs,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<bool> {
    match token {
        "-v" | "--verbose" => global.verbose = true,
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            global.config = Some(PathBuf::from(v));
        }
        _ if token.starts_with("--config=") => {
            global.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_render<'a>(
    mut global: GlobalArgs,
    mut it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Command> {
    let mut params: Vec<String> = Vec::new();
    let mut params_json: Option<String> = None;
    let mut json = false;
    let mut file: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        if parse_global(&mut global, token, &mut it)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--param" | "-p" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--param requires a value");
                };
                params.push(v.to_string());
            }
            _ if token.starts_with("--param=") => {
                params.push(token.trim_start_matches("--param=").to_string());
            }
            "--params-json" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--params-json requires a value");
                };
                params_json = Some(v.to_string());
            }
            _ if token.starts_with("--params-json=") => {
                params_json = Some(token.trim_start_matches("--params-json=").to_string());
            }
            "--json" => json = true,
            "-" => file = None,
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => {
                if file.is_some() {
                    anyhow::bail!("render takes a single file, got another: {other}");
                }
                file = Some(PathBuf::from(other));
            }
        }
    }

    if !params.is_empty() && params_json.is_some() {
        anyhow::bail!("--param and --params-json cannot be combined");
    }

    Ok(Command::Render(RenderArgs {
        global,
        params,
        params_json,
        json,
        file,
    }))
}

fn parse_check<'a>(
    mut global: GlobalArgs,
    mut it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Command> {
    let mut files: Vec<PathBuf> = Vec::new();

    while let Some(token) = it.next() {
        if parse_global(&mut global, token, &mut it)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Check)),
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => files.push(PathBuf::from(other)),
        }
    }

    Ok(Command::Check(CheckArgs { global, files }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
pginline - inline positional parameters into PostgreSQL statements

USAGE:
  pginline [-v] <COMMAND> [OPTIONS]

COMMANDS:
  render        Validate a template and print it with its values inlined
  check         Validate every statement in SQL files

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: pginline.toml, if present)
  -v, --verbose         Log to stderr (filter from RUST_LOG or [log] filter)
  -h, --help            Print help

Run `pginline <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  pginline render [OPTIONS] [FILE]

Reads the template from FILE, or stdin when FILE is omitted or `-`.

OPTIONS:
  -p, --param <KIND:VALUE>  Value for the next placeholder; KIND is one of
                            str, int, uint, float, bool (default: str)
  --params-json <JSON>      All values as a JSON array
  --json                    Print {{\"sql\": ...}} or {{\"error\": ...}}
  --config <FILE>           Config file path (default: pginline.toml, if present)
  -v, --verbose             Log to stderr
  -h, --help                Print help"
            );
        }
        HelpTopic::Check => {
            println!(
                "\
USAGE:
  pginline check [OPTIONS] [FILES...]

Validates each statement of every file, or of stdin when no file is given.

OPTIONS:
  --config <FILE>       Config file path (default: pginline.toml, if present)
  -v, --verbose         Log to stderr
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("pginline")
            .chain(v.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parse_no_args_is_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_render_with_params() {
        let cmd = parse_args(&args(&[
            "render",
            "--param",
            "int:42",
            "-p",
            "O'Brien",
            "--param=bool:true",
            "--json",
            "query.sql",
        ]))
        .unwrap();
        let Command::Render(render) = cmd else {
            panic!("expected render");
        };

        assert_eq!(render.params, vec!["int:42", "O'Brien", "bool:true"]);
        assert!(render.json);
        assert_eq!(render.file, Some(PathBuf::from("query.sql")));
        assert_eq!(render.global, GlobalArgs::default());
    }

    #[test]
    fn parse_render_rejects_mixed_param_sources() {
        let err = parse_args(&args(&["render", "-p", "1", "--params-json", "[1]"])).unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn parse_render_rejects_two_files() {
        assert!(parse_args(&args(&["render", "a.sql", "b.sql"])).is_err());
    }

    #[test]
    fn parse_check_with_files() {
        let cmd = parse_args(&args(&[
            "-v",
            "check",
            "--config",
            "ci/pginline.toml",
            "a.sql",
            "b.sql",
        ]))
        .unwrap();
        let Command::Check(check) = cmd else {
            panic!("expected check");
        };

        assert!(check.global.verbose);
        assert_eq!(check.global.config, Some(PathBuf::from("ci/pginline.toml")));
        assert_eq!(
            check.files,
            vec![PathBuf::from("a.sql"), PathBuf::from("b.sql")]
        );
    }

    #[test]
    fn parse_subcommand_help() {
        let cmd = parse_args(&args(&["check", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Check)));
        let cmd = parse_args(&args(&["render", "-h"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Render)));
    }

    #[test]
    fn parse_unknown_argument() {
        let err = parse_args(&args(&["check", "--deny"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown argument: --deny");
        assert!(parse_args(&args(&["format"])).is_err());
    }

    #[test]
    fn parse_config_requires_value() {
        let err = parse_args(&args(&["render", "--config"])).unwrap_err();
        assert_eq!(err.to_string(), "--config requires a value");
    }
}
