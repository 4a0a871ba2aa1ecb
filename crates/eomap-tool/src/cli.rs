use std::path::PathBuf;

use eomap_core::constants::MAX_CHAR;

use crate::error::ToolError;

pub const USAGE: &str = "\
Usage: emf-tool [--config <file.ron>] <command> [args]
  info   <map.emf>                    Print a JSON summary
  dump   <map.emf>                    Print the whole map as JSON
  resave <in.emf> <out.emf>           Load and write back in the current format
  resize <in.emf> <out.emf> <w> <h>   Change dimensions, drop what no longer fits
  new    <out.emf> <w> <h> [name]     Create a blank map from config defaults
  check  <map.emf>                    Verify the map re-saves to the same bytes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info {
        path: PathBuf,
    },
    Dump {
        path: PathBuf,
    },
    Resave {
        input: PathBuf,
        output: PathBuf,
    },
    Resize {
        input: PathBuf,
        output: PathBuf,
        width: u8,
        height: u8,
    },
    New {
        output: PathBuf,
        width: u8,
        height: u8,
        name: Option<String>,
    },
    Check {
        path: PathBuf,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation, ToolError> {
    let mut config = None;
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| ToolError::Usage("--config needs a path".to_string()))?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                return Ok(Invocation {
                    config,
                    command: Command::Help,
                })
            }
            other if other.starts_with("--") => {
                return Err(ToolError::Usage(format!("Unknown argument: {}", other)));
            }
            other => positional.push(other),
        }
        i += 1;
    }

    let Some((&name, rest)) = positional.split_first() else {
        return Err(ToolError::Usage("no command given".to_string()));
    };

    let command = match (name, rest) {
        ("info", [path]) => Command::Info { path: path.into() },
        ("dump", [path]) => Command::Dump { path: path.into() },
        ("resave", [input, output]) => Command::Resave {
            input: input.into(),
            output: output.into(),
        },
        ("resize", [input, output, w, h]) => Command::Resize {
            input: input.into(),
            output: output.into(),
            width: dimension("width", w)?,
            height: dimension("height", h)?,
        },
        ("new", [output, w, h, title @ ..]) if title.len() <= 1 => Command::New {
            output: output.into(),
            width: dimension("width", w)?,
            height: dimension("height", h)?,
            name: title.first().map(|s| s.to_string()),
        },
        ("check", [path]) => Command::Check { path: path.into() },
        ("info" | "dump" | "resave" | "resize" | "new" | "check", _) => {
            return Err(ToolError::Usage(format!(
                "wrong number of arguments for {}",
                name
            )));
        }
        (other, _) => return Err(ToolError::Usage(format!("Unknown command: {}", other))),
    };

    Ok(Invocation { config, command })
}

/// Parse a width or height. Both are stored in a 1-byte field.
fn dimension(what: &str, value: &str) -> Result<u8, ToolError> {
    value
        .parse::<u8>()
        .ok()
        .filter(|&v| v as u32 <= MAX_CHAR)
        .ok_or_else(|| {
            ToolError::Usage(format!("invalid {} {:?} (0 to {})", what, value, MAX_CHAR))
        })
}
