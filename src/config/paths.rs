use crate::utils::error::{ConvertError, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_FILE: &str = "c2_file.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "bitwarden_file.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Input,
    Output,
}

impl PathRole {
    pub fn default_file_name(self) -> &'static str {
        match self {
            PathRole::Input => DEFAULT_INPUT_FILE,
            PathRole::Output => DEFAULT_OUTPUT_FILE,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            PathRole::Input => "Enter the path to your exported Synology C2 Password Manager CSV file",
            PathRole::Output => "Enter where you would like to save the Bitwarden compatible CSV file",
        }
    }
}

/// Turns raw user input into a path.
///
/// Surrounding whitespace and one pair of wrapping quotes are removed and
/// backslashes become forward slashes. Blank input resolves to the default file
/// name in the current directory. An output path naming a directory gets the
/// default file name appended.
pub fn clean_path_input(raw: &str, role: PathRole) -> Result<PathBuf> {
    let trimmed = raw.trim();
    let unquoted = strip_wrapping_quotes(trimmed).trim();

    if unquoted.contains('\0') {
        return Err(ConvertError::PathError {
            path: PathBuf::from(unquoted.replace('\0', "")),
            reason: "The path contains null bytes".to_string(),
        });
    }

    if unquoted.is_empty() {
        let cwd = std::env::current_dir()?;
        return Ok(cwd.join(role.default_file_name()));
    }

    let normalized = unquoted.replace('\\', "/");
    let path = PathBuf::from(&normalized);

    if role == PathRole::Output && (normalized.ends_with('/') || path.is_dir()) {
        return Ok(path.join(role.default_file_name()));
    }
    Ok(path)
}

fn strip_wrapping_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Asks for a path on stdin. Returns the raw answer, which may be blank.
pub fn prompt_for_path(role: PathRole) -> Result<String> {
    let stdin = std::io::stdin();
    prompt_with(role, &mut stdin.lock(), &mut std::io::stdout())
}

fn prompt_with(role: PathRole, input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(
        output,
        "{}\n(default value if blank: {})\n--> ",
        role.prompt(),
        Path::new(".").join(role.default_file_name()).display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer)
}
