//! Password lookup

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use ovirt_api_client::ConnectionConfig;

const PROMPT: &str = "Please enter your password: ";

/// Make sure `config` carries a password, prompting on the terminal when
/// neither the config file, `OVIRT_PASSWORD` nor `--password` supplied one.
///
/// The terminal does not echo what is typed.
pub fn ensure_password(config: ConnectionConfig) -> Result<ConnectionConfig> {
    if config.password.is_some() {
        return Ok(config);
    }

    let password = rpassword::prompt_password(PROMPT).context("Failed to read password")?;
    Ok(config.with_password(non_empty(password)?))
}

/// Write the prompt to `output` and read one line from `input`
pub fn prompt_password<R, W>(input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let password =
        rpassword::read_password_from_bufread(input).context("Failed to read password")?;
    non_empty(password)
}

fn non_empty(password: String) -> Result<String> {
    if password.is_empty() {
        anyhow::bail!("No password given");
    }
    Ok(password)
}
