use color_eyre::eyre::{eyre, Result, WrapErr};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Split a viewer command line such as `ase gui` into program and arguments.
pub fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Open `file` with an interactive viewer and wait for it to close.
pub fn launch_viewer(command: &str, file: &Path) -> Result<()> {
    let (program, args) =
        split_command(command).ok_or_else(|| eyre!("Empty viewer command"))?;

    let mut cmd = Command::new(program);
    cmd.args(&args).arg(file);
    debug!("$ {:?}", cmd);

    let status = cmd
        .status()
        .wrap_err_with(|| format!("Unable to launch viewer `{}`", command))?;
    if !status.success() {
        warn!("Viewer `{}` exited with {}", command, status);
    }
    Ok(())
}
