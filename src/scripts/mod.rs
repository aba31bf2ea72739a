//! Launch script and systemd unit generation.
//!
//! Both files are rendered from Tera templates. The launch script runs the
//! server inside a detached `screen` session named after the server, so the
//! console can be reattached with `screen -r <name>`; the unit file starts
//! and stops that script.

mod templates;

use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::START_SCRIPT_NAME;
use crate::utils::fs::{is_writable_dir, safe_write};

/// Failures rendering or writing a generated file.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The template did not render.
    #[error("Failed to render {template}")]
    Render {
        /// Template name
        template: &'static str,
        /// Tera failure
        #[source]
        source: tera::Error,
    },

    /// The rendered file could not be written.
    #[error("Failed to write {}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Renders the `start.sh` launch script.
pub fn render_launch_script(
    server_name: &str,
    install_path: &Path,
    jar_name: &str,
    memory_gb: u32,
) -> Result<String, ScriptError> {
    let mut context = Context::new();
    context.insert("name", server_name);
    context.insert("path", &install_path.display().to_string());
    context.insert("jar", jar_name);
    context.insert("memory_gb", &memory_gb);
    render("start.sh", templates::LAUNCH_SCRIPT, &context)
}

/// Renders the `<name>.service` unit.
pub fn render_service_unit(server_name: &str, install_path: &Path) -> Result<String, ScriptError> {
    let mut context = Context::new();
    context.insert("name", server_name);
    context.insert("path", &install_path.display().to_string());
    context.insert("script", START_SCRIPT_NAME);
    render("service unit", templates::SERVICE_UNIT, &context)
}

fn render(template: &'static str, source: &str, context: &Context) -> Result<String, ScriptError> {
    Tera::one_off(source, context, false).map_err(|source| ScriptError::Render {
        template,
        source,
    })
}

/// Writes `start.sh` into `install_path`, replacing any previous one, and
/// marks it executable.
pub fn write_launch_script(
    server_name: &str,
    install_path: &Path,
    jar_name: &str,
    memory_gb: u32,
) -> Result<PathBuf, ScriptError> {
    let script = render_launch_script(server_name, install_path, jar_name, memory_gb)?;
    let path = install_path.join(START_SCRIPT_NAME);
    let write_error = |source| ScriptError::Write {
        path: path.clone(),
        source,
    };

    safe_write(&path, &script).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(write_error)?;
    }

    debug!("Wrote launch script {}", path.display());
    Ok(path)
}

/// Writes `<service_dir>/<name>.service`.
///
/// An existing unit is left alone and an unwritable `service_dir` is
/// skipped; both log a warning and return `Ok(None)`.
pub fn write_service_unit(
    service_dir: &Path,
    server_name: &str,
    install_path: &Path,
) -> Result<Option<PathBuf>, ScriptError> {
    let path = service_dir.join(format!("{server_name}.service"));
    if path.exists() {
        warn!("Service file {} already exists, not overwriting", path.display());
        return Ok(None);
    }
    if !is_writable_dir(service_dir) {
        warn!(
            "No permission to write to {}, skipping service creation (run as root to create one)",
            service_dir.display()
        );
        return Ok(None);
    }

    let unit = render_service_unit(server_name, install_path)?;
    safe_write(&path, &unit).map_err(|source| ScriptError::Write {
        path: path.clone(),
        source,
    })?;
    debug!("Wrote service unit {}", path.display());
    Ok(Some(path))
}
