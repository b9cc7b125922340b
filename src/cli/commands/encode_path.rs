//! encode-path command - Percent-encode a relative path

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::paths::normalize_path_for_url;
use crate::ui::output;

/// Print `path` the way it appears in a file URL.
pub fn encode_path(ctx: &Context, path: &str, separator: &str) -> Result<()> {
    if separator.is_empty() {
        bail!("separator must not be empty");
    }
    output::result("path", &normalize_path_for_url(path, separator), ctx.format);
    Ok(())
}
