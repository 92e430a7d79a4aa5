use std::{
  ffi::OsString,
  path::{Path, PathBuf},
  process::Stdio,
};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::process::Command;

use super::RenderEngine;
use crate::prelude::*;

/// Characters left unescaped in cookie values, matching form URL encoding.
const COOKIE: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'*')
  .remove(b'(')
  .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

/// Drives the `wkhtmltoimage` executable.
///
/// Side-channel values are passed as cookies, which the page reads back with
/// `decodeURIComponent`.
#[derive(Debug, Clone)]
pub struct WkHtml {
  program: PathBuf,
  pub width: u32,
  /// Zero lets the renderer pick the page height
  pub height: u32,
  pub quality: u32,
  pub format: String,
  pub disable_javascript: bool,
  pub crop: Option<Crop>,
  pub timeout: Duration,
}

impl WkHtml {
  pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
    Self {
      program: program.into(),
      width: 1024,
      height: 0,
      quality: 96,
      format: String::from("png"),
      disable_javascript: false,
      crop: None,
      timeout,
    }
  }

  /// Settings for the 540x450 profile banner.
  pub fn profile_banner(
    program: impl Into<PathBuf>,
    timeout: Duration,
  ) -> Self {
    Self::new(program, timeout).size(540, 450).crop(Crop {
      x: 0,
      y: 0,
      width: 540,
      height: 450,
    })
  }

  pub fn size(mut self, width: u32, height: u32) -> Self {
    self.width = width;
    self.height = height;
    self
  }

  pub fn crop(mut self, crop: Crop) -> Self {
    self.crop = Some(crop);
    self
  }

  fn args(
    &self,
    input: &Path,
    output: &Path,
    injections: &[(&str, String)],
  ) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |flag: &str, value: String| {
      args.push(flag.into());
      args.push(value.into());
    };

    push("--format", self.format.clone());
    push("--width", self.width.to_string());
    push("--height", self.height.to_string());
    push("--quality", self.quality.to_string());

    if let Some(crop) = self.crop {
      push("--crop-x", crop.x.to_string());
      push("--crop-y", crop.y.to_string());
      push("--crop-w", crop.width.to_string());
      push("--crop-h", crop.height.to_string());
    }

    args.push("--quiet".into());
    if self.disable_javascript {
      args.push("--disable-javascript".into());
    }

    for (name, value) in injections {
      args.push("--cookie".into());
      args.push((*name).into());
      args.push(utf8_percent_encode(value, COOKIE).to_string().into());
    }

    args.push(input.into());
    args.push(output.into());
    args
  }
}

#[async_trait]
impl RenderEngine for WkHtml {
  async fn render(
    &self,
    document: &Path,
    injections: &[(&str, String)],
  ) -> Result<Vec<u8>> {
    // removed when dropped, whichever way this function exits
    let output = tempfile::Builder::new()
      .prefix("dingo-")
      .suffix(&format!(".{}", self.format))
      .tempfile()?;

    let args = self.args(document, output.path(), injections);
    debug!("Executing: {} {:?}", self.program.display(), args);

    let child = Command::new(&self.program)
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|err| {
        Error::Render(format!(
          "failed to start `{}`: {err}",
          self.program.display()
        ))
      })?;

    // on timeout the future owning `child` is dropped, which kills it
    let out = time::timeout(self.timeout, child.wait_with_output())
      .await
      .map_err(|_| {
        Error::Render(format!(
          "timed out after {}",
          humantime::format_duration(self.timeout)
        ))
      })??;

    if !out.status.success() {
      let stderr = String::from_utf8_lossy(&out.stderr);
      return Err(Error::Render(format!(
        "{} {}",
        out.status,
        stderr.trim()
      )));
    }

    let bytes = tokio::fs::read(output.path()).await?;
    if bytes.is_empty() {
      return Err(Error::Render("renderer produced no output".into()));
    }

    Ok(bytes)
  }
}
