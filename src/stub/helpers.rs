//! Built-in helpers: `date` and `put`.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use super::error::StubError;
use super::registry::{HelperContext, Registry, Value};
use super::render::Stub;

/// Format used by `date()` when called without arguments.
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d";

/// Nesting limit for `put` calls.
pub const MAX_PUT_DEPTH: usize = 16;

pub(crate) fn register_defaults(registry: &mut Registry) {
    registry.helper("date", |_, args| {
        let format = args
            .first()
            .map(|v| v.as_str().into_owned())
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        Ok(format_date(&format, &Local::now()))
    });
    registry.helper("put", put);
}

/// Format a timestamp with PHP `date()` format letters.
///
/// Supported: `Y y m n d j H G h g i s D l M F A a U N w`. A backslash emits
/// the next character literally; every other character is copied as is.
pub fn format_date<Tz>(format: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::with_capacity(format.len() * 2);
    let (pm, hour12) = at.hour12();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        let piece = match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            'Y' => format!("{:04}", at.year()),
            'y' => format!("{:02}", at.year().rem_euclid(100)),
            'm' => format!("{:02}", at.month()),
            'n' => at.month().to_string(),
            'd' => format!("{:02}", at.day()),
            'j' => at.day().to_string(),
            'H' => format!("{:02}", at.hour()),
            'G' => at.hour().to_string(),
            'h' => format!("{hour12:02}"),
            'g' => hour12.to_string(),
            'i' => format!("{:02}", at.minute()),
            's' => format!("{:02}", at.second()),
            'D' => at.format("%a").to_string(),
            'l' => at.format("%A").to_string(),
            'M' => at.format("%b").to_string(),
            'F' => at.format("%B").to_string(),
            'A' => (if pm { "PM" } else { "AM" }).to_string(),
            'a' => (if pm { "pm" } else { "am" }).to_string(),
            'U' => at.timestamp().to_string(),
            'N' => at.weekday().number_from_monday().to_string(),
            'w' => at.weekday().num_days_from_sunday().to_string(),
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(&piece);
    }
    out
}

/// `put(file)`: render a sibling stub with the caller's values and splice in
/// its body.
fn put(ctx: &HelperContext<'_>, args: &[Value]) -> Result<String, StubError> {
    let Some(file) = args.first() else {
        return Err(StubError::invalid_arguments(
            "put",
            "expected a stub file name",
        ));
    };

    let dir = ctx
        .stub_path
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let path = sibling_stub_path(dir, &file.as_str());

    if ctx.depth >= MAX_PUT_DEPTH {
        return Err(StubError::RecursionLimit { path });
    }

    let stub = Stub::load_with(&path, ctx.registry.clone())?;
    let result = stub.render_at_depth(ctx.values, ctx.depth + 1)?;
    Ok(result.into_body())
}

/// Resolve `file` against `dir`, adding a `.stub` extension when missing.
fn sibling_stub_path(dir: &Path, file: &str) -> PathBuf {
    let path = dir.join(file.trim_start_matches('/'));
    if path.extension().is_some_and(|ext| ext == "stub") {
        return path;
    }
    let mut name = OsString::from(path);
    name.push(".stub");
    PathBuf::from(name)
}
