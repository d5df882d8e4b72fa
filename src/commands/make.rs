use std::path::Path;

use stuble::config::StubleConfig;
use stuble::stub::{RenderResult, Stub, ValueMap};

use crate::MakeArgs;
use crate::commands::resolve_stub;
use crate::write::{self, ExistingPolicy, WriteOutcome};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid parameter '{0}': parameters are written as key:value")]
    Malformed(String),

    #[error("unused parameter: {}", .0.join(", "))]
    Unused(Vec<String>),

    #[error("missing parameter: {}", .0.join(", "))]
    MissingRequiredParameter(Vec<String>),
}

pub async fn run(args: &MakeArgs) -> Result<(), anyhow::Error> {
    let config = StubleConfig::load()?;
    let stub_path = resolve_stub(&config, &args.stub)?;
    let stub = Stub::load(&stub_path)?;

    let values = parse_params(&args.params)?;
    validate_params(&stub, &values)?;

    let result = stub.render(&values)?;

    if args.dump {
        println!("[{}]\n", stub_path.display());
        println!("{}", result.raw()?);
        return Ok(());
    }

    let policy = match (args.overwrite, args.skip_exists) {
        (true, _) => ExistingPolicy::Overwrite,
        (_, true) => ExistingPolicy::Skip,
        _ => ExistingPolicy::Refuse,
    };
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.working_dir().to_path_buf());

    let (target, outcome) = write_result(&result, &output_dir, policy).await?;
    println!("{:>9} {}", outcome.label(), target);

    Ok(())
}

/// Write `result` below `output_dir`. Returns the target, relative to the
/// output directory, and what happened to it.
async fn write_result(
    result: &RenderResult,
    output_dir: &Path,
    policy: ExistingPolicy,
) -> Result<(String, WriteOutcome), anyhow::Error> {
    if let Some(directive) = result.append_directive() {
        let Some(file) = directive.file.as_deref() else {
            anyhow::bail!("Append target missing: set `append.file` or `path` in the front matter");
        };
        let dest = write::destination(output_dir, file);
        let outcome = write::append(&dest, directive, result.body()).await?;
        return Ok((file.to_string(), outcome));
    }

    let save_path = result.save_path();
    if save_path.is_empty() {
        anyhow::bail!("Save path missing: set `path` in the stub's front matter or use --dump");
    }
    let dest = write::destination(output_dir, save_path);
    let outcome = write::save(&dest, result.body(), policy).await?;
    Ok((save_path.to_string(), outcome))
}

/// Parse `key:value` arguments. The value may itself contain `:`.
pub fn parse_params(params: &[String]) -> Result<ValueMap, ParamError> {
    params
        .iter()
        .map(|param| match param.split_once(':') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => Err(ParamError::Malformed(param.clone())),
        })
        .collect()
}

/// Reject values for keys the stub does not use and missing required keys.
///
/// Nothing is checked when no parameters were given at all, so a stub whose
/// parameters all have defaults renders as-is.
pub fn validate_params(stub: &Stub, values: &ValueMap) -> Result<(), ParamError> {
    if values.is_empty() {
        return Ok(());
    }

    let params = stub.parameters();
    let unused: Vec<String> = values
        .keys()
        .filter(|key| !params.iter().any(|p| &p.key == *key))
        .cloned()
        .collect();
    if !unused.is_empty() {
        return Err(ParamError::Unused(unused));
    }

    let missing: Vec<String> = stub
        .required_parameters()
        .into_iter()
        .filter(|key| !values.contains_key(key))
        .collect();
    if !missing.is_empty() {
        return Err(ParamError::MissingRequiredParameter(missing));
    }

    Ok(())
}
