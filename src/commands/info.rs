use stuble::config::StubleConfig;
use stuble::stub::Stub;

use crate::InfoArgs;
use crate::commands::resolve_stub;

pub async fn run(args: &InfoArgs) -> Result<(), anyhow::Error> {
    let config = StubleConfig::load()?;
    let path = resolve_stub(&config, &args.stub)?;
    let stub = Stub::load(&path)?;

    println!("Stub: {}", path.display());
    print!("{}", describe(&stub));

    Ok(())
}

/// Parameter table plus the filters and helpers available to the stub.
fn describe(stub: &Stub) -> String {
    let mut out = String::new();

    let params = stub.parameters();
    if params.is_empty() {
        out.push_str("No parameters\n");
    } else {
        out.push_str("Parameters:\n");
        let width = params.iter().map(|p| p.key.len()).max().unwrap_or(0);
        for param in &params {
            let default = if param.is_required() {
                "(required)"
            } else {
                param.default.as_str()
            };
            out.push_str(&format!("  {:<width$}  {default}\n", param.key));
        }
    }

    let registry = stub.registry();
    let filters: Vec<_> = registry.filter_names().collect();
    let helpers: Vec<_> = registry.helper_names().collect();
    out.push_str(&format!("Filters: {}\n", filters.join(", ")));
    out.push_str(&format!("Helpers: {}\n", helpers.join(", ")));
    out
}
