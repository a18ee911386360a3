use aegis_engine::prelude::*;
use clap::{Arg, Command};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Command::new("aegis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("AEGIS access-control engine demo")
        .arg(
            Arg::new("storage")
                .long("storage")
                .value_name("DIR")
                .help("Persist roles and assignments under this directory"),
        )
        .get_matches();

    match matches.get_one::<String>("storage") {
        Some(dir) => run(AccessControlEngine::new(JsonDirStore::open(dir)?)?),
        None => run(AccessControlEngine::in_memory()),
    }
}

fn run<S: GrantStore>(engine: AccessControlEngine<S>) -> anyhow::Result<()> {
    engine.set_audit_hook(|decision| {
        if let Ok(json) = serde_json::to_string(decision) {
            println!("audit: {json}");
        }
    });

    let assignment = engine.assign_role(Grant::new("u1", "developer").granted_by("demo"))?;
    println!(
        "assigned {} to {} (assignment {})",
        assignment.role_id, assignment.principal_id, assignment.id
    );

    for (resource, action) in [
        ("project/maestro/code/main.py", "read"),
        ("project/maestro/code/main.py", "delete"),
    ] {
        let decision = engine.check_access("u1", resource, action);
        println!(
            "u1 {action} {resource}: {} ({})",
            if decision.allowed { "ALLOWED" } else { "DENIED" },
            decision.reason
        );
    }

    Ok(())
}
