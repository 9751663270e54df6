use clap::{Parser, Subcommand};
use uuid::Uuid;

use crm_core::authz::{permissions, AuthzEngine, Principal, Role};

#[derive(Parser, Debug)]
#[command(author, version, about = "crm-core admin tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the permission catalog
    Catalog,
    /// Print every role with its configured permission set
    Roles,
    /// Evaluate whether a role may perform an action
    Check { role: String, action: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let engine = AuthzEngine::new();

    match cli.command {
        Commands::Catalog => {
            for name in permissions::CATALOG {
                println!("{name}");
            }
        }
        Commands::Roles => {
            for role in Role::ALL {
                if role == Role::SuperAdmin {
                    println!("{:<12} (bypasses all checks)", role.as_str());
                    continue;
                }
                let mut granted: Vec<&str> = engine.role_permissions(role).into_iter().collect();
                granted.sort_unstable();
                println!("{:<12} {}", role.as_str(), granted.join(", "));
            }
        }
        Commands::Check { role, action } => {
            let role = Role::parse(&role)
                .ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?;
            let principal = Principal::new(Uuid::nil(), "cli@local", "cli", role);
            let allowed = engine.has_permission(Some(&principal), &action);
            println!(
                "{} {} {}",
                role.as_str(),
                if allowed { "ALLOWS" } else { "DENIES" },
                action
            );
        }
    }

    Ok(())
}
