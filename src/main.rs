use std::path::PathBuf;
use std::process;

use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use snapback::catalog;
use snapback::config;
use snapback::models::Account;
use snapback::passwords::generate_password_hash;
use snapback::snapshot::{
    default_snapshot_path, export_snapshot, ConfirmationProvider, Importer, ScriptedConfirmation,
    SnapshotError, StdinConfirmation,
};
use snapback::store::Store;

#[derive(Parser)]
#[command(
    name = "snapback",
    author,
    version,
    about = "User-data snapshot and restore tool",
    long_about = r#"snapback — export and restore the user-account domain of your deployment.

The tool snapshots accounts, groups, permissions and model assignments into a
single timestamped JSON document, and restores such a document later as one
atomic operation. Restores are upsert-only and guarded by a confirmation
prompt, making the pair suitable for disaster recovery and environment cloning.

Examples:
  1) Take a snapshot:
      snapback export backups/tuesday.json
  2) Restore it elsewhere:
      SNAPBACK_STORE=/srv/app/user_store.json snapback import backups/tuesday.json
  3) Seed the model catalog and grant access:
      snapback models populate
      snapback models assign alice --all
"#,
    after_help = "Use `snapback <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Path to the store file (overrides SNAPBACK_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the store into a snapshot document
    #[command(
        about = "Export all user data to a snapshot file",
        long_about = "Serialize every account, group, permission and model assignment into one self-describing JSON document. Credential hashes are copied verbatim. The default output name embeds the current date and time."
    )]
    Export {
        /// Output path (default: user_data_backup_YYYYMMDD_HHMMSS.json)
        output: Option<PathBuf>,
    },
    /// Import a snapshot document into the store
    #[command(
        about = "Restore user data from a snapshot file",
        long_about = "Validate a snapshot document and apply it to the store as a single atomic unit. Existing rows are overwritten, missing rows are created, nothing is deleted. A summary is shown and explicit confirmation is required before anything is written; declining leaves the store untouched."
    )]
    Import {
        /// Path to a snapshot produced by `snapback export`
        input: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Manage accounts in the store
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
    /// Manage model entries and their account assignments
    Models {
        #[command(subcommand)]
        sub: ModelCommands,
    },
    /// Check the store for configuration and integrity problems
    #[command(
        about = "Health check for the user store",
        long_about = "Verify that the store is readable, report row counts, and flag dangling references and accounts without any model assignment."
    )]
    Check,
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(about = "List accounts", long_about = "Enumerate accounts in the store (username, flags, groups).")]
    List,
    #[command(about = "Add a new account", long_about = "Create an account with a freshly hashed password.")]
    Add {
        username: String,
        password: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Grant staff access
        #[arg(long, default_value_t = false)]
        staff: bool,
        /// Grant superuser access
        #[arg(long, default_value_t = false)]
        superuser: bool,
    },
    #[command(about = "Reset an account's password", long_about = "Set a new password for an existing account; the password is hashed before storage.")]
    ResetPassword { username: String, password: String },
}

#[derive(Subcommand)]
enum ModelCommands {
    #[command(about = "List model entries", long_about = "Enumerate model entries with their costs and assigned accounts.")]
    List,
    #[command(about = "Seed the built-in model catalog", long_about = "Create a store entry for every built-in model that is missing. Existing entries, including operator-edited costs, are left untouched.")]
    Populate,
    #[command(about = "Assign models to an account", long_about = "Grant (or with --remove, revoke) model access for an account. Name models explicitly or use --all.")]
    Assign {
        /// Account to change assignments for
        username: String,
        /// Model names (space-separated)
        #[arg(long, num_args = 1..)]
        models: Vec<String>,
        /// Apply to every model in the store
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Remove assignments instead of adding
        #[arg(long, default_value_t = false)]
        remove: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    config::load_env_file(cli.env_file.as_deref());
    let store_path = cli.store.clone().unwrap_or_else(config::get_store_path);

    match cli.command {
        Commands::Export { output } => {
            let store = load_store_or_exit(&store_path);
            let path = output.unwrap_or_else(|| default_snapshot_path(chrono::Local::now()));
            match export_snapshot(&store, &path) {
                Ok(report) => {
                    println!("Exported {} users", report.users);
                    println!("Exported {} groups", report.groups);
                    println!("Exported {} permissions", report.permissions);
                    println!("Exported {} models", report.models);
                    println!(
                        "\n{} {} ({} bytes)",
                        yansi::Paint::new("Data exported successfully to:").green(),
                        report.path.display(),
                        report.bytes
                    );
                }
                Err(e) => fail("Export failed", &e.to_string()),
            }
        }
        Commands::Import { input, yes } => {
            let mut interactive = StdinConfirmation;
            let mut scripted = ScriptedConfirmation::new(true);
            let confirm: &mut dyn ConfirmationProvider = if yes {
                &mut scripted
            } else {
                &mut interactive
            };
            let mut importer = Importer::new(&store_path);
            match importer.run(&input, confirm) {
                Ok(report) => {
                    let s = report.stats;
                    println!(
                        "Resource types: {} created",
                        s.resource_types_created
                    );
                    println!(
                        "Permissions:    {} created, {} updated",
                        s.permissions_created, s.permissions_updated
                    );
                    println!(
                        "Groups:         {} created, {} updated",
                        s.groups_created, s.groups_updated
                    );
                    println!(
                        "Accounts:       {} created, {} updated",
                        s.users_created, s.users_updated
                    );
                    println!(
                        "Model entries:  {} created, {} updated",
                        s.models_created, s.models_updated
                    );
                    println!(
                        "\n{}",
                        yansi::Paint::new("Data import completed successfully").green()
                    );
                }
                Err(SnapshotError::Declined) => {
                    eprintln!("{}", yansi::Paint::new("Import cancelled").yellow());
                    process::exit(1);
                }
                Err(e) => fail("Import failed", &e.to_string()),
            }
        }
        Commands::Users { sub } => match sub {
            UserCommands::List => {
                let store = load_store_or_exit(&store_path);
                let mut table = new_table();
                table.set_header(vec!["ID", "Username", "Email", "Active", "Staff", "Superuser", "Groups"]);
                for user in &store.users {
                    let groups = user
                        .groups
                        .iter()
                        .filter_map(|id| store.group_by_id(*id).map(|g| g.name.clone()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    table.add_row(vec![
                        user.id.to_string(),
                        user.username.clone(),
                        user.email.clone(),
                        user.is_active.to_string(),
                        user.is_staff.to_string(),
                        user.is_superuser.to_string(),
                        groups,
                    ]);
                }
                println!("\n{table}\n");
            }
            UserCommands::Add {
                username,
                password,
                email,
                staff,
                superuser,
            } => {
                let mut store = load_store_or_exit(&store_path);
                let uname = username.trim().to_lowercase();
                if store.user_by_username(&uname).is_some() {
                    fail("Cannot add account", &format!("'{}' already exists", uname));
                }
                let id = store.next_user_id();
                store.users.push(Account {
                    id,
                    username: uname.clone(),
                    email,
                    password: generate_password_hash(&password),
                    first_name: String::new(),
                    last_name: String::new(),
                    is_active: true,
                    is_staff: staff || superuser,
                    is_superuser: superuser,
                    date_joined: Utc::now(),
                    last_login: None,
                    groups: vec![],
                    user_permissions: vec![],
                });
                persist_or_exit(&store, &store_path);
                println!(
                    "{} '{}' {}",
                    yansi::Paint::new("Account").green(),
                    uname,
                    yansi::Paint::new("added").green()
                );
            }
            UserCommands::ResetPassword { username, password } => {
                let mut store = load_store_or_exit(&store_path);
                let uname = username.trim().to_lowercase();
                match store.users.iter_mut().find(|u| u.username == uname) {
                    Some(user) => user.password = generate_password_hash(&password),
                    None => fail("Cannot reset password", &format!("'{}' not found", uname)),
                }
                persist_or_exit(&store, &store_path);
                println!(
                    "{} '{}' {}",
                    yansi::Paint::new("Password for").green(),
                    uname,
                    yansi::Paint::new("updated").green()
                );
            }
        },
        Commands::Models { sub } => match sub {
            ModelCommands::List => {
                let store = load_store_or_exit(&store_path);
                let mut table = new_table();
                table.set_header(vec!["ID", "Name", "Input", "Cached", "Output", "Assigned"]);
                for model in &store.models {
                    let assigned = model
                        .assigned_users
                        .iter()
                        .filter_map(|id| store.user_by_id(*id).map(|u| u.username.clone()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    table.add_row(vec![
                        model.id.to_string(),
                        model.name.clone(),
                        model.input_cost.clone(),
                        model.cached_input_cost.clone().unwrap_or_default(),
                        model.output_cost.clone().unwrap_or_default(),
                        assigned,
                    ]);
                }
                println!("\n{table}\n");
            }
            ModelCommands::Populate => {
                let mut store = load_store_or_exit(&store_path);
                let created = catalog::populate_models(&mut store);
                persist_or_exit(&store, &store_path);
                println!(
                    "{} ({} new, {} total)",
                    yansi::Paint::new("Model catalog populated").green(),
                    created,
                    store.models.len()
                );
            }
            ModelCommands::Assign {
                username,
                models,
                all,
                remove,
            } => {
                let mut store = load_store_or_exit(&store_path);
                let uname = username.trim().to_lowercase();
                let user_id = match store.user_by_username(&uname) {
                    Some(u) => u.id,
                    None => {
                        fail("Cannot assign models", &format!("account '{}' does not exist", uname))
                    }
                };
                let selected: Vec<usize> = store
                    .models
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| all || models.contains(&m.name))
                    .map(|(i, _)| i)
                    .collect();
                if selected.is_empty() {
                    fail("Cannot assign models", "no models found with the specified names");
                }
                let mut changed = Vec::new();
                for i in selected {
                    let model = &mut store.models[i];
                    if remove {
                        model.assigned_users.retain(|&id| id != user_id);
                    } else if !model.assigned_users.contains(&user_id) {
                        model.assigned_users.push(user_id);
                    }
                    changed.push(model.name.clone());
                }
                persist_or_exit(&store, &store_path);
                let action = if remove { "removed from" } else { "assigned to" };
                println!(
                    "{} '{}': {}",
                    yansi::Paint::new(format!("Successfully {} account", action)).green(),
                    uname,
                    changed.join(", ")
                );
                let current: Vec<String> = store
                    .models
                    .iter()
                    .filter(|m| m.assigned_users.contains(&user_id))
                    .map(|m| m.name.clone())
                    .collect();
                if current.is_empty() {
                    println!("Account has no model assignments");
                } else {
                    println!("Current assignments: {}", current.join(", "));
                }
            }
        },
        Commands::Check => {
            run_check(&store_path);
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table
}

fn load_store_or_exit(path: &std::path::Path) -> Store {
    match Store::load(path) {
        Ok(store) => store,
        Err(e) => fail(&format!("Failed to read store at {}", path.display()), &e.to_string()),
    }
}

fn persist_or_exit(store: &Store, path: &std::path::Path) {
    if let Err(e) = store.persist(path) {
        fail(&format!("Failed to write store at {}", path.display()), &e.to_string());
    }
}

fn fail(context: &str, detail: &str) -> ! {
    tracing::error!(context, detail, "Command failed");
    eprintln!("{}: {}", yansi::Paint::new(context).red(), detail);
    process::exit(1);
}

fn run_check(store_path: &std::path::Path) {
    println!("=== snapback health check ===\n");
    let mut issues: Vec<String> = Vec::new();

    println!("1. Checking store...");
    let store = match Store::load(store_path) {
        Ok(store) => {
            println!(
                "   {} store readable ({} users, {} groups, {} permissions, {} models)",
                yansi::Paint::new("ok").green(),
                store.users.len(),
                store.groups.len(),
                store.permissions.len(),
                store.models.len()
            );
            store
        }
        Err(e) => fail(&format!("Store at {} is unusable", store_path.display()), &e.to_string()),
    };

    println!("\n2. Checking referential integrity...");
    for perm in &store.permissions {
        if store.resource_type_by_id(perm.resource_type_id).is_none() {
            issues.push(format!(
                "permission '{}' references unknown resource type id {}",
                perm.codename, perm.resource_type_id
            ));
        }
    }
    for group in &store.groups {
        for &pid in &group.permissions {
            if store.permission_by_id(pid).is_none() {
                issues.push(format!(
                    "group '{}' references unknown permission id {}",
                    group.name, pid
                ));
            }
        }
    }
    for user in &store.users {
        for &gid in &user.groups {
            if store.group_by_id(gid).is_none() {
                issues.push(format!(
                    "account '{}' references unknown group id {}",
                    user.username, gid
                ));
            }
        }
        for &pid in &user.user_permissions {
            if store.permission_by_id(pid).is_none() {
                issues.push(format!(
                    "account '{}' references unknown permission id {}",
                    user.username, pid
                ));
            }
        }
    }
    for model in &store.models {
        for &uid in &model.assigned_users {
            if store.user_by_id(uid).is_none() {
                issues.push(format!(
                    "model '{}' references unknown account id {}",
                    model.name, uid
                ));
            }
        }
    }
    if issues.is_empty() {
        println!("   {} all references resolve", yansi::Paint::new("ok").green());
    }

    println!("\n3. Checking model assignments...");
    let unassigned: Vec<&str> = store
        .users
        .iter()
        .filter(|u| !u.is_superuser)
        .filter(|u| !store.models.iter().any(|m| m.assigned_users.contains(&u.id)))
        .map(|u| u.username.as_str())
        .collect();
    if unassigned.is_empty() {
        println!(
            "   {} every non-superuser account has a model assignment",
            yansi::Paint::new("ok").green()
        );
    } else {
        issues.push(format!(
            "{} account(s) have no model assignments: {}",
            unassigned.len(),
            unassigned.join(", ")
        ));
    }

    if issues.is_empty() {
        println!("\n{}", yansi::Paint::new("No issues found").green());
    } else {
        println!("\n{}", yansi::Paint::new(format!("{} issue(s) found:", issues.len())).yellow());
        for issue in &issues {
            println!("  - {}", issue);
        }
        process::exit(1);
    }
}
