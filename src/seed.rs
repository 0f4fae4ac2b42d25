//! Demo data seeding.
//!
//! Populates the store with the three demo accounts (one per role) and the
//! demo catalog, and writes the locally-available text files into the files
//! directory. Enabled with `FILEVAULT_SEED=1`; intended for development and
//! evaluation, not production.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use filevault_auth::password;
use filevault_core::{CatalogStore, FileEntry, MemoryStore, Role, User, UserStore};

/// Shared demo password for all three accounts.
const DEMO_PASSWORD: &str = "password";

pub fn seed_demo_data(
    store: &Arc<MemoryStore>,
    files_dir: &Path,
    pepper: Option<&str>,
) -> anyhow::Result<()> {
    seed_users(store, pepper)?;
    seed_catalog(store)?;
    seed_local_files(files_dir)?;
    tracing::info!("seeded demo users, catalog and local files");
    Ok(())
}

fn seed_users(store: &Arc<MemoryStore>, pepper: Option<&str>) -> anyhow::Result<()> {
    let accounts = [
        ("admin", "admin@filevault.com", Role::Admin),
        ("manager", "manager@filevault.com", Role::Manager),
        ("employee", "employee@filevault.com", Role::Employee),
    ];
    for (username, email, role) in accounts {
        let hash = password::hash_password(DEMO_PASSWORD, pepper)
            .context("hashing demo password")?;
        UserStore::upsert(&**store, User::new(username, email, hash, role))
            .with_context(|| format!("seeding user {username}"))?;
    }
    Ok(())
}

fn seed_catalog(store: &Arc<MemoryStore>) -> anyhow::Result<()> {
    let all = vec![Role::Admin, Role::Manager, Role::Employee];
    let managerial = vec![Role::Admin, Role::Manager];
    let admin_only = vec![Role::Admin];

    let entries = [
        ("project-specifications.txt", 46_080, true, "sample-drive-id-1", all.clone()),
        ("user-manual.txt", 131_072, false, "sample-drive-id-2", all),
        ("team-guidelines.txt", 68_608, true, "sample-drive-id-3", managerial.clone()),
        ("api-documentation.txt", 239_616, false, "sample-drive-id-4", managerial),
        ("security-policies.txt", 91_136, true, "sample-drive-id-5", admin_only.clone()),
        ("deployment-guide.txt", 159_744, false, "sample-drive-id-6", admin_only),
    ];

    for (filename, size, is_local, drive_id, allowed_roles) in entries {
        CatalogStore::upsert(
            &**store,
            FileEntry::new(filename, size, is_local, Some(drive_id.into()), allowed_roles),
        )
        .with_context(|| format!("seeding catalog entry {filename}"))?;
    }
    Ok(())
}

fn seed_local_files(files_dir: &Path) -> anyhow::Result<()> {
    let contents = [
        (
            "project-specifications.txt",
            "PROJECT SPECIFICATIONS\n=====================\n\nFileVault is a role-gated \
             file catalog with remote drive fallback.\nRoles: Admin, Manager, Employee.\n",
        ),
        (
            "team-guidelines.txt",
            "TEAM GUIDELINES\n===============\n\nEmployees: general documentation.\n\
             Managers: team resources.\nAdmins: full access.\n",
        ),
        (
            "security-policies.txt",
            "SECURITY POLICIES\n=================\n\nRole-based permissions strictly \
             enforced.\nAll file access is logged for audit.\n",
        ),
    ];
    for (filename, content) in contents {
        fs::write(files_dir.join(filename), content)
            .with_context(|| format!("writing demo file {filename}"))?;
    }
    Ok(())
}
