use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &["data", "templates"];

/// Templates the workspace cannot render without
const CRITICAL_TEMPLATES: &[&str] = &[
    "templates/base.html.tera",
    "templates/workspace.html.tera",
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if critical dependencies are absent.
pub fn run(config: &AppConfig) {
    info!("CTA Strategist boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    let db_dir = Path::new(&config.db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    let dirs = REQUIRED_DIRS.iter().map(|d| Path::new(*d)).chain(db_dir);
    for path in dirs {
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", path.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", path.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Critical templates ──────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            error!("  MISSING critical template: {}", file);
            errors += 1;
        }
    }

    // ── 3. Database directory writable ──────────────────
    if let Some(dir) = db_dir.filter(|d| d.exists()) {
        let test_file = dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 4. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    // ── 5. API key ──────────────────────────────────────
    if config.gemini_api_key.is_none() {
        warn!("  No Gemini API key, strategy generation will return a configuration error");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
