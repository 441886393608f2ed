use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::models::local_store::{LocalStore, PROFILES_KEY};
use crate::models::settings::{Settings, Tone};

/// The part of the settings a profile remembers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSettings {
    pub primary_color: String,
    pub tone: Tone,
}

impl BrandSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        BrandSettings {
            primary_color: settings.primary_color.clone(),
            tone: settings.tone,
        }
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        settings.primary_color = self.primary_color.clone();
        settings.tone = self.tone;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub settings: BrandSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A profile with the same name (ignoring case) exists and the caller
    /// has not confirmed the overwrite. Carries the stored name.
    NeedsConfirmation { existing: String },
}

/// Named brand profiles, kept sorted alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileBook {
    profiles: Vec<Profile>,
}

impl ProfileBook {
    pub fn new(mut profiles: Vec<Profile>) -> Self {
        sort_profiles(&mut profiles);
        ProfileBook { profiles }
    }

    pub fn try_load(pool: &DbPool) -> Result<Self, String> {
        LocalStore::get_json::<Vec<Profile>>(pool, PROFILES_KEY)
            .map(|list| Self::new(list.unwrap_or_default()))
    }

    /// The stored list for display. Unreadable state is logged and shown
    /// as empty; edits go through [`ProfileBook::update`] instead.
    pub fn load(pool: &DbPool) -> Self {
        Self::try_load(pool).unwrap_or_else(|e| {
            log::error!("Failed to load profiles: {}", e);
            Self::default()
        })
    }

    /// Apply `f` to the stored book and write it back if it changed, all
    /// in one transaction. A failed read aborts before `f` runs, so the
    /// stored profiles are never replaced by an edit of an empty book.
    pub fn update<R>(pool: &DbPool, f: impl FnOnce(&mut ProfileBook) -> R) -> Result<R, String> {
        LocalStore::update_json(pool, PROFILES_KEY, |stored: Option<Vec<Profile>>| {
            let mut book = Self::new(stored.unwrap_or_default());
            let before = book.clone();
            let result = f(&mut book);
            let next = (book != before).then_some(book.profiles);
            (next, result)
        })
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Exact-name lookup, as used by the profile selector.
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    fn find_ignore_case(&self, name: &str) -> Option<&Profile> {
        let lower = name.to_lowercase();
        self.profiles.iter().find(|p| p.name.to_lowercase() == lower)
    }

    /// Save `brand` under `name`. Names are compared ignoring case; the
    /// newest spelling wins once the overwrite is confirmed.
    pub fn save(
        &mut self,
        name: &str,
        brand: BrandSettings,
        confirmed: bool,
    ) -> Result<SaveOutcome, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Tên profile không được để trống.".to_string());
        }

        if let Some(existing) = self.find_ignore_case(name) {
            if !confirmed {
                return Ok(SaveOutcome::NeedsConfirmation {
                    existing: existing.name.clone(),
                });
            }
        }

        let lower = name.to_lowercase();
        self.profiles.retain(|p| p.name.to_lowercase() != lower);
        self.profiles.push(Profile {
            name: name.to_string(),
            settings: brand,
        });
        sort_profiles(&mut self.profiles);
        Ok(SaveOutcome::Saved)
    }

    /// Remove the profile with exactly this name. Returns whether one was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.name != name);
        self.profiles.len() != before
    }
}

fn sort_profiles(profiles: &mut [Profile]) {
    profiles.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub fn overwrite_prompt(existing: &str) -> String {
    format!(
        "Profile \"{}\" đã tồn tại. Bạn có muốn ghi đè lên nó không?",
        existing
    )
}

pub fn delete_prompt(name: &str) -> String {
    format!("Bạn có chắc chắn muốn xóa profile \"{}\" không?", name)
}
