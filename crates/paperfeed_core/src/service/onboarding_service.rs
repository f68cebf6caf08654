//! Onboarding use-case: interest selection and completion.
//!
//! # Responsibility
//! - Model the toggle grid selection over the interest vocabulary.
//! - Persist the selection and the launch flag on completion.
//!
//! # Invariants
//! - A selection never holds the same tag twice.
//! - Completion requires at least one tag; interests are written before the
//!   launch flag so an interrupted completion re-runs onboarding.

use crate::model::interest::InterestTag;
use crate::repo::kv_repo::{KeyValueStore, StorageError, StorageResult};
use crate::service::interest_service::InterestService;
use crate::service::launch_service::LaunchService;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum OnboardingError {
    /// Continue was requested with an empty selection.
    NoInterestsSelected,
    Storage(StorageError),
}

impl Display for OnboardingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoInterestsSelected => {
                write!(f, "select at least one interest to continue")
            }
            Self::Storage(err) => write!(f, "failed to save preferences: {err}"),
        }
    }
}

impl Error for OnboardingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NoInterestsSelected => None,
        }
    }
}

impl From<StorageError> for OnboardingError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Toggle selection state of the onboarding grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingSelection {
    selected: Vec<InterestTag>,
}

impl OnboardingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `tag` when absent, deselects it when present.
    ///
    /// Returns whether `tag` is selected afterwards.
    pub fn toggle(&mut self, tag: InterestTag) -> bool {
        if let Some(index) = self.selected.iter().position(|selected| *selected == tag) {
            self.selected.remove(index);
            false
        } else {
            self.selected.push(tag);
            true
        }
    }

    pub fn is_selected(&self, tag: InterestTag) -> bool {
        self.selected.contains(&tag)
    }

    /// Selected tags in selection order.
    pub fn selected(&self) -> &[InterestTag] {
        &self.selected
    }

    pub fn can_continue(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Label of the continue button.
    pub fn continue_label(&self) -> String {
        format!("Continue ({} selected)", self.selected.len())
    }
}

/// Completes onboarding against one key-value store.
pub struct OnboardingService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> OnboardingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Startup routing: whether onboarding should be shown.
    ///
    /// # Errors
    /// Propagates read failures; nothing is written.
    pub fn needs_onboarding(&self) -> StorageResult<bool> {
        LaunchService::new(&self.store).check_first_launch()
    }

    /// Saves the selection and marks onboarding complete.
    ///
    /// # Errors
    /// - `NoInterestsSelected` for an empty selection; nothing is written.
    /// - `Storage` when either write fails.
    pub fn complete(
        &self,
        selection: &OnboardingSelection,
    ) -> Result<Vec<InterestTag>, OnboardingError> {
        if !selection.can_continue() {
            return Err(OnboardingError::NoInterestsSelected);
        }
        let saved = InterestService::new(&self.store).save(selection.selected())?;
        LaunchService::new(&self.store).mark_launched()?;
        info!(
            "event=onboarding_complete module=onboarding status=ok interests={}",
            saved.len()
        );
        Ok(saved)
    }
}
