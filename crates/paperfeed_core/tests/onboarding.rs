use paperfeed_core::{
    InterestService, InterestTag, KeyValueStore, LaunchService, MemoryKeyValueStore,
    OnboardingError, OnboardingSelection, OnboardingService, StorageError, StorageResult,
};
use paperfeed_core::repo::kv_repo::HAS_LAUNCHED_KEY;
use std::collections::HashSet;

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("offline".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("offline".to_string()))
    }
}

/// Accepts every write except the launch flag.
struct FlagRejectingStore {
    inner: MemoryKeyValueStore,
}

impl KeyValueStore for FlagRejectingStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if key == HAS_LAUNCHED_KEY {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }
}

#[test]
fn saved_interests_load_back_as_same_set() {
    let store = MemoryKeyValueStore::new();
    let service = InterestService::new(&store);
    let tags = [InterestTag::Robotics, InterestTag::Ai, InterestTag::Statistics];

    service.save(&tags).unwrap();
    let loaded: HashSet<InterestTag> = service.load().into_iter().collect();
    assert_eq!(loaded, tags.into_iter().collect::<HashSet<_>>());
}

#[test]
fn save_deduplicates_repeated_tags() {
    let store = MemoryKeyValueStore::new();
    let service = InterestService::new(&store);

    let saved = service
        .save(&[InterestTag::Ml, InterestTag::Cv, InterestTag::Ml])
        .unwrap();
    assert_eq!(saved, vec![InterestTag::Ml, InterestTag::Cv]);
    assert_eq!(service.load(), vec![InterestTag::Ml, InterestTag::Cv]);
}

#[test]
fn interests_read_failures_decay_to_empty() {
    let service = InterestService::new(BrokenStore);
    assert!(service.load().is_empty());
    assert!(service.save(&[InterestTag::Ml]).is_err());

    let never_set = MemoryKeyValueStore::new();
    assert!(InterestService::new(&never_set).load().is_empty());
}

#[test]
fn launch_flag_reads_fail_soft() {
    let service = LaunchService::new(BrokenStore);
    assert!(!service.has_launched());
    assert!(service.mark_launched().is_err());
    assert!(service.check_first_launch().is_err());
}

#[test]
fn completing_onboarding_saves_interests_and_flag() {
    let store = MemoryKeyValueStore::new();
    let service = OnboardingService::new(&store);
    assert!(service.needs_onboarding().unwrap());

    let mut selection = OnboardingSelection::new();
    selection.toggle(InterestTag::Nlp);
    selection.toggle(InterestTag::Graphics);

    let saved = service.complete(&selection).unwrap();
    assert_eq!(saved, vec![InterestTag::Nlp, InterestTag::Graphics]);
    assert!(!service.needs_onboarding().unwrap());
    assert!(LaunchService::new(&store).has_launched());
    assert_eq!(InterestService::new(&store).load(), saved);
}

#[test]
fn empty_selection_cannot_complete() {
    let store = MemoryKeyValueStore::new();
    let service = OnboardingService::new(&store);

    let err = service.complete(&OnboardingSelection::new()).unwrap_err();
    assert!(matches!(err, OnboardingError::NoInterestsSelected));
    assert!(store.is_empty());
}

#[test]
fn storage_failure_during_completion_is_reported() {
    let service = OnboardingService::new(BrokenStore);
    let mut selection = OnboardingSelection::new();
    selection.toggle(InterestTag::Ml);

    let err = service.complete(&selection).unwrap_err();
    assert!(matches!(err, OnboardingError::Storage(_)));
    assert!(service.needs_onboarding().is_err());
}

#[test]
fn abandoned_onboarding_is_shown_again_on_next_start() {
    let store = MemoryKeyValueStore::new();

    assert!(LaunchService::new(&store).check_first_launch().unwrap());
    // app closed on the onboarding screen without continuing
    assert!(LaunchService::new(&store).check_first_launch().unwrap());
    assert!(OnboardingService::new(&store).needs_onboarding().unwrap());

    let mut selection = OnboardingSelection::new();
    selection.toggle(InterestTag::Robotics);
    OnboardingService::new(&store).complete(&selection).unwrap();
    assert!(!LaunchService::new(&store).check_first_launch().unwrap());
}

#[test]
fn failed_flag_write_keeps_onboarding_pending() {
    let store = FlagRejectingStore {
        inner: MemoryKeyValueStore::new(),
    };
    let service = OnboardingService::new(&store);
    let mut selection = OnboardingSelection::new();
    selection.toggle(InterestTag::Ai);

    let err = service.complete(&selection).unwrap_err();
    assert!(matches!(err, OnboardingError::Storage(_)));
    assert_eq!(InterestService::new(&store).load(), vec![InterestTag::Ai]);
    assert!(service.needs_onboarding().unwrap());
    assert!(LaunchService::new(&store).check_first_launch().unwrap());
}
