//! Update Service Tests
//!
//! Event handling, queueing and bootloader handover signalling.
//! Run with: cargo test --no-default-features --features std --test update_tests

use biospec_firmware::update::{
    QueuedListener, UpdateAction, UpdateError, UpdateEvent, UpdateListener, UpdateService,
    UpdateStatus,
};

// =============================================================================
// Event Handling
// =============================================================================

#[test]
fn session_lifecycle() {
    let mut service = UpdateService::new(None);
    assert_eq!(service.status(), UpdateStatus::Idle);

    assert_eq!(service.handle(UpdateEvent::Start), UpdateAction::Continue);
    assert_eq!(service.status(), UpdateStatus::InProgress);

    assert_eq!(service.handle(UpdateEvent::End), UpdateAction::EnterBootloader);
    assert_eq!(service.status(), UpdateStatus::Complete);
}

#[test]
fn error_is_reported_without_handover() {
    let mut service = UpdateService::new(Some("pw"));

    let action = service.handle(UpdateEvent::Error(UpdateError::Auth));

    assert_eq!(action, UpdateAction::Continue);
    assert_eq!(service.status(), UpdateStatus::Failed(UpdateError::Auth));
    assert_eq!(service.status().code(), "FAIL");
}

#[test]
fn later_request_recovers_from_failure() {
    let mut service = UpdateService::new(Some("pw"));
    service.handle(UpdateEvent::Error(UpdateError::Auth));

    service.handle(UpdateEvent::Start);
    assert_eq!(service.handle(UpdateEvent::End), UpdateAction::EnterBootloader);
    assert_eq!(service.status(), UpdateStatus::Complete);
}

#[test]
fn status_codes() {
    assert_eq!(UpdateStatus::Idle.code(), "IDLE");
    assert_eq!(UpdateStatus::InProgress.code(), "BUSY");
    assert_eq!(UpdateStatus::Complete.code(), "DONE");
    assert_eq!(UpdateStatus::Failed(UpdateError::Auth).code(), "FAIL");
}

// =============================================================================
// Authorization
// =============================================================================

#[test]
fn authorize_with_password() {
    let service = UpdateService::new(Some("pw"));
    assert!(service.authorize("pw"));
    assert!(!service.authorize("PW"));
    assert!(!service.authorize(""));
}

#[test]
fn authorize_without_password() {
    let service = UpdateService::new(None);
    assert!(service.authorize(""));
    assert!(service.authorize("anything"));
}

// =============================================================================
// Listener Servicing
// =============================================================================

#[test]
fn service_drains_queue() {
    let mut service = UpdateService::new(None);
    let mut listener = QueuedListener::<8>::new();
    listener.push(UpdateEvent::Error(UpdateError::Auth));
    listener.push(UpdateEvent::Start);

    assert_eq!(service.service(&mut listener), UpdateAction::Continue);
    assert!(listener.is_empty());
    assert_eq!(service.status(), UpdateStatus::InProgress);
}

#[test]
fn service_stops_at_end() {
    let mut service = UpdateService::new(None);
    let mut listener = QueuedListener::<8>::new();
    listener.push(UpdateEvent::Start);
    listener.push(UpdateEvent::End);
    listener.push(UpdateEvent::Error(UpdateError::Auth));

    assert_eq!(service.service(&mut listener), UpdateAction::EnterBootloader);
    // Events after the end stay queued
    assert_eq!(listener.len(), 1);
    assert_eq!(service.status(), UpdateStatus::Complete);
}

#[test]
fn queue_drops_oldest_when_full() {
    let mut listener = QueuedListener::<2>::new();
    listener.push(UpdateEvent::Error(UpdateError::Auth));
    listener.push(UpdateEvent::Start);
    listener.push(UpdateEvent::End);

    assert_eq!(listener.len(), 2);
    assert_eq!(listener.poll(), Some(UpdateEvent::Start));
    assert_eq!(listener.poll(), Some(UpdateEvent::End));
    assert_eq!(listener.poll(), None);
}

#[test]
fn custom_listener() {
    struct Script(Vec<UpdateEvent>);

    impl UpdateListener for Script {
        fn poll(&mut self) -> Option<UpdateEvent> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            }
        }
    }

    let mut service = UpdateService::new(None);
    let mut script = Script(vec![
        UpdateEvent::Start,
        UpdateEvent::Error(UpdateError::Auth),
    ]);

    assert_eq!(service.service(&mut script), UpdateAction::Continue);
    assert_eq!(service.status(), UpdateStatus::Failed(UpdateError::Auth));
}
