mod common;

use std::sync::Arc;

use jiff::Timestamp;

use jornada_core::bookmark::{SaveOutcome, ToggleOutcome};
use jornada_core::cover::DEFAULT_COVER_URL;
use jornada_core::models::enrollment::{Enrollment, Percent, StudentCourse, StudentJourney};
use jornada_core::steps::StepProgress;
use jornada_portal::error::PortalError;
use jornada_portal::portal::StudentPortal;
use jornada_portal::session::Session;
use jornada_storage::memory::MemoryStore;
use jornada_storage::store::{EnrollmentStore, Precondition};

use common::{business_english, grammar_basics, seeded_store};

fn portal_for(store: &Arc<MemoryStore>, session: Session) -> StudentPortal {
    StudentPortal::new(store.clone(), store.clone(), session)
}

#[tokio::test]
async fn signed_out_portal_refuses_everything() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::new());

    assert!(matches!(portal.course_board().await, Err(PortalError::NoSession)));
    assert!(matches!(portal.journey_board().await, Err(PortalError::NoSession)));
    assert!(matches!(
        portal.toggle_course_bookmark("c1").await,
        Err(PortalError::NoSession)
    ));
    assert!(matches!(portal.save_journey("j1").await, Err(PortalError::NoSession)));
    assert!(matches!(portal.journey_detail("j1").await, Err(PortalError::NoSession)));
    assert_eq!(store.enrollment_count("s1").await, 0);
}

#[tokio::test]
async fn board_reflects_toggle_without_reload() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::signed_in("s1"));

    let before = portal.course_board().await.expect("board");
    let views = before.views();
    assert_eq!(views.discover.len(), 2);
    assert!(views.saved.is_empty());

    let change = portal.toggle_course_bookmark("c1").await.expect("toggle");
    assert_eq!(change.outcome, ToggleOutcome::Created);

    let after = portal.course_board().await.expect("board");
    let views = after.views();
    assert_eq!(views.saved.len(), 1);
    assert_eq!(views.saved[0].course_id, "c1");
    let grammar = views
        .discover
        .iter()
        .find(|d| d.item.id == "c1")
        .expect("listed");
    assert!(grammar.bookmarked);
    assert_eq!(grammar.display_cover, DEFAULT_COVER_URL);

    portal.toggle_course_bookmark("c1").await.expect("toggle back");
    let again = portal.course_board().await.expect("board");
    assert!(again.views().saved.is_empty());
}

#[tokio::test]
async fn unknown_catalog_id_is_not_found() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::signed_in("s1"));

    let err = portal.toggle_course_bookmark("nope").await.expect_err("missing");
    assert!(matches!(err, PortalError::NotFound { kind: "course", .. }));
    assert_eq!(store.enrollment_count("s1").await, 0);
}

#[tokio::test]
async fn save_then_save_again() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::signed_in("s1"));

    let first = portal.save_journey("j1").await.expect("save");
    assert_eq!(first.outcome, SaveOutcome::Created);
    let second = portal.save_journey("j1").await.expect("save again");
    assert_eq!(second.outcome, SaveOutcome::AlreadySaved);

    let board = portal.journey_board().await.expect("board");
    assert_eq!(board.enrollments.len(), 1);
    assert_eq!(board.views().saved.len(), 1);
}

#[tokio::test]
async fn enrollments_are_cached_until_session_changes() {
    let store = seeded_store().await;
    let session = Session::signed_in("s1");
    let portal = portal_for(&store, session.clone());

    assert!(portal.course_board().await.expect("board").enrollments.is_empty());

    // written behind the portal's back
    let record = StudentCourse::enroll("s1", &grammar_basics(), Timestamp::now());
    store
        .upsert_student_course(&record, &Precondition::MustNotExist)
        .await
        .expect("write");
    assert!(portal.course_board().await.expect("board").enrollments.is_empty());

    session.sign_out();
    session.sign_in("s1");
    let board = portal.course_board().await.expect("board");
    assert_eq!(board.enrollments.len(), 1);
}

#[tokio::test]
async fn switching_students_never_leaks_enrollments() {
    let store = seeded_store().await;
    let session = Session::signed_in("s1");
    let portal = portal_for(&store, session.clone());

    portal.toggle_course_bookmark("c1").await.expect("toggle");
    session.sign_in("s2");

    let board = portal.course_board().await.expect("board");
    assert!(board.enrollments.is_empty());
    assert!(board.views().discover.iter().all(|d| !d.bookmarked));
}

#[tokio::test]
async fn failing_backend_is_fetch_failed() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::signed_in("s1"));
    store.set_fail_reads(true).await;

    let err = portal.journey_board().await.expect_err("reads fail");
    assert!(matches!(err, PortalError::FetchFailed { what: "journeys", .. }));
}

#[tokio::test]
async fn journey_detail_combines_catalog_and_progress() {
    let store = seeded_store().await;

    let mut course = StudentCourse::enroll("s1", &grammar_basics(), Timestamp::now());
    course.progress_percent = Percent::new(50).expect("in range");
    course.study_time_minutes = 20;
    store
        .upsert_student_course(&course, &Precondition::MustNotExist)
        .await
        .expect("write course");

    let mut journey = StudentJourney::enroll("s1", &business_english(), Timestamp::now());
    journey.current_step = 2;
    journey.bookmarked = true;
    store
        .upsert_student_journey(&journey, &Precondition::MustNotExist)
        .await
        .expect("write journey");

    let portal = portal_for(&store, Session::signed_in("s1"));
    let detail = portal.journey_detail("j1").await.expect("detail");

    assert!(detail.bookmarked);
    assert!(detail.has_content);
    assert_eq!(detail.course_count, 2);
    assert_eq!(detail.journey_count, 1);
    assert_eq!((detail.completed_steps, detail.total_steps), (2, 3));
    assert_eq!(detail.progress_percent.get(), 66);
    assert_eq!(detail.display_cover, "https://cdn.example.com/j1.jpg");

    let numbers: Vec<u32> = detail.steps.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(
        detail.steps[0].progress,
        StepProgress::Course {
            percent: Percent::new(50).expect("in range")
        }
    );
    assert_eq!(
        detail.steps[1].progress,
        StepProgress::Course {
            percent: Percent::ZERO
        }
    );

    let by_enrollment = portal
        .journey_detail(&journey.id.to_string())
        .await
        .expect("detail by enrollment id");
    assert_eq!(by_enrollment.journey.id, "j1");
    assert_eq!(by_enrollment.enrollment.map(|e| e.id), Some(journey.id));
}

#[tokio::test]
async fn empty_journey_detail_has_no_content() {
    let store = seeded_store().await;
    let portal = portal_for(&store, Session::signed_in("s1"));

    let detail = portal.journey_detail("j9").await.expect("detail");
    assert!(!detail.has_content);
    assert!(detail.steps.is_empty());
    assert!(detail.enrollment.is_none());
    assert_eq!(detail.progress_percent, Percent::ZERO);
    assert_eq!(detail.display_cover, DEFAULT_COVER_URL);

    let err = portal.journey_detail("missing").await.expect_err("missing");
    assert!(matches!(err, PortalError::NotFound { kind: "journey", .. }));
}

#[tokio::test]
async fn journey_detail_clamps_progress_to_the_live_journey() {
    let store = seeded_store().await;

    let mut journey = StudentJourney::enroll("s1", &business_english(), Timestamp::now());
    journey.current_step = 3;
    store
        .upsert_student_journey(&journey, &Precondition::MustNotExist)
        .await
        .expect("write journey");

    // the catalog journey loses a step after the student finished it
    let mut shrunk = business_english();
    shrunk.number_of_steps = 2;
    shrunk.journey_steps.clear();
    store.put_journey(shrunk).await;

    let portal = portal_for(&store, Session::signed_in("s1"));
    let detail = portal.journey_detail("j1").await.expect("detail");
    assert_eq!((detail.completed_steps, detail.total_steps), (2, 2));
    assert_eq!(detail.progress_percent, Percent::FULL);
    assert_eq!(detail.enrollment.map(|e| e.current_step), Some(3));
}
